//! CSV export of logged sets.
//!
//! Every performed set becomes one row, with names resolved through the
//! reference tables and an estimated 1RM computed from the set.

use crate::exertion::estimate_one_rep_max;
use crate::populate::References;
use crate::store::Store;
use crate::{Mood, Result, WorkoutProgress};
use std::io::Write;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    date: String,
    workout: &'a str,
    exercise: &'a str,
    set: usize,
    weight: f64,
    reps: u32,
    rpe: Option<f64>,
    estimated_one_rep_max: Option<f64>,
    mood: Mood,
}

/// Write one CSV row per performed set, oldest session first.
///
/// Returns the number of rows written. Dangling references are written as
/// empty names.
pub fn export_progress_csv<W: Write>(
    mut progress: Vec<WorkoutProgress>,
    refs: &References,
    writer: W,
) -> Result<usize> {
    progress.sort_by(|a, b| a.date.cmp(&b.date));

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);
    let mut count = 0;

    for entry in &progress {
        let workout = refs
            .workout(entry.workout_id)
            .map(|w| w.name.as_str())
            .unwrap_or("");

        for item in &entry.exercises {
            let exercise = refs
                .exercise(item.exercise_id)
                .map(|e| e.name.as_str())
                .unwrap_or("");

            for (i, set) in item.sets.iter().enumerate() {
                csv_writer.serialize(CsvRow {
                    date: entry.date.to_rfc3339(),
                    workout,
                    exercise,
                    set: i + 1,
                    weight: set.weight,
                    reps: set.reps,
                    rpe: set.rpe,
                    estimated_one_rep_max: estimate_one_rep_max(set.weight, set.reps),
                    mood: entry.mood,
                })?;
                count += 1;
            }
        }
    }

    csv_writer.flush()?;
    tracing::info!("Exported {} sets from {} sessions", count, progress.len());
    Ok(count)
}

/// Export everything in the store
pub fn export_store_csv<W: Write>(store: &Store, writer: W) -> Result<usize> {
    let refs = References::load(store)?;
    export_progress_csv(store.list()?, &refs, writer)
}
