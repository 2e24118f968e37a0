//! File-backed document store with file locking.
//!
//! Each collection lives in `<data_dir>/<collection>.json` as a JSON array.
//! Reads take a shared lock and writes an exclusive lock on a sidecar
//! `.<collection>.lock` file, so the server and CLI can share a data directory.
//! Writes go through a temp file that is renamed over the collection file.

use crate::validation::{DocumentInput, DocumentMeta};
use crate::{Error, Exercise, Result, Workout, WorkoutProgress};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// A type stored as one document in a named collection
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;
}

impl Document for Exercise {
    const COLLECTION: &'static str = "exercises";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Document for Workout {
    const COLLECTION: &'static str = "workouts";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Document for WorkoutProgress {
    const COLLECTION: &'static str = "progress";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Handle to the data directory; open once and share
#[derive(Debug)]
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    /// Open (creating if needed) a store rooted at `data_dir`
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("Opened document store at {:?}", data_dir);
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// All documents of a collection, in insertion order
    pub fn list<D: Document>(&self) -> Result<Vec<D>> {
        let lock = self.lock_file::<D>()?;
        lock.lock_shared()?;
        let result = read_collection(&self.collection_path::<D>());
        lock.unlock()?;
        result
    }

    /// Fetch a document, `None` if absent
    pub fn find<D: Document>(&self, id: Uuid) -> Result<Option<D>> {
        Ok(self.list::<D>()?.into_iter().find(|doc| doc.id() == id))
    }

    /// Fetch a document, `Error::NotFound` if absent
    pub fn get<D: Document>(&self, id: Uuid) -> Result<D> {
        self.find(id)?.ok_or_else(|| not_found::<D>(id))
    }

    /// Validate an input and append it as a new document
    pub fn create<I: DocumentInput>(&self, input: I) -> Result<I::Output> {
        let doc = input.build(DocumentMeta::new_document(Utc::now()), None)?;

        self.modify::<I::Output, _>(|docs| {
            docs.push(doc.clone());
            Ok(())
        })?;

        tracing::debug!("Created {} document {}", I::Output::COLLECTION, doc.id());
        Ok(doc)
    }

    /// Validate an input and replace the document `id` with it.
    ///
    /// The id and creation time are kept; `updated_at` is refreshed.
    pub fn update<I: DocumentInput>(&self, id: Uuid, input: I) -> Result<I::Output> {
        let doc = self.modify::<I::Output, _>(|docs| {
            let slot = docs
                .iter_mut()
                .find(|doc| doc.id() == id)
                .ok_or_else(|| not_found::<I::Output>(id))?;

            let previous = slot.clone();
            let meta = DocumentMeta {
                id,
                created_at: previous.created_at(),
                updated_at: Utc::now(),
            };
            *slot = input.build(meta, Some(&previous))?;
            Ok(slot.clone())
        })?;

        tracing::debug!("Updated {} document {}", I::Output::COLLECTION, id);
        Ok(doc)
    }

    /// Remove and return the document `id`
    pub fn delete<D: Document>(&self, id: Uuid) -> Result<D> {
        let removed = self.modify::<D, _>(|docs| {
            let index = docs
                .iter()
                .position(|doc| doc.id() == id)
                .ok_or_else(|| not_found::<D>(id))?;
            Ok(docs.remove(index))
        })?;

        tracing::debug!("Deleted {} document {}", D::COLLECTION, id);
        Ok(removed)
    }

    /// Load a collection, modify it, and save it back under an exclusive lock.
    ///
    /// Nothing is written if `f` fails.
    fn modify<D, T>(&self, f: impl FnOnce(&mut Vec<D>) -> Result<T>) -> Result<T>
    where
        D: Document,
    {
        let lock = self.lock_file::<D>()?;
        lock.lock_exclusive()?;

        let path = self.collection_path::<D>();
        let result = read_collection::<D>(&path).and_then(|mut docs| {
            let value = f(&mut docs)?;
            write_collection(&path, &docs)?;
            Ok(value)
        });

        lock.unlock()?;
        result
    }

    fn collection_path<D: Document>(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", D::COLLECTION))
    }

    fn lock_file<D: Document>(&self) -> Result<File> {
        let path = self.data_dir.join(format!(".{}.lock", D::COLLECTION));
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;
        Ok(file)
    }
}

fn not_found<D: Document>(id: Uuid) -> Error {
    Error::NotFound {
        collection: D::COLLECTION,
        id: id.to_string(),
    }
}

/// Read a collection file; a missing file is an empty collection
fn read_collection<D: Document>(path: &Path) -> Result<Vec<D>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    let docs: Vec<D> = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        tracing::error!("Failed to parse collection {:?}: {}", path, e);
        Error::Json(e)
    })?;

    tracing::debug!("Read {} documents from {:?}", docs.len(), path);
    Ok(docs)
}

/// Atomically replace a collection file
fn write_collection<D: Document>(path: &Path, docs: &[D]) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "collection path missing parent")
    })?;
    let temp = NamedTempFile::new_in(parent)?;

    {
        let mut writer = BufWriter::new(temp.as_file());
        serde_json::to_writer(&mut writer, docs)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Wrote {} documents to {:?}", docs.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{ExerciseInput, WorkoutExerciseInput, WorkoutInput};
    use crate::Difficulty;

    fn exercise_input(name: &str) -> ExerciseInput {
        ExerciseInput {
            name: Some(name.into()),
            description: Some(format!("{} description", name)),
            muscle_group: Some("Legs".into()),
            equipment: Some("Barbell".into()),
            ..Default::default()
        }
    }

    fn open_temp() -> (tempfile::TempDir, Store) {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path().join("data")).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_empty_collection() {
        let (_dir, store) = open_temp();
        let exercises: Vec<Exercise> = store.list().unwrap();
        assert!(exercises.is_empty());
    }

    #[test]
    fn test_create_get_list() {
        let (_dir, store) = open_temp();

        let squat = store.create(exercise_input("Squat")).unwrap();
        let deadlift = store.create(exercise_input("Deadlift")).unwrap();

        let fetched: Exercise = store.get(squat.id).unwrap();
        assert_eq!(fetched, squat);

        let all: Vec<Exercise> = store.list().unwrap();
        let names: Vec<_> = all.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Squat", "Deadlift"]);
        assert_ne!(squat.id, deadlift.id);
    }

    #[test]
    fn test_update_preserves_identity() {
        let (_dir, store) = open_temp();
        let created = store.create(exercise_input("Squat")).unwrap();

        let updated = store
            .update(created.id, exercise_input("Front Squat"))
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(store.get::<Exercise>(created.id).unwrap().name, "Front Squat");
    }

    #[test]
    fn test_invalid_update_writes_nothing() {
        let (_dir, store) = open_temp();
        let created = store.create(exercise_input("Squat")).unwrap();

        let result = store.update(
            created.id,
            ExerciseInput {
                name: Some("".into()),
                ..exercise_input("x")
            },
        );
        assert!(matches!(result, Err(Error::Validation { .. })));
        assert_eq!(store.get::<Exercise>(created.id).unwrap().name, "Squat");
    }

    #[test]
    fn test_missing_ids_are_not_found() {
        let (_dir, store) = open_temp();
        let id = Uuid::new_v4();

        assert!(matches!(store.get::<Exercise>(id), Err(Error::NotFound { .. })));
        assert!(matches!(
            store.update(id, exercise_input("Squat")),
            Err(Error::NotFound { collection: "exercises", .. })
        ));
        assert!(matches!(store.delete::<Exercise>(id), Err(Error::NotFound { .. })));
        assert_eq!(store.find::<Exercise>(id).unwrap(), None);
    }

    #[test]
    fn test_delete_does_not_cascade() {
        let (_dir, store) = open_temp();
        let bench = store.create(exercise_input("Bench")).unwrap();

        let workout = store
            .create(WorkoutInput {
                name: Some("Push".into()),
                description: Some("Push day".into()),
                difficulty: Some(Difficulty::Intermediate),
                frequency: Some("weekly".into()),
                duration_minutes: Some(45),
                exercises: vec![WorkoutExerciseInput {
                    exercise_id: Some(bench.id),
                    sets: Some(4),
                    reps: Some("6-8".into()),
                    rest_seconds: Some(150),
                    notes: None,
                }],
            })
            .unwrap();

        let removed: Exercise = store.delete(bench.id).unwrap();
        assert_eq!(removed.id, bench.id);

        let kept: Workout = store.get(workout.id).unwrap();
        assert_eq!(kept.exercises[0].exercise_id, bench.id);
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let created = {
            let store = Store::open(temp_dir.path()).unwrap();
            store.create(exercise_input("Squat")).unwrap()
        };

        let store = Store::open(temp_dir.path()).unwrap();
        assert_eq!(store.get::<Exercise>(created.id).unwrap(), created);
    }

    #[test]
    fn test_corrupted_collection_is_an_error() {
        let (_dir, store) = open_temp();
        std::fs::write(store.data_dir().join("exercises.json"), "{ invalid json }").unwrap();

        assert!(matches!(store.list::<Exercise>(), Err(Error::Json(_))));
        // The bad file is left for the user to inspect
        assert!(store.create(exercise_input("Squat")).is_err());
        assert_eq!(
            std::fs::read_to_string(store.data_dir().join("exercises.json")).unwrap(),
            "{ invalid json }"
        );
    }

    #[test]
    fn test_no_stray_temp_files() {
        let (_dir, store) = open_temp();
        store.create(exercise_input("Squat")).unwrap();

        let extras: Vec<_> = std::fs::read_dir(store.data_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name != "exercises.json" && !name.ends_with(".lock"))
            .collect();
        assert!(extras.is_empty(), "Unexpected files: {:?}", extras);
    }

    #[test]
    fn test_concurrent_creates() {
        let (_dir, store) = open_temp();
        let store = std::sync::Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store.create(exercise_input(&format!("Exercise {}", i))).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.list::<Exercise>().unwrap().len(), 8);
    }
}
