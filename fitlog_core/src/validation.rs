//! Request payloads and their validation into documents.
//!
//! Every field of an input is optional at the JSON level so that a missing
//! field surfaces as a [`Error::Validation`] naming it, rather than as an
//! opaque deserialization failure.

use crate::store::Document;
use crate::{
    Difficulty, Error, Exercise, ExerciseProgress, Mood, PerformedSet, Result, Workout,
    WorkoutExercise, WorkoutProgress,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Identity and timestamps assigned by the store when building a document
#[derive(Clone, Copy, Debug)]
pub struct DocumentMeta {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentMeta {
    /// Metadata for a brand new document
    pub fn new_document(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A payload that can be validated into a stored document
pub trait DocumentInput {
    type Output: Document;

    /// Validate and build the document.
    ///
    /// `previous` is the stored version when this is a replacement.
    fn build(self, meta: DocumentMeta, previous: Option<&Self::Output>) -> Result<Self::Output>;
}

/// Either a JSON list or a comma-separated string
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    List(Vec<String>),
    Text(String),
}

impl StringList {
    fn into_vec(self) -> Vec<String> {
        let items: Vec<String> = match self {
            StringList::List(items) => items,
            StringList::Text(text) => text.split(',').map(str::to_string).collect(),
        };
        items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }
}

/// A session date: a full RFC 3339 timestamp, or a bare `YYYY-MM-DD` day
/// as sent by date pickers, which is taken as midnight UTC
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SessionDate {
    Timestamp(DateTime<Utc>),
    Day(NaiveDate),
}

impl SessionDate {
    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            SessionDate::Timestamp(at) => at,
            SessionDate::Day(day) => day.and_time(NaiveTime::MIN).and_utc(),
        }
    }
}

impl From<DateTime<Utc>> for SessionDate {
    fn from(at: DateTime<Utc>) -> Self {
        SessionDate::Timestamp(at)
    }
}

// ============================================================================
// Exercise
// ============================================================================

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExerciseInput {
    /// Only consulted by the collection-level update route
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
    pub secondary_muscles: Option<StringList>,
    pub equipment: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
}

impl DocumentInput for ExerciseInput {
    type Output = Exercise;

    fn build(self, meta: DocumentMeta, _previous: Option<&Exercise>) -> Result<Exercise> {
        Ok(Exercise {
            id: meta.id,
            name: required_text(self.name, "name")?,
            description: required_text(self.description, "description")?,
            muscle_group: required_text(self.muscle_group, "muscle_group")?,
            secondary_muscles: self
                .secondary_muscles
                .map(StringList::into_vec)
                .unwrap_or_default(),
            equipment: required_text(self.equipment, "equipment")?,
            video_url: optional_text(self.video_url),
            image_url: optional_text(self.image_url),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        })
    }
}

// ============================================================================
// Workout
// ============================================================================

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct WorkoutExerciseInput {
    pub exercise_id: Option<Uuid>,
    pub sets: Option<u32>,
    pub reps: Option<String>,
    pub rest_seconds: Option<u32>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct WorkoutInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub exercises: Vec<WorkoutExerciseInput>,
    pub frequency: Option<String>,
    pub duration_minutes: Option<u32>,
}

impl DocumentInput for WorkoutInput {
    type Output = Workout;

    fn build(self, meta: DocumentMeta, _previous: Option<&Workout>) -> Result<Workout> {
        let name = required_text(self.name, "name")?;
        let description = required_text(self.description, "description")?;
        let difficulty = self.difficulty.ok_or_else(|| Error::missing("difficulty"))?;

        let exercises = self
            .exercises
            .into_iter()
            .enumerate()
            .map(|(i, item)| item.build(i))
            .collect::<Result<Vec<_>>>()?;

        Ok(Workout {
            id: meta.id,
            name,
            description,
            difficulty,
            exercises,
            frequency: required_text(self.frequency, "frequency")?,
            duration_minutes: positive(self.duration_minutes, "duration_minutes")?,
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        })
    }
}

impl WorkoutExerciseInput {
    fn build(self, index: usize) -> Result<WorkoutExercise> {
        let field = |name: &str| format!("exercises[{}].{}", index, name);

        Ok(WorkoutExercise {
            exercise_id: self
                .exercise_id
                .ok_or_else(|| Error::missing(&field("exercise_id")))?,
            sets: positive(self.sets, &field("sets"))?,
            reps: required_text(self.reps, &field("reps"))?,
            rest_seconds: self
                .rest_seconds
                .ok_or_else(|| Error::missing(&field("rest_seconds")))?,
            notes: optional_text(self.notes),
        })
    }
}

// ============================================================================
// Workout Progress
// ============================================================================

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PerformedSetInput {
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub rpe: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExerciseProgressInput {
    pub exercise_id: Option<Uuid>,
    pub sets: Vec<PerformedSetInput>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProgressInput {
    pub workout_id: Option<Uuid>,
    pub date: Option<SessionDate>,
    pub duration_minutes: Option<u32>,
    pub mood: Option<Mood>,
    pub exercises: Vec<ExerciseProgressInput>,
    pub notes: Option<String>,
}

impl DocumentInput for ProgressInput {
    type Output = WorkoutProgress;

    fn build(
        self,
        meta: DocumentMeta,
        previous: Option<&WorkoutProgress>,
    ) -> Result<WorkoutProgress> {
        let workout_id = self.workout_id.ok_or_else(|| Error::missing("workout_id"))?;
        let duration_minutes = positive(self.duration_minutes, "duration_minutes")?;
        let mood = self.mood.ok_or_else(|| Error::missing("mood"))?;

        // An update that omits the date keeps the logged one
        let date = self
            .date
            .map(SessionDate::to_utc)
            .or_else(|| previous.map(|p| p.date))
            .unwrap_or(meta.updated_at);

        let exercises = self
            .exercises
            .into_iter()
            .enumerate()
            .map(|(i, item)| item.build(i))
            .collect::<Result<Vec<_>>>()?;

        Ok(WorkoutProgress {
            id: meta.id,
            workout_id,
            date,
            duration_minutes,
            mood,
            exercises,
            notes: optional_text(self.notes),
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        })
    }
}

impl ExerciseProgressInput {
    fn build(self, index: usize) -> Result<ExerciseProgress> {
        let exercise_id = self
            .exercise_id
            .ok_or_else(|| Error::missing(&format!("exercises[{}].exercise_id", index)))?;

        let sets = self
            .sets
            .into_iter()
            .enumerate()
            .map(|(j, set)| set.build(&format!("exercises[{}].sets[{}]", index, j)))
            .collect::<Result<Vec<_>>>()?;

        Ok(ExerciseProgress {
            exercise_id,
            sets,
            notes: optional_text(self.notes),
        })
    }
}

impl PerformedSetInput {
    fn build(self, path: &str) -> Result<PerformedSet> {
        let weight_field = format!("{}.weight", path);
        let weight = self.weight.ok_or_else(|| Error::missing(&weight_field))?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::validation(&weight_field, "must be zero or more"));
        }

        let reps = positive(self.reps, &format!("{}.reps", path))?;

        if let Some(rpe) = self.rpe {
            if !(1.0..=10.0).contains(&rpe) {
                return Err(Error::validation(
                    &format!("{}.rpe", path),
                    "must be between 1 and 10",
                ));
            }
        }

        Ok(PerformedSet {
            weight,
            reps,
            rpe: self.rpe,
        })
    }
}

// ============================================================================
// Field helpers
// ============================================================================

fn required_text(value: Option<String>, field: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(Error::validation(field, "must not be empty")),
        None => Err(Error::missing(field)),
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn positive(value: Option<u32>, field: &str) -> Result<u32> {
    match value {
        Some(0) => Err(Error::validation(field, "must be at least 1")),
        Some(v) => Ok(v),
        None => Err(Error::missing(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta() -> DocumentMeta {
        DocumentMeta::new_document(Utc::now())
    }

    fn field_of(err: Error) -> String {
        match err {
            Error::Validation { field, .. } => field,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_exercise_trims_and_splits_secondary_muscles() {
        let input: ExerciseInput = serde_json::from_value(json!({
            "name": "  Squat ",
            "description": "Back squat",
            "muscle_group": "Quadriceps",
            "equipment": "Barbell",
            "secondary_muscles": "glutes, , hamstrings ,core",
            "video_url": "   "
        }))
        .unwrap();

        let exercise = input.build(meta(), None).unwrap();
        assert_eq!(exercise.name, "Squat");
        assert_eq!(
            exercise.secondary_muscles,
            vec!["glutes", "hamstrings", "core"]
        );
        assert_eq!(exercise.video_url, None);
    }

    #[test]
    fn test_exercise_accepts_muscle_list() {
        let input: ExerciseInput = serde_json::from_value(json!({
            "name": "Row",
            "description": "Barbell row",
            "muscle_group": "Back",
            "equipment": "Barbell",
            "secondary_muscles": ["Biceps", " "]
        }))
        .unwrap();

        let exercise = input.build(meta(), None).unwrap();
        assert_eq!(exercise.secondary_muscles, vec!["Biceps"]);
    }

    #[test]
    fn test_exercise_missing_field() {
        let input: ExerciseInput = serde_json::from_value(json!({
            "name": "Row",
            "description": "Barbell row",
            "equipment": "Barbell"
        }))
        .unwrap();

        assert_eq!(field_of(input.build(meta(), None).unwrap_err()), "muscle_group");
    }

    #[test]
    fn test_exercise_blank_name() {
        let input = ExerciseInput {
            name: Some("   ".into()),
            ..Default::default()
        };
        let err = input.build(meta(), None).unwrap_err();
        assert_eq!(err.to_string(), "name: must not be empty");
    }

    #[test]
    fn test_workout_nested_error_path() {
        let input: WorkoutInput = serde_json::from_value(json!({
            "name": "Push day",
            "description": "Chest and shoulders",
            "difficulty": "avanzato",
            "frequency": "twice a week",
            "duration_minutes": 60,
            "exercises": [
                { "exercise_id": Uuid::new_v4(), "sets": 3, "reps": "8-12", "rest_seconds": 90 },
                { "exercise_id": Uuid::new_v4(), "sets": 0, "reps": "10", "rest_seconds": 60 }
            ]
        }))
        .unwrap();

        assert_eq!(
            field_of(input.build(meta(), None).unwrap_err()),
            "exercises[1].sets"
        );
    }

    #[test]
    fn test_workout_valid() {
        let exercise_id = Uuid::new_v4();
        let input: WorkoutInput = serde_json::from_value(json!({
            "name": "Full body",
            "description": "Beginner template",
            "difficulty": "beginner",
            "frequency": "3x week",
            "duration_minutes": 45,
            "exercises": [
                { "exercise_id": exercise_id, "sets": 3, "reps": "to failure", "rest_seconds": 120, "notes": " slow " }
            ]
        }))
        .unwrap();

        let workout = input.build(meta(), None).unwrap();
        assert_eq!(workout.difficulty, Difficulty::Beginner);
        assert_eq!(workout.exercises[0].exercise_id, exercise_id);
        assert_eq!(workout.exercises[0].notes.as_deref(), Some("slow"));
    }

    #[test]
    fn test_progress_defaults_date_to_now() {
        let m = meta();
        let input: ProgressInput = serde_json::from_value(json!({
            "workout_id": Uuid::new_v4(),
            "duration_minutes": 50,
            "mood": "good"
        }))
        .unwrap();

        let progress = input.build(m, None).unwrap();
        assert_eq!(progress.date, m.updated_at);
    }

    #[test]
    fn test_progress_accepts_bare_day() {
        let input: ProgressInput = serde_json::from_value(json!({
            "workout_id": Uuid::new_v4(),
            "date": "2024-04-01",
            "duration_minutes": 60,
            "mood": "buono"
        }))
        .unwrap();
        assert_eq!(
            input.date,
            Some(SessionDate::Day(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()))
        );

        let progress = input.build(meta(), None).unwrap();
        assert_eq!(progress.date.to_rfc3339(), "2024-04-01T00:00:00+00:00");
    }

    #[test]
    fn test_progress_rejects_garbage_date() {
        let result: std::result::Result<ProgressInput, _> = serde_json::from_value(json!({
            "workout_id": Uuid::new_v4(),
            "date": "next tuesday",
            "duration_minutes": 60,
            "mood": "good"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_progress_update_keeps_previous_date() {
        let original: ProgressInput = serde_json::from_value(json!({
            "workout_id": Uuid::new_v4(),
            "date": "2024-03-01T18:00:00Z",
            "duration_minutes": 50,
            "mood": "ottimo"
        }))
        .unwrap();
        let first = original.build(meta(), None).unwrap();

        let update: ProgressInput = serde_json::from_value(json!({
            "workout_id": first.workout_id,
            "duration_minutes": 55,
            "mood": "normal"
        }))
        .unwrap();
        let updated = update.build(meta(), Some(&first)).unwrap();

        assert_eq!(updated.date, first.date);
        assert_eq!(updated.duration_minutes, 55);
    }

    #[test]
    fn test_progress_rejects_rpe_out_of_range() {
        let input: ProgressInput = serde_json::from_value(json!({
            "workout_id": Uuid::new_v4(),
            "duration_minutes": 30,
            "mood": "tired",
            "exercises": [
                { "exercise_id": Uuid::new_v4(), "sets": [ { "weight": 60, "reps": 5, "rpe": 11 } ] }
            ]
        }))
        .unwrap();

        assert_eq!(
            field_of(input.build(meta(), None).unwrap_err()),
            "exercises[0].sets[0].rpe"
        );
    }

    #[test]
    fn test_progress_missing_mood() {
        let input: ProgressInput = serde_json::from_value(json!({
            "workout_id": Uuid::new_v4(),
            "duration_minutes": 30
        }))
        .unwrap();

        assert_eq!(field_of(input.build(meta(), None).unwrap_err()), "mood");
    }

    #[test]
    fn test_bodyweight_set_allowed() {
        let set = PerformedSetInput {
            weight: Some(0.0),
            reps: Some(12),
            rpe: None,
        };
        assert!(set.build("s").is_ok());
    }
}
