//! Population of document references.
//!
//! Workouts and progress entries store only the ids of the exercises and
//! workouts they reference. These views join the referenced documents in,
//! leaving `null` where the referenced document no longer exists.

use crate::store::{Document, Store};
use crate::{
    Difficulty, Exercise, Mood, PerformedSet, Result, Workout, WorkoutExercise, WorkoutProgress,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Id and name of a referenced document
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Reference {
    pub id: Uuid,
    pub name: String,
}

impl From<&Exercise> for Reference {
    fn from(exercise: &Exercise) -> Self {
        Self {
            id: exercise.id,
            name: exercise.name.clone(),
        }
    }
}

impl From<&Workout> for Reference {
    fn from(workout: &Workout) -> Self {
        Self {
            id: workout.id,
            name: workout.name.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PopulatedWorkoutExercise {
    pub exercise_id: Uuid,
    pub exercise: Option<Exercise>,
    pub sets: u32,
    pub reps: String,
    pub rest_seconds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A workout with each exercise reference replaced by the full exercise
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PopulatedWorkout {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub exercises: Vec<PopulatedWorkoutExercise>,
    pub frequency: String,
    pub duration_minutes: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PopulatedWorkout {
    /// Case-insensitive match against the workout name
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PopulatedExerciseProgress {
    pub exercise_id: Uuid,
    pub exercise: Option<Reference>,
    pub sets: Vec<PerformedSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A progress entry with workout and exercise names joined in
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PopulatedProgress {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub workout: Option<Reference>,
    pub date: DateTime<Utc>,
    pub duration_minutes: u32,
    pub mood: Mood,
    pub exercises: Vec<PopulatedExerciseProgress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn index_by_id<D: Document>(docs: Vec<D>) -> HashMap<Uuid, D> {
    docs.into_iter().map(|doc| (doc.id(), doc)).collect()
}

/// Lookup tables used to resolve references
pub struct References {
    exercises: HashMap<Uuid, Exercise>,
    workouts: HashMap<Uuid, Workout>,
}

impl References {
    /// Load both referenced collections from the store
    pub fn load(store: &Store) -> Result<Self> {
        Ok(Self::new(store.list()?, store.list()?))
    }

    pub fn new(exercises: Vec<Exercise>, workouts: Vec<Workout>) -> Self {
        Self {
            exercises: index_by_id(exercises),
            workouts: index_by_id(workouts),
        }
    }

    pub fn exercise(&self, id: Uuid) -> Option<&Exercise> {
        self.exercises.get(&id)
    }

    pub fn workout(&self, id: Uuid) -> Option<&Workout> {
        self.workouts.get(&id)
    }

    pub fn populate_workout(&self, workout: Workout) -> PopulatedWorkout {
        let exercises = workout
            .exercises
            .into_iter()
            .map(|item: WorkoutExercise| PopulatedWorkoutExercise {
                exercise: self.exercise(item.exercise_id).cloned(),
                exercise_id: item.exercise_id,
                sets: item.sets,
                reps: item.reps,
                rest_seconds: item.rest_seconds,
                notes: item.notes,
            })
            .collect();

        PopulatedWorkout {
            id: workout.id,
            name: workout.name,
            description: workout.description,
            difficulty: workout.difficulty,
            exercises,
            frequency: workout.frequency,
            duration_minutes: workout.duration_minutes,
            created_at: workout.created_at,
            updated_at: workout.updated_at,
        }
    }

    pub fn populate_progress(&self, progress: WorkoutProgress) -> PopulatedProgress {
        let exercises = progress
            .exercises
            .into_iter()
            .map(|item| PopulatedExerciseProgress {
                exercise: self.exercise(item.exercise_id).map(Reference::from),
                exercise_id: item.exercise_id,
                sets: item.sets,
                notes: item.notes,
            })
            .collect();

        PopulatedProgress {
            id: progress.id,
            workout: self.workout(progress.workout_id).map(Reference::from),
            workout_id: progress.workout_id,
            date: progress.date,
            duration_minutes: progress.duration_minutes,
            mood: progress.mood,
            exercises,
            notes: progress.notes,
            created_at: progress.created_at,
            updated_at: progress.updated_at,
        }
    }
}

/// All workouts, populated, in insertion order
pub fn list_workouts(store: &Store) -> Result<Vec<PopulatedWorkout>> {
    let refs = References::new(store.list()?, Vec::new());
    Ok(store
        .list::<Workout>()?
        .into_iter()
        .map(|w| refs.populate_workout(w))
        .collect())
}

/// One workout, populated
pub fn get_workout(store: &Store, id: Uuid) -> Result<PopulatedWorkout> {
    let workout: Workout = store.get(id)?;
    let refs = References::new(store.list()?, Vec::new());
    Ok(refs.populate_workout(workout))
}

/// All progress entries, populated, newest date first
pub fn list_progress(store: &Store) -> Result<Vec<PopulatedProgress>> {
    let refs = References::load(store)?;
    let mut entries = store.list::<WorkoutProgress>()?;
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(entries
        .into_iter()
        .map(|p| refs.populate_progress(p))
        .collect())
}

/// One progress entry, populated
pub fn get_progress(store: &Store, id: Uuid) -> Result<PopulatedProgress> {
    let progress: WorkoutProgress = store.get(id)?;
    Ok(References::load(store)?.populate_progress(progress))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{
        ExerciseInput, ExerciseProgressInput, PerformedSetInput, ProgressInput,
        WorkoutExerciseInput, WorkoutInput,
    };
    use chrono::TimeZone;

    fn seed_exercise(store: &Store, name: &str) -> Exercise {
        store
            .create(ExerciseInput {
                name: Some(name.into()),
                description: Some("desc".into()),
                muscle_group: Some("Back".into()),
                equipment: Some("Bar".into()),
                ..Default::default()
            })
            .unwrap()
    }

    fn seed_workout(store: &Store, exercise_ids: &[Uuid]) -> Workout {
        store
            .create(WorkoutInput {
                name: Some("Pull".into()),
                description: Some("Pull day".into()),
                difficulty: Some(Difficulty::Beginner),
                frequency: Some("2x week".into()),
                duration_minutes: Some(40),
                exercises: exercise_ids
                    .iter()
                    .map(|id| WorkoutExerciseInput {
                        exercise_id: Some(*id),
                        sets: Some(3),
                        reps: Some("10".into()),
                        rest_seconds: Some(90),
                        notes: None,
                    })
                    .collect(),
            })
            .unwrap()
    }

    fn seed_progress(store: &Store, workout_id: Uuid, exercise_id: Uuid, day: u32) -> WorkoutProgress {
        store
            .create(ProgressInput {
                workout_id: Some(workout_id),
                date: Some(Utc.with_ymd_and_hms(2024, 5, day, 18, 0, 0).unwrap().into()),
                duration_minutes: Some(45),
                mood: Some(Mood::Good),
                exercises: vec![ExerciseProgressInput {
                    exercise_id: Some(exercise_id),
                    sets: vec![PerformedSetInput {
                        weight: Some(40.0),
                        reps: Some(8),
                        rpe: Some(8.0),
                    }],
                    notes: None,
                }],
                notes: None,
            })
            .unwrap()
    }

    #[test]
    fn test_workout_population_and_dangling_reference() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path()).unwrap();

        let pullup = seed_exercise(&store, "Pull-up");
        let row = seed_exercise(&store, "Row");
        let workout = seed_workout(&store, &[pullup.id, row.id]);

        store.delete::<Exercise>(row.id).unwrap();

        let populated = get_workout(&store, workout.id).unwrap();
        assert_eq!(populated.exercises.len(), 2);
        assert_eq!(populated.exercises[0].exercise.as_ref(), Some(&pullup));
        assert_eq!(populated.exercises[1].exercise, None);
        assert_eq!(populated.exercises[1].exercise_id, row.id);

        let json = serde_json::to_value(&populated).unwrap();
        assert!(json["exercises"][1]["exercise"].is_null());
    }

    #[test]
    fn test_progress_listing_is_newest_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path()).unwrap();

        let pullup = seed_exercise(&store, "Pull-up");
        let workout = seed_workout(&store, &[pullup.id]);

        let older = seed_progress(&store, workout.id, pullup.id, 1);
        let newer = seed_progress(&store, workout.id, pullup.id, 20);
        let middle = seed_progress(&store, workout.id, pullup.id, 10);

        let listed = list_progress(&store).unwrap();
        let ids: Vec<_> = listed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![newer.id, middle.id, older.id]);

        let first = &listed[0];
        assert_eq!(first.workout.as_ref().map(|w| w.name.as_str()), Some("Pull"));
        assert_eq!(
            first.exercises[0].exercise.as_ref().map(|e| e.name.as_str()),
            Some("Pull-up")
        );
    }

    #[test]
    fn test_progress_with_deleted_workout() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path()).unwrap();

        let pullup = seed_exercise(&store, "Pull-up");
        let workout = seed_workout(&store, &[pullup.id]);
        let progress = seed_progress(&store, workout.id, pullup.id, 3);

        store.delete::<Workout>(workout.id).unwrap();

        let populated = get_progress(&store, progress.id).unwrap();
        assert_eq!(populated.workout, None);
        assert_eq!(populated.workout_id, workout.id);
    }

    #[test]
    fn test_list_workouts_empty_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path()).unwrap();
        assert!(list_workouts(&store).unwrap().is_empty());
    }
}
