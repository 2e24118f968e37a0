//! Core domain types for FitLog.
//!
//! This module defines the persisted documents:
//! - Exercises in the catalog
//! - Workout plans and their prescribed exercises
//! - Logged workout sessions and the sets actually performed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Enumerations
// ============================================================================

/// Difficulty tier of a workout plan
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[serde(alias = "principiante")]
    Beginner,
    #[serde(alias = "intermedio")]
    Intermediate,
    #[serde(alias = "avanzato")]
    Advanced,
}

/// How the session felt
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[serde(alias = "ottimo")]
    Excellent,
    #[serde(alias = "buono")]
    Good,
    #[serde(alias = "normale")]
    Normal,
    #[serde(alias = "stanco")]
    Tired,
    #[serde(alias = "pessimo")]
    Poor,
}

// ============================================================================
// Exercise Catalog
// ============================================================================

/// An exercise in the catalog
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Primary muscle group targeted
    pub muscle_group: String,
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    pub equipment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Exercise {
    /// Case-insensitive match against name or primary muscle group
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.muscle_group.to_lowercase().contains(&query)
    }
}

// ============================================================================
// Workout Plans
// ============================================================================

/// One prescribed exercise within a workout plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutExercise {
    pub exercise_id: Uuid,
    pub sets: u32,
    /// Free text, e.g. "12", "8-12", "to failure"
    pub reps: String,
    pub rest_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A workout plan ("scheda")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
    /// Free text, e.g. "3 times a week"
    pub frequency: String,
    /// Estimated duration in minutes
    pub duration_minutes: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Logged Sessions
// ============================================================================

/// A set actually performed
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PerformedSet {
    pub weight: f64,
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
}

/// Sets performed for one exercise during a session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseProgress {
    pub exercise_id: Uuid,
    #[serde(default)]
    pub sets: Vec<PerformedSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A logged workout session ("progresso")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutProgress {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub date: DateTime<Utc>,
    /// Session length in minutes
    pub duration_minutes: u32,
    pub mood: Mood,
    #[serde(default)]
    pub exercises: Vec<ExerciseProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
