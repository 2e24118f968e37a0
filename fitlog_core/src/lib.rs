#![forbid(unsafe_code)]

//! Core domain model and business logic for FitLog.
//!
//! This crate provides:
//! - Domain types (exercises, workout plans, logged sessions)
//! - Input validation
//! - A file-backed document store and reference population
//! - RPE and one-rep-max estimation
//! - CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod exertion;
pub mod validation;
pub mod store;
pub mod populate;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use exertion::{describe_rpe, estimate_one_rep_max, estimate_rpe, rpe_estimate, RpeEstimate};
pub use store::{Document, Store};
pub use validation::{DocumentInput, ExerciseInput, ProgressInput, SessionDate, WorkoutInput};
pub use populate::{PopulatedProgress, PopulatedWorkout, References};
