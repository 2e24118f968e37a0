pub mod calculators;
pub mod exercises;
pub mod health;
pub mod progress;
pub mod workouts;

use serde::{Deserialize, Serialize};

/// Optional `?q=` filter on list routes
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

impl SearchQuery {
    /// The trimmed search term, if any
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Body returned by delete routes
#[derive(Debug, Serialize)]
pub struct Deleted {
    message: &'static str,
}

impl Deleted {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}
