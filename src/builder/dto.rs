use serde::{Deserialize, Serialize};

use crate::{catalog::repo_types::Workout, workout_log::repo_types::WorkoutEntry};

#[derive(Debug, Default, Deserialize)]
pub struct BuilderDetailsRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct SavedCustomWorkout {
    pub workout: Workout,
    pub entry: WorkoutEntry,
}
