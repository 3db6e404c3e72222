use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::{catalog::repo_types::Workout, dates::iso_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    #[default]
    Medium,
    High,
}

/// A performed workout. `workout` is a copy taken when the entry was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_id: Uuid,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub duration: u32, // minutes actually spent
    pub intensity: Intensity,
    pub notes: Option<String>,
    pub workout: Workout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkoutEntry {
    pub user_id: Uuid,
    pub workout_id: Uuid,
    pub date: Date,
    pub duration: u32,
    pub intensity: Intensity,
    pub notes: Option<String>,
}

impl NewWorkoutEntry {
    pub fn into_entry(self, id: Uuid, workout: Workout) -> WorkoutEntry {
        WorkoutEntry {
            id,
            user_id: self.user_id,
            workout_id: self.workout_id,
            date: self.date,
            duration: self.duration,
            intensity: self.intensity,
            notes: self.notes,
            workout,
        }
    }
}
