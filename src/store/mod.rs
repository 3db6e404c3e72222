use async_trait::async_trait;
use axum::http::StatusCode;
use time::Date;
use uuid::Uuid;

use crate::{
    catalog::repo_types::{Food, NewFood, NewWorkout, Workout},
    meals::repo_types::{MealEntry, NewMealEntry},
    workout_log::repo_types::{NewWorkoutEntry, WorkoutEntry},
};

pub mod memory;
pub mod seed;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },
    #[error("{0}")]
    Invalid(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::Invalid(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<StoreError> for (StatusCode, String) {
    fn from(e: StoreError) -> Self {
        (e.status(), e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Catalog and entry log. Every call resolves asynchronously; once a write
/// has resolved, later reads observe it.
#[async_trait]
pub trait FitnessStore: Send + Sync {
    async fn list_workouts(&self) -> StoreResult<Vec<Workout>>;
    async fn search_workouts(&self, query: &str) -> StoreResult<Vec<Workout>>;
    async fn get_workout(&self, id: Uuid) -> StoreResult<Workout>;
    async fn add_custom_workout(&self, workout: NewWorkout) -> StoreResult<Workout>;

    async fn list_foods(&self) -> StoreResult<Vec<Food>>;
    async fn search_foods(&self, query: &str) -> StoreResult<Vec<Food>>;
    async fn get_food(&self, id: Uuid) -> StoreResult<Food>;
    async fn add_custom_food(&self, food: NewFood) -> StoreResult<Food>;

    async fn list_meal_entries(&self, user_id: Uuid, date: Date) -> StoreResult<Vec<MealEntry>>;
    async fn list_all_meal_entries(&self, user_id: Uuid) -> StoreResult<Vec<MealEntry>>;
    async fn add_meal_entry(&self, entry: NewMealEntry) -> StoreResult<MealEntry>;
    async fn delete_meal_entry(&self, user_id: Uuid, id: Uuid) -> StoreResult<()>;

    async fn list_workout_entries(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> StoreResult<Vec<WorkoutEntry>>;
    async fn add_workout_entry(&self, entry: NewWorkoutEntry) -> StoreResult<WorkoutEntry>;
    async fn delete_workout_entry(&self, user_id: Uuid, id: Uuid) -> StoreResult<()>;
}
