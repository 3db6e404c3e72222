use std::time::Duration;

use async_trait::async_trait;
use time::Date;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{seed::SeedData, FitnessStore, StoreError, StoreResult};
use crate::{
    catalog::repo_types::{matches_query, Food, NewFood, NewWorkout, Workout},
    meals::repo_types::{MealEntry, NewMealEntry},
    workout_log::repo_types::{NewWorkoutEntry, WorkoutEntry},
};

#[derive(Default)]
struct Collections {
    workouts: Vec<Workout>,
    foods: Vec<Food>,
    meal_entries: Vec<MealEntry>,
    workout_entries: Vec<WorkoutEntry>,
}

/// Process-memory store with a fixed simulated latency on every call.
pub struct InMemoryStore {
    latency: Duration,
    data: RwLock<Collections>,
}

impl InMemoryStore {
    pub fn new(latency: Duration) -> Self {
        Self::with_seed(SeedData::default(), latency)
    }

    pub fn with_seed(seed: SeedData, latency: Duration) -> Self {
        Self {
            latency,
            data: RwLock::new(Collections {
                workouts: seed.workouts,
                foods: seed.foods,
                meal_entries: seed.meal_entries,
                workout_entries: seed.workout_entries,
            }),
        }
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl FitnessStore for InMemoryStore {
    async fn list_workouts(&self) -> StoreResult<Vec<Workout>> {
        self.delay().await;
        Ok(self.data.read().await.workouts.clone())
    }

    async fn search_workouts(&self, query: &str) -> StoreResult<Vec<Workout>> {
        self.delay().await;
        let data = self.data.read().await;
        Ok(data
            .workouts
            .iter()
            .filter(|w| matches_query(&w.name, &w.category, query))
            .cloned()
            .collect())
    }

    async fn get_workout(&self, id: Uuid) -> StoreResult<Workout> {
        self.delay().await;
        let data = self.data.read().await;
        data.workouts
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or(StoreError::not_found("workout", id))
    }

    async fn add_custom_workout(&self, workout: NewWorkout) -> StoreResult<Workout> {
        self.delay().await;
        let workout = workout.into_workout(Uuid::new_v4());
        self.data.write().await.workouts.push(workout.clone());
        debug!(workout_id = %workout.id, name = %workout.name, "custom workout stored");
        Ok(workout)
    }

    async fn list_foods(&self) -> StoreResult<Vec<Food>> {
        self.delay().await;
        Ok(self.data.read().await.foods.clone())
    }

    async fn search_foods(&self, query: &str) -> StoreResult<Vec<Food>> {
        self.delay().await;
        let data = self.data.read().await;
        Ok(data
            .foods
            .iter()
            .filter(|f| matches_query(&f.name, &f.category, query))
            .cloned()
            .collect())
    }

    async fn get_food(&self, id: Uuid) -> StoreResult<Food> {
        self.delay().await;
        let data = self.data.read().await;
        data.foods
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or(StoreError::not_found("food", id))
    }

    async fn add_custom_food(&self, food: NewFood) -> StoreResult<Food> {
        self.delay().await;
        let food = food.into_food(Uuid::new_v4());
        self.data.write().await.foods.push(food.clone());
        debug!(food_id = %food.id, name = %food.name, "custom food stored");
        Ok(food)
    }

    async fn list_meal_entries(&self, user_id: Uuid, date: Date) -> StoreResult<Vec<MealEntry>> {
        self.delay().await;
        let data = self.data.read().await;
        Ok(data
            .meal_entries
            .iter()
            .filter(|e| e.user_id == user_id && e.date == date)
            .cloned()
            .collect())
    }

    async fn list_all_meal_entries(&self, user_id: Uuid) -> StoreResult<Vec<MealEntry>> {
        self.delay().await;
        let data = self.data.read().await;
        Ok(data
            .meal_entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add_meal_entry(&self, entry: NewMealEntry) -> StoreResult<MealEntry> {
        if !entry.quantity.is_finite() || entry.quantity <= 0.0 {
            return Err(StoreError::Invalid(
                "Quantity must be greater than zero".into(),
            ));
        }
        self.delay().await;
        let mut data = self.data.write().await;
        let food = data
            .foods
            .iter()
            .find(|f| f.id == entry.food_id)
            .cloned()
            .ok_or(StoreError::not_found("food", entry.food_id))?;
        let entry = entry.into_entry(Uuid::new_v4(), food);
        data.meal_entries.push(entry.clone());
        Ok(entry)
    }

    async fn delete_meal_entry(&self, user_id: Uuid, id: Uuid) -> StoreResult<()> {
        self.delay().await;
        let mut data = self.data.write().await;
        let pos = data
            .meal_entries
            .iter()
            .position(|e| e.id == id && e.user_id == user_id)
            .ok_or(StoreError::not_found("meal entry", id))?;
        data.meal_entries.remove(pos);
        Ok(())
    }

    async fn list_workout_entries(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> StoreResult<Vec<WorkoutEntry>> {
        self.delay().await;
        let data = self.data.read().await;
        Ok(data
            .workout_entries
            .iter()
            .filter(|e| e.user_id == user_id && e.date == date)
            .cloned()
            .collect())
    }

    async fn add_workout_entry(&self, entry: NewWorkoutEntry) -> StoreResult<WorkoutEntry> {
        self.delay().await;
        let mut data = self.data.write().await;
        let workout = data
            .workouts
            .iter()
            .find(|w| w.id == entry.workout_id)
            .cloned()
            .ok_or(StoreError::not_found("workout", entry.workout_id))?;
        let entry = entry.into_entry(Uuid::new_v4(), workout);
        data.workout_entries.push(entry.clone());
        Ok(entry)
    }

    async fn delete_workout_entry(&self, user_id: Uuid, id: Uuid) -> StoreResult<()> {
        self.delay().await;
        let mut data = self.data.write().await;
        let pos = data
            .workout_entries
            .iter()
            .position(|e| e.id == id && e.user_id == user_id)
            .ok_or(StoreError::not_found("workout entry", id))?;
        data.workout_entries.remove(pos);
        Ok(())
    }
}
