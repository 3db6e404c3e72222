use serde::Deserialize;

use super::repo_types::{NewFood, NewWorkout};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

impl SearchQuery {
    /// Search term, if any non-blank one was given.
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Form checks for a custom food, run before the store is touched.
pub fn validate_food(food: &NewFood) -> Result<(), String> {
    if food.name.trim().is_empty() {
        return Err("Food name is required".into());
    }
    if food.serving_size.trim().is_empty() {
        return Err("Serving size is required".into());
    }
    for (label, value) in [
        ("Calories", food.calories),
        ("Protein", food.protein),
        ("Carbs", food.carbs),
        ("Fat", food.fat),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{label} cannot be negative"));
        }
    }
    Ok(())
}

pub fn validate_workout(workout: &NewWorkout) -> Result<(), String> {
    if workout.name.trim().is_empty() {
        return Err("Please enter a workout name".into());
    }
    if !workout.calories_burn.is_finite() || workout.calories_burn < 0.0 {
        return Err("Calories burned cannot be negative".into());
    }
    Ok(())
}
