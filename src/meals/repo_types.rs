use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::{catalog::repo_types::Food, dates::iso_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    #[default]
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// A logged serving of a food. `food` is a copy taken when the entry was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Uuid,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub meal_type: MealType,
    pub quantity: f64, // servings
    pub food: Food,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMealEntry {
    pub user_id: Uuid,
    pub food_id: Uuid,
    pub date: Date,
    pub meal_type: MealType,
    pub quantity: f64,
}

impl NewMealEntry {
    pub fn into_entry(self, id: Uuid, food: Food) -> MealEntry {
        MealEntry {
            id,
            user_id: self.user_id,
            food_id: self.food_id,
            date: self.date,
            meal_type: self.meal_type,
            quantity: self.quantity,
            food,
        }
    }
}
