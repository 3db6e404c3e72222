use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use super::repo_types::MealType;
use crate::dates::iso_date;

#[derive(Debug, Deserialize)]
pub struct CreateMealEntryRequest {
    pub food_id: Uuid,
    #[serde(default)]
    pub meal_type: MealType,
    #[serde(default = "one_serving")]
    pub quantity: f64, // servings
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
}

fn one_serving() -> f64 {
    1.0
}

impl CreateMealEntryRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err("Quantity must be greater than zero".into());
        }
        Ok(())
    }
}
