use serde::Serialize;
use time::Date;

use crate::{
    dates::iso_date, meals::repo_types::MealEntry, workout_log::repo_types::WorkoutEntry,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WorkoutTotals {
    pub duration: u64, // minutes
    pub calories_burned: f64,
}

/// Consumed macros: each food snapshot scaled by its quantity.
pub fn nutrition_totals(entries: &[MealEntry]) -> NutritionTotals {
    entries
        .iter()
        .fold(NutritionTotals::default(), |acc, e| NutritionTotals {
            calories: acc.calories + e.food.calories * e.quantity,
            protein: acc.protein + e.food.protein * e.quantity,
            carbs: acc.carbs + e.food.carbs * e.quantity,
            fat: acc.fat + e.food.fat * e.quantity,
        })
}

/// Nominal burn prorated to the minutes actually spent.
pub fn calories_burned(entry: &WorkoutEntry) -> f64 {
    if entry.workout.duration == 0 {
        return 0.0;
    }
    entry.workout.calories_burn * f64::from(entry.duration) / f64::from(entry.workout.duration)
}

pub fn workout_totals(entries: &[WorkoutEntry]) -> WorkoutTotals {
    entries
        .iter()
        .fold(WorkoutTotals::default(), |acc, e| WorkoutTotals {
            duration: acc.duration.saturating_add(u64::from(e.duration)),
            calories_burned: acc.calories_burned + calories_burned(e),
        })
}

pub fn net_calories(nutrition: &NutritionTotals, workouts: &WorkoutTotals) -> f64 {
    nutrition.calories - workouts.calories_burned
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealHistoryDay {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub entries: Vec<MealEntry>,
    pub total_calories: f64,
}

/// Groups entries by day, newest day first. Entries keep their logged order
/// within a day.
pub fn group_meal_history(entries: Vec<MealEntry>) -> Vec<MealHistoryDay> {
    let mut days: Vec<MealHistoryDay> = Vec::new();
    for entry in entries {
        let calories = entry.food.calories * entry.quantity;
        match days.iter_mut().find(|d| d.date == entry.date) {
            Some(day) => {
                day.total_calories += calories;
                day.entries.push(entry);
            }
            None => days.push(MealHistoryDay {
                date: entry.date,
                total_calories: calories,
                entries: vec![entry],
            }),
        }
    }
    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}

/// Dashboard view of one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub nutrition: NutritionTotals,
    pub workouts: WorkoutTotals,
    pub net_calories: f64,
    pub meal_count: usize,
    pub workout_count: usize,
    pub meal_entries: Vec<MealEntry>,
    pub workout_entries: Vec<WorkoutEntry>,
}

pub fn daily_summary(
    date: Date,
    meal_entries: Vec<MealEntry>,
    workout_entries: Vec<WorkoutEntry>,
) -> DailySummary {
    let nutrition = nutrition_totals(&meal_entries);
    let workouts = workout_totals(&workout_entries);
    DailySummary {
        date,
        net_calories: net_calories(&nutrition, &workouts),
        nutrition,
        workouts,
        meal_count: meal_entries.len(),
        workout_count: workout_entries.len(),
        meal_entries,
        workout_entries,
    }
}
