use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// One movement inside a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub duration: Option<u32>, // seconds
    pub description: String,
}

/// Catalog workout, seeded or user-authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub duration: u32, // minutes
    pub calories_burn: f64,
    pub instructions: Vec<String>,
    pub exercises: Vec<Exercise>,
}

/// Workout as submitted, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewWorkout {
    pub name: String,
    pub category: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub duration: u32,
    pub calories_burn: f64,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub exercises: Vec<NewExercise>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewExercise {
    pub name: String,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub duration: Option<u32>,
    #[serde(default)]
    pub description: String,
}

impl NewWorkout {
    pub fn into_workout(self, id: Uuid) -> Workout {
        Workout {
            id,
            name: self.name,
            category: self.category,
            description: self.description,
            difficulty: self.difficulty,
            duration: self.duration,
            calories_burn: self.calories_burn,
            instructions: self.instructions,
            exercises: self
                .exercises
                .into_iter()
                .map(|e| Exercise {
                    id: Uuid::new_v4(),
                    name: e.name,
                    sets: e.sets,
                    reps: e.reps,
                    duration: e.duration,
                    description: e.description,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub calories: f64,
    pub protein: f64, // grams
    pub carbs: f64,
    pub fat: f64,
    pub serving_size: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewFood {
    pub name: String,
    pub category: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub serving_size: String,
}

impl NewFood {
    pub fn into_food(self, id: Uuid) -> Food {
        Food {
            id,
            name: self.name,
            category: self.category,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            serving_size: self.serving_size,
        }
    }
}

/// Case-insensitive substring match over name or category.
pub(crate) fn matches_query(name: &str, category: &str, query: &str) -> bool {
    let q = query.to_lowercase();
    name.to_lowercase().contains(&q) || category.to_lowercase().contains(&q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_matches_name_or_category_ignoring_case() {
        assert!(matches_query("HIIT Cardio Blast", "cardio", "hiit"));
        assert!(matches_query("Morning Yoga Flow", "yoga", "YOGA"));
        assert!(matches_query("Brown Rice", "grain", "GRA"));
        assert!(!matches_query("Brown Rice", "grain", "salmon"));
        assert!(matches_query("Anything", "else", ""));
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Advanced).unwrap();
        assert_eq!(json, "\"advanced\"");
    }
}
