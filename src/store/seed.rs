//! Seed catalog and demo-user history.

use time::{Date, Duration};
use uuid::Uuid;

use crate::{
    catalog::repo_types::{Difficulty, Exercise, Food, Workout},
    meals::repo_types::{MealEntry, MealType},
    workout_log::repo_types::{Intensity, WorkoutEntry},
};

pub const DEMO_USER_EMAIL: &str = "user@example.com";
pub const DEMO_USER_PASSWORD: &str = "password123";
pub const DEMO_USER_NAME: &str = "Demo User";

pub fn demo_user_id() -> Uuid {
    Uuid::from_u128(1)
}

/// Seed workout `n` (1-based).
pub fn workout_id(n: u128) -> Uuid {
    Uuid::from_u128(0x1000 + n)
}

/// Seed food `n` (1-based).
pub fn food_id(n: u128) -> Uuid {
    Uuid::from_u128(0x2000 + n)
}

fn entry_id(n: u128) -> Uuid {
    Uuid::from_u128(0x3000 + n)
}

#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub workouts: Vec<Workout>,
    pub foods: Vec<Food>,
    pub meal_entries: Vec<MealEntry>,
    pub workout_entries: Vec<WorkoutEntry>,
}

/// Builds the seed collections, dating the demo history relative to `today`.
pub fn seed_data(today: Date) -> SeedData {
    let workouts = seed_workouts();
    let foods = seed_foods();
    let user_id = demo_user_id();

    let meal = |n: u128, food: usize, meal_type: MealType| MealEntry {
        id: entry_id(n),
        user_id,
        food_id: foods[food].id,
        date: today,
        meal_type,
        quantity: 1.0,
        food: foods[food].clone(),
    };
    let meal_entries = vec![
        meal(1, 0, MealType::Lunch),
        meal(2, 1, MealType::Lunch),
        meal(3, 3, MealType::Breakfast),
    ];

    let workout_entries = vec![
        WorkoutEntry {
            id: entry_id(101),
            user_id,
            workout_id: workouts[0].id,
            date: today,
            duration: 45,
            intensity: Intensity::Medium,
            notes: Some("Felt strong today!".into()),
            workout: workouts[0].clone(),
        },
        WorkoutEntry {
            id: entry_id(102),
            user_id,
            workout_id: workouts[2].id,
            date: today - Duration::days(1),
            duration: 25,
            intensity: Intensity::High,
            notes: Some("Pushed really hard, great session".into()),
            workout: workouts[2].clone(),
        },
    ];

    SeedData {
        workouts,
        foods,
        meal_entries,
        workout_entries,
    }
}

fn exercise(
    workout: u128,
    n: u128,
    name: &str,
    sets: Option<u32>,
    reps: Option<u32>,
    duration: Option<u32>,
    description: &str,
) -> Exercise {
    Exercise {
        id: Uuid::from_u128(0x1_0000 + workout * 0x100 + n),
        name: name.into(),
        sets,
        reps,
        duration,
        description: description.into(),
    }
}

fn steps(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

pub fn seed_workouts() -> Vec<Workout> {
    vec![
        Workout {
            id: workout_id(1),
            name: "Full Body Circuit".into(),
            category: "strength".into(),
            description: "A complete body workout targeting all major muscle groups".into(),
            difficulty: Difficulty::Intermediate,
            duration: 45,
            calories_burn: 350.0,
            instructions: steps(&[
                "Perform each exercise for 45 seconds with 15 seconds rest",
                "Complete 3 rounds of the circuit",
                "Rest 1 minute between rounds",
            ]),
            exercises: vec![
                exercise(1, 1, "Push-ups", Some(3), None, Some(45), "Keep your core tight"),
                exercise(1, 2, "Bodyweight Squats", Some(3), None, Some(45), "Sit back into the heels"),
                exercise(1, 3, "Mountain Climbers", Some(3), None, Some(45), "Drive knees to chest"),
            ],
        },
        Workout {
            id: workout_id(2),
            name: "Morning Yoga Flow".into(),
            category: "yoga".into(),
            description: "Energizing yoga sequence to start your day right".into(),
            difficulty: Difficulty::Beginner,
            duration: 30,
            calories_burn: 150.0,
            instructions: steps(&[
                "Begin with 5 minutes of deep breathing",
                "Move through sun salutations",
                "Hold each pose for 5 breaths",
                "End with 5 minutes of meditation",
            ]),
            exercises: vec![
                exercise(2, 1, "Sun Salutation", Some(5), None, None, "Flow with the breath"),
                exercise(2, 2, "Warrior II", None, None, Some(30), "Hold on each side"),
            ],
        },
        Workout {
            id: workout_id(3),
            name: "HIIT Cardio Blast".into(),
            category: "cardio".into(),
            description: "High intensity interval training to maximize calorie burn".into(),
            difficulty: Difficulty::Advanced,
            duration: 25,
            calories_burn: 400.0,
            instructions: steps(&[
                "30 seconds maximum effort, 30 seconds rest",
                "Complete 10 rounds",
                "Focus on proper form over speed",
            ]),
            exercises: vec![
                exercise(3, 1, "Burpees", Some(10), None, Some(30), "Full extension at the top"),
                exercise(3, 2, "High Knees", Some(10), None, Some(30), "Stay on the balls of your feet"),
            ],
        },
        Workout {
            id: workout_id(4),
            name: "Core Crusher".into(),
            category: "core".into(),
            description: "Focused abdominal workout to strengthen your core".into(),
            difficulty: Difficulty::Intermediate,
            duration: 20,
            calories_burn: 200.0,
            instructions: steps(&[
                "Perform each exercise for 45 seconds",
                "Rest 15 seconds between exercises",
                "Complete 3 rounds",
            ]),
            exercises: vec![
                exercise(4, 1, "Plank", Some(3), None, Some(45), "Straight line from head to heels"),
                exercise(4, 2, "Bicycle Crunches", Some(3), Some(20), None, "Slow and controlled"),
            ],
        },
        Workout {
            id: workout_id(5),
            name: "Lower Body Strength".into(),
            category: "strength".into(),
            description: "Build stronger legs and glutes with this focused workout".into(),
            difficulty: Difficulty::Intermediate,
            duration: 40,
            calories_burn: 300.0,
            instructions: steps(&[
                "Warm up with 5 minutes of light cardio",
                "Perform 3-4 sets of each exercise",
                "Rest 60-90 seconds between sets",
                "Stretch thoroughly after workout",
            ]),
            exercises: vec![
                exercise(5, 1, "Goblet Squats", Some(4), Some(12), None, "Elbows inside the knees"),
                exercise(5, 2, "Walking Lunges", Some(3), Some(10), None, "Per leg"),
                exercise(5, 3, "Glute Bridges", Some(3), Some(15), None, "Squeeze at the top"),
            ],
        },
    ]
}

pub fn seed_foods() -> Vec<Food> {
    let food = |n: u128, name: &str, category: &str, calories: f64, protein: f64, carbs: f64, fat: f64, serving: &str| Food {
        id: food_id(n),
        name: name.into(),
        category: category.into(),
        calories,
        protein,
        carbs,
        fat,
        serving_size: serving.into(),
    };
    vec![
        food(1, "Grilled Chicken Breast", "protein", 165.0, 31.0, 0.0, 3.6, "100g"),
        food(2, "Brown Rice", "grain", 216.0, 5.0, 45.0, 1.8, "1 cup cooked"),
        food(3, "Avocado", "fruit", 240.0, 3.0, 12.0, 22.0, "1 medium"),
        food(4, "Greek Yogurt", "dairy", 130.0, 17.0, 6.0, 4.0, "170g container"),
        food(5, "Banana", "fruit", 105.0, 1.3, 27.0, 0.4, "1 medium"),
        food(6, "Oatmeal", "grain", 158.0, 6.0, 27.0, 3.2, "1 cup cooked"),
        food(7, "Salmon Fillet", "protein", 206.0, 22.0, 0.0, 13.0, "100g"),
        food(8, "Broccoli", "vegetable", 55.0, 3.7, 11.0, 0.6, "1 cup"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn seed_history_belongs_to_demo_user() {
        let today = date!(2024 - 06 - 15);
        let seed = seed_data(today);
        assert_eq!(seed.workouts.len(), 5);
        assert_eq!(seed.foods.len(), 8);
        assert_eq!(seed.meal_entries.len(), 3);
        assert!(seed.meal_entries.iter().all(|e| e.user_id == demo_user_id() && e.date == today));
        assert_eq!(seed.workout_entries[1].date, date!(2024 - 06 - 14));
        assert_eq!(seed.workout_entries[1].workout.name, "HIIT Cardio Blast");
    }

    #[test]
    fn seed_ids_are_unique() {
        let seed = seed_data(date!(2024 - 06 - 15));
        let mut ids: Vec<Uuid> = seed
            .workouts
            .iter()
            .map(|w| w.id)
            .chain(seed.workouts.iter().flat_map(|w| w.exercises.iter().map(|e| e.id)))
            .chain(seed.foods.iter().map(|f| f.id))
            .chain(seed.meal_entries.iter().map(|e| e.id))
            .chain(seed.workout_entries.iter().map(|e| e.id))
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
