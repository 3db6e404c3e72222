use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use super::repo_types::{Intensity, NewWorkoutEntry};
use crate::dates::iso_date;

/// Longest session a manual log accepts: one day.
pub const MAX_LOGGED_MINUTES: u32 = 24 * 60;

#[derive(Debug, Deserialize)]
pub struct CreateWorkoutEntryRequest {
    pub workout_id: Uuid,
    #[serde(default)]
    pub duration: u32, // minutes
    #[serde(default)]
    pub intensity: Intensity,
    pub notes: Option<String>,
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
}

impl CreateWorkoutEntryRequest {
    /// Checks the form and stamps the entry for `user_id`, falling back to `today`.
    pub fn into_new_entry(self, user_id: Uuid, today: Date) -> Result<NewWorkoutEntry, String> {
        if self.duration == 0 {
            return Err("Please enter workout duration".into());
        }
        if self.duration > MAX_LOGGED_MINUTES {
            return Err(format!(
                "Duration cannot exceed {MAX_LOGGED_MINUTES} minutes"
            ));
        }
        Ok(NewWorkoutEntry {
            user_id,
            workout_id: self.workout_id,
            date: self.date.unwrap_or(today),
            duration: self.duration,
            intensity: self.intensity,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    #[test]
    fn blank_notes_are_dropped_and_intensity_defaults() {
        let req: CreateWorkoutEntryRequest = serde_json::from_value(json!({
            "workout_id": Uuid::from_u128(3),
            "duration": 20,
            "notes": "  "
        }))
        .unwrap();
        let entry = req
            .into_new_entry(Uuid::from_u128(1), date!(2024 - 05 - 01))
            .unwrap();
        assert_eq!(entry.intensity, Intensity::Medium);
        assert_eq!(entry.notes, None);
        assert_eq!(entry.date, date!(2024 - 05 - 01));
    }

    #[test]
    fn missing_duration_is_rejected() {
        let req: CreateWorkoutEntryRequest =
            serde_json::from_value(json!({ "workout_id": Uuid::from_u128(3) })).unwrap();
        let err = req
            .into_new_entry(Uuid::from_u128(1), date!(2024 - 05 - 01))
            .unwrap_err();
        assert_eq!(err, "Please enter workout duration");
    }

    #[test]
    fn duration_is_capped_at_one_day() {
        let req = |duration: u32| CreateWorkoutEntryRequest {
            workout_id: Uuid::from_u128(3),
            duration,
            intensity: Intensity::High,
            notes: None,
            date: None,
        };
        let today = date!(2024 - 05 - 01);
        assert!(req(MAX_LOGGED_MINUTES).into_new_entry(Uuid::from_u128(1), today).is_ok());
        assert_eq!(
            req(MAX_LOGGED_MINUTES + 1)
                .into_new_entry(Uuid::from_u128(1), today)
                .unwrap_err(),
            "Duration cannot exceed 1440 minutes"
        );
    }
}
