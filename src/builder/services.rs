use std::fmt;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{
    catalog::repo_types::{Difficulty, NewExercise, NewWorkout},
    timer::{whole_seconds, WorkoutTimer},
    workout_log::repo_types::{Intensity, NewWorkoutEntry},
};

/// Estimated burn for ad-hoc workouts.
pub const CALORIES_PER_MINUTE: f64 = 5.0;
const DEFAULT_SETS: u32 = 3;
const DEFAULT_REPS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuilderPhase {
    Editing,
    Active,
    Completed,
}

impl fmt::Display for BuilderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuilderPhase::Editing => "being edited",
            BuilderPhase::Active => "in progress",
            BuilderPhase::Completed => "completed",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("custom workout {0} not found")]
    NotFound(Uuid),
    #[error("exercise {0} not found")]
    UnknownExercise(Uuid),
    #[error("Please enter a workout name")]
    MissingName,
    #[error("Please add at least one exercise")]
    NoExercises,
    #[error("cannot {action} while the workout is {phase}")]
    WrongPhase {
        action: &'static str,
        phase: BuilderPhase,
    },
    #[error("Only the current exercise can be started")]
    NotCurrent,
    #[error("Exercise already completed")]
    AlreadyCompleted,
    #[error("Exercise is not running")]
    NotRunning,
}

impl From<BuilderError> for (StatusCode, String) {
    fn from(e: BuilderError) -> Self {
        let status = match e {
            BuilderError::NotFound(_) | BuilderError::UnknownExercise(_) => StatusCode::NOT_FOUND,
            BuilderError::MissingName | BuilderError::NoExercises => StatusCode::BAD_REQUEST,
            BuilderError::WrongPhase { .. }
            | BuilderError::NotCurrent
            | BuilderError::AlreadyCompleted
            | BuilderError::NotRunning => StatusCode::CONFLICT,
        };
        (status, e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuilderExercise {
    pub id: Uuid,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: Option<f64>,
    pub completed: bool,
    pub time_spent: Option<u64>, // seconds
    pub notes: Option<String>,
}

/// Partial update of an exercise; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExercisePatch {
    pub name: Option<String>,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

impl ExercisePatch {
    fn only_notes(&self) -> bool {
        self.name.is_none() && self.sets.is_none() && self.reps.is_none() && self.weight.is_none()
    }
}

/// Everything needed to persist a finished custom workout.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomWorkoutDraft {
    pub workout: NewWorkout,
    pub date: Date,
    pub duration: u32,
    pub notes: Option<String>,
}

impl CustomWorkoutDraft {
    /// Entry for `user_id` pointing at the stored workout.
    pub fn entry(&self, user_id: Uuid, workout_id: Uuid) -> NewWorkoutEntry {
        NewWorkoutEntry {
            user_id,
            workout_id,
            date: self.date,
            duration: self.duration,
            intensity: Intensity::Medium,
            notes: self.notes.clone(),
        }
    }
}

/// Ad-hoc workout being assembled and then performed, one exercise at a time.
#[derive(Debug, Clone)]
pub struct CustomWorkoutBuilder {
    id: Uuid,
    owner: Uuid,
    name: String,
    description: String,
    exercises: Vec<BuilderExercise>,
    phase: BuilderPhase,
    timer: WorkoutTimer,
    current_index: usize,
    active: Option<(Uuid, OffsetDateTime)>,
}

impl CustomWorkoutBuilder {
    pub fn new(owner: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            name: String::new(),
            description: String::new(),
            exercises: Vec::new(),
            phase: BuilderPhase::Editing,
            timer: WorkoutTimer::new(),
            current_index: 0,
            active: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn phase(&self) -> BuilderPhase {
        self.phase
    }

    pub fn exercises(&self) -> &[BuilderExercise] {
        &self.exercises
    }

    pub fn timer(&self) -> &WorkoutTimer {
        &self.timer
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn active_exercise(&self) -> Option<Uuid> {
        self.active.map(|(id, _)| id)
    }

    fn require(&self, phase: BuilderPhase, action: &'static str) -> Result<(), BuilderError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(BuilderError::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }

    fn position(&self, id: Uuid) -> Result<usize, BuilderError> {
        self.exercises
            .iter()
            .position(|e| e.id == id)
            .ok_or(BuilderError::UnknownExercise(id))
    }

    pub fn set_details(&mut self, name: String, description: String) -> Result<(), BuilderError> {
        self.require(BuilderPhase::Editing, "rename")?;
        self.name = name;
        self.description = description;
        Ok(())
    }

    /// Appends a blank exercise with 3 sets of 10.
    pub fn add_exercise(&mut self) -> Result<Uuid, BuilderError> {
        self.require(BuilderPhase::Editing, "add exercises")?;
        let id = Uuid::new_v4();
        self.exercises.push(BuilderExercise {
            id,
            name: String::new(),
            sets: DEFAULT_SETS,
            reps: DEFAULT_REPS,
            weight: None,
            completed: false,
            time_spent: None,
            notes: None,
        });
        Ok(id)
    }

    pub fn remove_exercise(&mut self, id: Uuid) -> Result<(), BuilderError> {
        self.require(BuilderPhase::Editing, "remove exercises")?;
        let pos = self.position(id)?;
        self.exercises.remove(pos);
        Ok(())
    }

    /// While editing any field may change. After the workout only notes may.
    pub fn update_exercise(&mut self, id: Uuid, patch: ExercisePatch) -> Result<(), BuilderError> {
        match self.phase {
            BuilderPhase::Editing => {}
            BuilderPhase::Completed if patch.only_notes() => {}
            phase => {
                return Err(BuilderError::WrongPhase {
                    action: "edit exercises",
                    phase,
                })
            }
        }
        let pos = self.position(id)?;
        let ex = &mut self.exercises[pos];
        if let Some(name) = patch.name {
            ex.name = name;
        }
        if let Some(sets) = patch.sets {
            ex.sets = sets;
        }
        if let Some(reps) = patch.reps {
            ex.reps = reps;
        }
        if let Some(weight) = patch.weight {
            ex.weight = Some(weight);
        }
        if let Some(notes) = patch.notes {
            ex.notes = Some(notes);
        }
        Ok(())
    }

    pub fn start(&mut self, now: OffsetDateTime) -> Result<(), BuilderError> {
        self.require(BuilderPhase::Editing, "start")?;
        if self.name.trim().is_empty() {
            return Err(BuilderError::MissingName);
        }
        if self.exercises.is_empty() {
            return Err(BuilderError::NoExercises);
        }
        self.timer.start(now);
        self.current_index = 0;
        self.phase = BuilderPhase::Active;
        Ok(())
    }

    /// Starts the current exercise, completing whichever one was running.
    pub fn start_exercise(&mut self, id: Uuid, now: OffsetDateTime) -> Result<(), BuilderError> {
        self.require(BuilderPhase::Active, "start an exercise")?;
        let pos = self.position(id)?;
        if self.exercises[pos].completed {
            return Err(BuilderError::AlreadyCompleted);
        }
        // Index that will be current once the running exercise is completed.
        let expected = match self.active {
            Some((running, _)) if running == id => return Ok(()),
            Some((running, _)) => {
                let rp = self.position(running)?;
                if rp + 1 < self.exercises.len() {
                    rp + 1
                } else {
                    rp
                }
            }
            None => self.current_index,
        };
        if pos != expected {
            return Err(BuilderError::NotCurrent);
        }
        if let Some((running, _)) = self.active {
            self.complete_exercise(running, now)?;
        }
        self.active = Some((id, now));
        Ok(())
    }

    /// Finishes the running exercise and moves on to the next one.
    pub fn complete_exercise(&mut self, id: Uuid, now: OffsetDateTime) -> Result<u64, BuilderError> {
        self.require(BuilderPhase::Active, "complete an exercise")?;
        let pos = self.position(id)?;
        let started_at = match self.active {
            Some((running, started_at)) if running == id => started_at,
            _ => return Err(BuilderError::NotRunning),
        };
        let spent = whole_seconds(started_at, now);
        let ex = &mut self.exercises[pos];
        ex.time_spent = Some(spent);
        ex.completed = true;
        self.active = None;
        if pos + 1 < self.exercises.len() {
            self.current_index = pos + 1;
        }
        Ok(spent)
    }

    /// Ends the session and returns the floor-rounded minutes.
    pub fn stop(&mut self, now: OffsetDateTime) -> Result<u32, BuilderError> {
        self.require(BuilderPhase::Active, "stop")?;
        if let Some((running, _)) = self.active {
            self.complete_exercise(running, now)?;
        }
        let minutes = self.timer.stop(now).unwrap_or(0);
        self.phase = BuilderPhase::Completed;
        Ok(minutes)
    }

    /// Materializes the catalog workout and entry fields for a finished session.
    pub fn save(&self, today: Date) -> Result<CustomWorkoutDraft, BuilderError> {
        self.require(BuilderPhase::Completed, "save")?;
        if self.name.trim().is_empty() {
            return Err(BuilderError::MissingName);
        }
        if self.exercises.is_empty() {
            return Err(BuilderError::NoExercises);
        }
        let minutes = self.timer.final_minutes().unwrap_or(0);
        let description = match self.description.trim() {
            "" => "Custom workout".to_string(),
            d => d.to_string(),
        };
        let notes = match self.description.trim() {
            "" => None,
            d => Some(d.to_string()),
        };

        let workout = NewWorkout {
            name: self.name.trim().to_string(),
            category: "custom".into(),
            description,
            difficulty: Difficulty::Intermediate,
            duration: minutes,
            calories_burn: f64::from(minutes) * CALORIES_PER_MINUTE,
            instructions: vec!["Custom workout created by user".into()],
            exercises: self
                .exercises
                .iter()
                .map(|e| NewExercise {
                    name: e.name.clone(),
                    sets: Some(e.sets),
                    reps: Some(e.reps),
                    duration: e.time_spent.map(|s| u32::try_from(s).unwrap_or(u32::MAX)),
                    description: e.notes.clone().unwrap_or_default(),
                })
                .collect(),
        };

        Ok(CustomWorkoutDraft {
            workout,
            date: today,
            duration: minutes,
            notes,
        })
    }
}
