use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::services::{BuilderError, BuilderExercise, BuilderPhase, CustomWorkoutBuilder};
use crate::timer::{format_clock, Clock, ElapsedTicker, TimerState};

/// A live builder plus the ticker driving its clock display.
pub struct BuilderSession {
    pub builder: CustomWorkoutBuilder,
    ticker: Option<ElapsedTicker>,
}

impl BuilderSession {
    fn new(builder: CustomWorkoutBuilder) -> Self {
        Self {
            builder,
            ticker: None,
        }
    }

    /// Keeps the ticker in step with the builder's timer.
    pub fn sync_ticker(&mut self, clock: &Arc<dyn Clock>) {
        match self.builder.timer().state() {
            TimerState::Running { started_at } => {
                if self.ticker.is_none() {
                    self.ticker = Some(ElapsedTicker::spawn(started_at, clock.clone()));
                }
            }
            _ => self.ticker = None,
        }
    }

    pub fn view(&self, clock: &dyn Clock) -> BuilderView {
        let b = &self.builder;
        let elapsed = match &self.ticker {
            Some(t) => t.latest(),
            None => b.timer().elapsed_seconds(clock.now()),
        };
        BuilderView {
            id: b.id(),
            name: b.name().to_string(),
            description: b.description().to_string(),
            phase: b.phase(),
            exercises: b.exercises().to_vec(),
            current_index: b.current_index(),
            active_exercise_id: b.active_exercise(),
            timer: b.timer().state(),
            elapsed_seconds: elapsed,
            elapsed_display: format_clock(elapsed),
            minutes: b.timer().final_minutes(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BuilderView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub phase: BuilderPhase,
    pub exercises: Vec<BuilderExercise>,
    pub current_index: usize,
    pub active_exercise_id: Option<Uuid>,
    pub timer: TimerState,
    pub elapsed_seconds: u64,
    pub elapsed_display: String,
    pub minutes: Option<u32>,
}

/// Builders in flight, each visible only to its owner.
#[derive(Default)]
pub struct BuilderRegistry {
    sessions: Mutex<HashMap<Uuid, BuilderSession>>,
}

impl BuilderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, owner: Uuid, clock: &dyn Clock) -> BuilderView {
        let session = BuilderSession::new(CustomWorkoutBuilder::new(owner));
        let view = session.view(clock);
        self.sessions.lock().await.insert(view.id, session);
        view
    }

    /// Runs `f` against the owner's builder while holding the registry lock.
    pub async fn with_session<R>(
        &self,
        owner: Uuid,
        id: Uuid,
        f: impl FnOnce(&mut BuilderSession) -> R,
    ) -> Result<R, BuilderError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(&id)
            .filter(|s| s.builder.owner() == owner)
            .ok_or(BuilderError::NotFound(id))?;
        Ok(f(session))
    }

    pub async fn remove(&self, owner: Uuid, id: Uuid) -> Result<(), BuilderError> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get(&id) {
            Some(s) if s.builder.owner() == owner => {
                sessions.remove(&id);
                Ok(())
            }
            _ => Err(BuilderError::NotFound(id)),
        }
    }

    /// Removes the builder once `f` accepts it, so only one caller can claim it.
    pub async fn take_with<R>(
        &self,
        owner: Uuid,
        id: Uuid,
        f: impl FnOnce(&BuilderSession) -> Result<R, BuilderError>,
    ) -> Result<(R, BuilderSession), BuilderError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get(&id)
            .filter(|s| s.builder.owner() == owner)
            .ok_or(BuilderError::NotFound(id))?;
        let out = f(session)?;
        let session = sessions.remove(&id).ok_or(BuilderError::NotFound(id))?;
        Ok((out, session))
    }

    /// Puts back a builder taken by `take_with`.
    pub async fn restore(&self, session: BuilderSession) {
        let id = session.builder.id();
        self.sessions.lock().await.insert(id, session);
    }

    /// Drops every builder of `owner`, stopping their tickers. Returns how many went.
    pub async fn remove_owner(&self, owner: Uuid) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.builder.owner() != owner);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
