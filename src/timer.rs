use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

/// Display refresh period for a running timer.
pub const TICK: Duration = Duration::from_secs(1);

/// Source of "now" for timers, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: time::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running {
        #[serde(with = "time::serde::rfc3339")]
        started_at: OffsetDateTime,
    },
    Stopped {
        #[serde(with = "time::serde::rfc3339")]
        started_at: OffsetDateTime,
        #[serde(with = "time::serde::rfc3339")]
        stopped_at: OffsetDateTime,
        minutes: u32,
    },
}

/// Stopwatch for a workout session: idle -> running -> stopped, no pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkoutTimer {
    state: TimerState,
}

impl Default for WorkoutTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkoutTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// Starts (or restarts) the timer from `now`.
    pub fn start(&mut self, now: OffsetDateTime) {
        self.state = TimerState::Running { started_at: now };
    }

    pub fn elapsed_seconds(&self, now: OffsetDateTime) -> u64 {
        match self.state {
            TimerState::Idle => 0,
            TimerState::Running { started_at } => whole_seconds(started_at, now),
            TimerState::Stopped {
                started_at,
                stopped_at,
                ..
            } => whole_seconds(started_at, stopped_at),
        }
    }

    /// Stops a running timer and returns the floor-rounded minutes.
    /// Does nothing unless running.
    pub fn stop(&mut self, now: OffsetDateTime) -> Option<u32> {
        let TimerState::Running { started_at } = self.state else {
            return None;
        };
        let minutes = u32::try_from(whole_seconds(started_at, now) / 60).unwrap_or(u32::MAX);
        self.state = TimerState::Stopped {
            started_at,
            stopped_at: now,
            minutes,
        };
        Some(minutes)
    }

    /// Final duration once stopped.
    pub fn final_minutes(&self) -> Option<u32> {
        match self.state {
            TimerState::Stopped { minutes, .. } => Some(minutes),
            _ => None,
        }
    }
}

/// Whole seconds between two instants, clamped at zero.
pub fn whole_seconds(from: OffsetDateTime, to: OffsetDateTime) -> u64 {
    u64::try_from((to - from).whole_seconds()).unwrap_or(0)
}

/// `MM:SS`, minutes keep growing past 99.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Background task publishing elapsed seconds every [`TICK`].
pub struct ElapsedTicker {
    rx: watch::Receiver<u64>,
    handle: JoinHandle<()>,
}

impl ElapsedTicker {
    pub fn spawn(started_at: OffsetDateTime, clock: Arc<dyn Clock>) -> Self {
        let (tx, rx) = watch::channel(whole_seconds(started_at, clock.now()));
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            loop {
                interval.tick().await;
                let elapsed = whole_seconds(started_at, clock.now());
                if tx.send(elapsed).is_err() {
                    debug!("elapsed ticker receiver gone");
                    break;
                }
            }
        });
        Self { rx, handle }
    }

    /// Last published value; lags the clock by at most one tick.
    pub fn latest(&self) -> u64 {
        *self.rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.rx.clone()
    }
}

impl Drop for ElapsedTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
