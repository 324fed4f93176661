//! Application state machine: one object owning the option store, the spin
//! engine, the result window, and the status/error lines the UI renders.
//! The presentation layer only dispatches intents and reads snapshots.

use crate::spin::{SpinEngine, SpinError, SpinOutcome};
use crate::wheel::{ItemId, Wheel, WheelError, WheelItem};
use itertools::Itertools;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info, warn};

/// How long a winner stays on screen before the banner clears.
pub const RESULT_DISPLAY: Duration = Duration::from_secs(5);

const MAX_ERRORS: usize = 50;

/// Why an intent was refused. All of these are local notices; none of them
/// mutate state or propagate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntentError {
    #[error("wait for the wheel to stop")]
    Busy,
    #[error(transparent)]
    Wheel(#[from] WheelError),
    #[error(transparent)]
    Spin(#[from] SpinError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpinResult {
    pub index: usize,
    pub label: String,
}

/// Read-only view handed to the UI on every frame.
#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub items: Vec<WheelItem>,
    pub rotation: f64,
    pub spinning: bool,
    pub result: Option<SpinResult>,
    pub status: String,
    pub errors: Vec<String>,
}

pub struct App {
    wheel: Wheel,
    engine: SpinEngine,
    result: Option<(SpinResult, Instant)>,
    status: String,
    errors: Vec<String>,
}

impl App {
    pub fn new(wheel: Wheel, engine: SpinEngine) -> Self {
        let labels = wheel.items().iter().map(|item| item.label.as_str()).join(", ");
        App {
            wheel,
            engine,
            result: None,
            status: format!("Ready: {labels}"),
            errors: Vec::new(),
        }
    }

    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    /// Launch a spin. Refused while one is running or with an undersized
    /// wheel; the option count is snapshotted into the transition here.
    pub fn spin(&mut self, now: Instant) -> Result<(), IntentError> {
        match self.engine.start(self.wheel.len(), now) {
            Ok(transition) => {
                self.result = None;
                self.status = String::from("Spinning...");
                info!(
                    items = transition.item_count(),
                    target = transition.target_rotation(),
                    "spin launched"
                );
                Ok(())
            }
            Err(err @ SpinError::AlreadySpinning) => {
                self.status = String::from("Already spinning");
                Err(err.into())
            }
            Err(err) => {
                self.push_error(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Add an option. Blank labels are a silent no-op, matching the add
    /// dialog's behavior; mutations are blocked while the wheel turns so the
    /// spin's snapshot stays consistent with what is on screen.
    pub fn add(&mut self, label: &str) -> Result<(), IntentError> {
        if self.engine.is_spinning() {
            self.status = String::from("Wait for the wheel to stop");
            return Err(IntentError::Busy);
        }
        match self.wheel.add(label) {
            Ok(item) => {
                self.status = format!("Added {}", item.label);
                info!(label = %item.label, id = %item.id, "option added");
                Ok(())
            }
            Err(WheelError::EmptyLabel) => Err(WheelError::EmptyLabel.into()),
            Err(err) => {
                self.push_error(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Delete an option by id. Blocked while spinning; refusing to go under
    /// the two-option minimum is surfaced as a blocking notice.
    pub fn remove(&mut self, id: ItemId) -> Result<(), IntentError> {
        if self.engine.is_spinning() {
            self.status = String::from("Wait for the wheel to stop");
            return Err(IntentError::Busy);
        }
        match self.wheel.remove(id) {
            Ok(item) => {
                self.status = format!("Removed {}", item.label);
                info!(label = %item.label, id = %item.id, "option removed");
                Ok(())
            }
            Err(err) => {
                self.push_error(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Advance time: settle a finished spin into a result, and expire the
    /// result banner after its fixed display window.
    pub fn tick(&mut self, now: Instant) {
        if let Some(outcome) = self.engine.tick(now) {
            self.settle(outcome, now);
        }
        let expired = self
            .result
            .as_ref()
            .is_some_and(|(_, shown_at)| now.saturating_duration_since(*shown_at) >= RESULT_DISPLAY);
        if expired {
            self.result = None;
        }
    }

    fn settle(&mut self, outcome: SpinOutcome, now: Instant) {
        match self.wheel.items().get(outcome.winning_index) {
            Some(item) => {
                self.status = format!("Winner: {}", item.label);
                info!(index = outcome.winning_index, label = %item.label, "spin settled");
                self.result = Some((
                    SpinResult {
                        index: outcome.winning_index,
                        label: item.label.clone(),
                    },
                    now,
                ));
            }
            None => {
                // Unreachable while mutations are blocked mid-spin.
                warn!(index = outcome.winning_index, "winner index out of range");
                self.push_error(format!(
                    "winner index {} out of range",
                    outcome.winning_index
                ));
            }
        }
    }

    pub fn snapshot(&self, now: Instant) -> AppSnapshot {
        AppSnapshot {
            items: self.wheel.items().to_vec(),
            rotation: self.engine.rotation_at(now),
            spinning: self.engine.is_spinning(),
            result: self.result.as_ref().map(|(result, _)| result.clone()),
            status: self.status.clone(),
            errors: self.errors.iter().rev().take(5).cloned().collect(),
        }
    }

    fn push_error(&mut self, message: String) {
        error!("{message}");
        self.status = message.clone();
        self.errors.push(message);
        if self.errors.len() > MAX_ERRORS {
            let drain = self.errors.len() - MAX_ERRORS;
            self.errors.drain(0..drain);
        }
    }
}
