//! Request lifecycle shared by the batch, evaluation and comparison controllers.

use serde::{Deserialize, Serialize};

/// Where a controller is in its request lifecycle.
///
/// `Idle → Running → {Ready | Failed}`. From `Ready` or `Failed` a new run
/// goes straight back to `Running`, and [`RequestState::dismiss`] returns to
/// `Idle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RequestState<T> {
    /// Nothing requested yet, or the last outcome was dismissed.
    Idle,
    /// A request is in flight. Further triggers are dropped.
    Running,
    /// The last request succeeded.
    Ready(T),
    /// The last request failed with a human-readable message.
    Failed(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The stored result, if the last run succeeded.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if the last run failed.
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Enters `Running` unless a request is already in flight.
    ///
    /// Returns `false` (leaving the state untouched) when busy.
    pub fn begin(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        *self = Self::Running;
        true
    }

    /// Records the outcome of the in-flight request.
    pub fn settle<E: ToString>(&mut self, outcome: Result<T, E>) {
        *self = match outcome {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Failed(err.to_string()),
        };
    }

    /// Returns to `Idle` from `Ready` or `Failed`. No-op while running.
    pub fn dismiss(&mut self) {
        if !self.is_running() {
            *self = Self::Idle;
        }
    }
}
