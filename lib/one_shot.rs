//! Guard for side-effecting actions that must complete at most once.
//!
//! A [`OneShot`] moves `NotStarted -> InFlight -> Done`. Entering is refused while another
//! attempt is in flight and forever after one succeeds. An attempt that fails, panics, or is
//! cancelled drops its [`Permit`] without completing it, which returns the guard to
//! `NotStarted` so the action can be tried again.

use std::future::Future;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

/// Observable phase of a [`OneShot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InFlight,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OneShotError {
    #[error("the action is already in progress")]
    AlreadyInFlight,
    #[error("the action has already completed")]
    AlreadyDone,
}

/// Failure of [`OneShot::run`].
#[derive(Debug, Error)]
pub enum RunError<E> {
    #[error(transparent)]
    Refused(#[from] OneShotError),
    #[error(transparent)]
    Failed(E),
}

enum State<V> {
    NotStarted,
    InFlight,
    Done(V),
}

pub struct OneShot<V> {
    state: Mutex<State<V>>,
}

impl<V> Default for OneShot<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for OneShot<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneShot")
            .field("phase", &self.phase())
            .finish()
    }
}

impl<V> OneShot<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::NotStarted),
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match &*self.state.lock() {
            State::NotStarted => Phase::NotStarted,
            State::InFlight => Phase::InFlight,
            State::Done(_) => Phase::Done,
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase() == Phase::Done
    }

    /// Claim the single attempt slot.
    pub fn begin(&self) -> Result<Permit<'_, V>, OneShotError> {
        let mut state = self.state.lock();
        match &*state {
            State::NotStarted => {
                *state = State::InFlight;
                Ok(Permit {
                    owner: self,
                    completed: false,
                })
            }
            State::InFlight => Err(OneShotError::AlreadyInFlight),
            State::Done(_) => Err(OneShotError::AlreadyDone),
        }
    }

    /// Run `action` under the guard. Its success is recorded as the final value.
    pub async fn run<F, Fut, E>(&self, action: F) -> Result<V, RunError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        V: Clone,
    {
        let permit = self.begin()?;
        match action().await {
            Ok(value) => {
                permit.complete(value.clone());
                Ok(value)
            }
            Err(err) => {
                drop(permit);
                Err(RunError::Failed(err))
            }
        }
    }
}

impl<V: Clone> OneShot<V> {
    /// The value recorded by the successful attempt.
    #[must_use]
    pub fn value(&self) -> Option<V> {
        match &*self.state.lock() {
            State::Done(v) => Some(v.clone()),
            State::NotStarted | State::InFlight => None,
        }
    }
}

/// The right to perform the guarded action. Dropping it uncompleted releases the slot.
#[must_use = "dropping a permit releases the slot immediately"]
pub struct Permit<'a, V> {
    owner: &'a OneShot<V>,
    completed: bool,
}

impl<V> Permit<'_, V> {
    pub fn complete(mut self, value: V) {
        *self.owner.state.lock() = State::Done(value);
        self.completed = true;
    }
}

impl<V> Drop for Permit<'_, V> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        let mut state = self.owner.state.lock();
        if matches!(*state, State::InFlight) {
            debug!("one-shot attempt ended without completing, slot released");
            *state = State::NotStarted;
        }
    }
}
