use crate::errors::SyncError;
use std::sync::{Condvar, Mutex, MutexGuard};

struct GateState {
    ready: bool,
    terminated: bool,
}

/// Pipeline-stage handoff: serializes N identical worker threads so at
/// most one is inside the guarded stage at a time, in wakeup order.
///
/// Readiness starts true so the first `enter()` does not block. `leave()`
/// republishes and wakes exactly one waiter. `terminate()` wakes everything
/// and makes all further `enter()` calls fail, so blocked workers can
/// observe shutdown instead of hanging.
pub struct StageGate {
    state: Mutex<GateState>,
    cond: Condvar,
}

impl Default for StageGate {
    fn default() -> Self {
        Self::new()
    }
}

impl StageGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState {
                ready: true,
                terminated: false,
            }),
            cond: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Block until the gate is free, then claim it.
    pub fn enter(&self) -> Result<(), SyncError> {
        let mut state = self.lock();
        while !state.ready && !state.terminated {
            state = match self.cond.wait(state) {
                Ok(g) => g,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
        if state.terminated {
            return Err(SyncError::Terminated);
        }
        state.ready = false;
        Ok(())
    }

    /// Release the gate, admitting one waiting worker.
    pub fn leave(&self) {
        let mut state = self.lock();
        state.ready = true;
        self.cond.notify_one();
    }

    /// Wake all waiters with a shutdown indication.
    pub fn terminate(&self) {
        let mut state = self.lock();
        state.terminated = true;
        self.cond.notify_all();
    }
}
