//! Single-flight export guard.
//!
//! At most one export runs at a time, and a successful export blocks new
//! requests for a short cooldown so a double trigger yields one file.
//!
//! ```text
//!          try_begin            complete
//! Idle ───────────────► Exporting ─────────► Done ──(cooldown)──► Idle
//!   ▲                      │
//!   │        fail          ▼
//!   └────────────────── Failed
//! ```
//!
//! `Failed` releases the guard right away. All transitions take the current
//! time explicitly.

use std::time::{Duration, Instant};

use log::{debug, warn};

/// Observable state of an [`ExportGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Ready to accept an export request.
    Idle,
    /// An export started at the given instant is in flight.
    Exporting { started: Instant },
    /// The last export succeeded at the given instant; cooling down.
    Done { at: Instant },
    /// The last export failed.
    Failed,
}

/// Explicit state machine serializing export requests.
#[derive(Debug, Clone)]
pub struct ExportGuard {
    state: GuardState,
    cooldown: Duration,
}

impl ExportGuard {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            state: GuardState::Idle,
            cooldown,
        }
    }

    /// The state as of `now`, with elapsed cooldowns and failures settled to
    /// [`GuardState::Idle`].
    pub fn state_at(&self, now: Instant) -> GuardState {
        match self.state {
            GuardState::Done { at } if now.saturating_duration_since(at) >= self.cooldown => {
                GuardState::Idle
            }
            GuardState::Failed => GuardState::Idle,
            state => state,
        }
    }

    /// The state exactly as last recorded.
    pub fn recorded_state(&self) -> GuardState {
        self.state
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Move to `Exporting` if the guard is idle at `now`.
    ///
    /// Returns `false`, leaving the state untouched, while an export is in
    /// flight or cooling down.
    pub fn try_begin(&mut self, now: Instant) -> bool {
        match self.state_at(now) {
            GuardState::Idle => {
                self.state = GuardState::Exporting { started: now };
                true
            }
            state => {
                debug!(state:?; "Export request ignored");
                false
            }
        }
    }

    /// Record a successful export finishing at `now`.
    pub fn complete(&mut self, now: Instant) {
        match self.state {
            GuardState::Exporting { started } => {
                debug!(elapsed:? = now.saturating_duration_since(started); "Export completed");
                self.state = GuardState::Done { at: now };
            }
            state => warn!(state:?; "Export completion without an export in flight"),
        }
    }

    /// Record a failed export.
    pub fn fail(&mut self) {
        match self.state {
            GuardState::Exporting { .. } => self.state = GuardState::Failed,
            state => warn!(state:?; "Export failure without an export in flight"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_millis(1000);

    #[test]
    fn test_new_guard_is_idle() {
        let guard = ExportGuard::new(COOLDOWN);
        assert_eq!(guard.state_at(Instant::now()), GuardState::Idle);
    }

    #[test]
    fn test_second_request_while_exporting_is_ignored() {
        let now = Instant::now();
        let mut guard = ExportGuard::new(COOLDOWN);

        assert!(guard.try_begin(now));
        assert!(!guard.try_begin(now));
        assert_eq!(guard.recorded_state(), GuardState::Exporting { started: now });
    }

    #[test]
    fn test_done_blocks_until_cooldown_elapses() {
        let start = Instant::now();
        let mut guard = ExportGuard::new(COOLDOWN);

        assert!(guard.try_begin(start));
        guard.complete(start);

        assert!(!guard.try_begin(start + Duration::from_millis(999)));
        assert_eq!(
            guard.state_at(start + Duration::from_millis(500)),
            GuardState::Done { at: start }
        );
        assert!(guard.try_begin(start + COOLDOWN));
    }

    #[test]
    fn test_failure_releases_immediately() {
        let now = Instant::now();
        let mut guard = ExportGuard::new(COOLDOWN);

        assert!(guard.try_begin(now));
        guard.fail();
        assert_eq!(guard.recorded_state(), GuardState::Failed);
        assert_eq!(guard.state_at(now), GuardState::Idle);
        assert!(guard.try_begin(now));
    }

    #[test]
    fn test_stray_completion_is_ignored() {
        let now = Instant::now();
        let mut guard = ExportGuard::new(COOLDOWN);

        guard.complete(now);
        guard.fail();
        assert_eq!(guard.recorded_state(), GuardState::Idle);
    }

    #[test]
    fn test_zero_cooldown_allows_back_to_back_exports() {
        let now = Instant::now();
        let mut guard = ExportGuard::new(Duration::ZERO);

        assert!(guard.try_begin(now));
        guard.complete(now);
        assert!(guard.try_begin(now));
    }
}
