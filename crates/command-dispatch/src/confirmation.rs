//! Two-state guard for irreversible operations

use intent_parser::Intent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Operations that need a second, explicit trigger before they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalOperation {
    Shutdown,
    Restart,
}

impl CriticalOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriticalOperation::Shutdown => "shutdown",
            CriticalOperation::Restart => "restart",
        }
    }

    pub fn from_intent(intent: Intent) -> Option<Self> {
        match intent {
            Intent::Shutdown => Some(CriticalOperation::Shutdown),
            Intent::Restart => Some(CriticalOperation::Restart),
            _ => None,
        }
    }

    /// Parse a spoken operation name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "shutdown" => Some(CriticalOperation::Shutdown),
            "restart" => Some(CriticalOperation::Restart),
            _ => None,
        }
    }
}

impl fmt::Display for CriticalOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single confirmation slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmationState {
    #[default]
    Idle,
    Pending {
        operation: CriticalOperation,
        requested_at: Instant,
    },
}

/// Result of feeding a request into the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// First request: now waiting for confirmation
    AwaitingConfirmation(CriticalOperation),
    /// Second request for the pending operation: go ahead
    Confirmed(CriticalOperation),
}

impl ConfirmationState {
    pub fn pending(&self) -> Option<CriticalOperation> {
        match self {
            ConfirmationState::Idle => None,
            ConfirmationState::Pending { operation, .. } => Some(*operation),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending().is_some()
    }

    /// Whether a pending request is older than `timeout` at `now`. Idle is
    /// never expired.
    pub fn is_expired(&self, now: Instant, timeout: Duration) -> bool {
        match self {
            ConfirmationState::Idle => false,
            ConfirmationState::Pending { requested_at, .. } => {
                now.saturating_duration_since(*requested_at) > timeout
            }
        }
    }

    /// Request `operation`. A request matching the pending operation confirms
    /// it and returns to idle; anything else (re)arms the slot.
    pub fn advance(&mut self, operation: CriticalOperation, now: Instant) -> Transition {
        if self.pending() == Some(operation) {
            *self = ConfirmationState::Idle;
            tracing::info!(%operation, "critical operation confirmed");
            Transition::Confirmed(operation)
        } else {
            if let Some(previous) = self.pending() {
                tracing::info!(%previous, %operation, "replacing pending confirmation");
            }
            *self = ConfirmationState::Pending {
                operation,
                requested_at: now,
            };
            tracing::info!(%operation, "awaiting confirmation");
            Transition::AwaitingConfirmation(operation)
        }
    }

    /// Force the slot back to idle, returning what was pending
    pub fn reset(&mut self) -> Option<CriticalOperation> {
        let previous = self.pending();
        *self = ConfirmationState::Idle;
        if let Some(operation) = previous {
            tracing::info!(%operation, "pending confirmation cleared");
        }
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_then_repeat_confirms() {
        let now = Instant::now();
        let mut state = ConfirmationState::default();
        assert_eq!(
            state.advance(CriticalOperation::Shutdown, now),
            Transition::AwaitingConfirmation(CriticalOperation::Shutdown)
        );
        assert_eq!(state.pending(), Some(CriticalOperation::Shutdown));
        assert_eq!(
            state.advance(CriticalOperation::Shutdown, now),
            Transition::Confirmed(CriticalOperation::Shutdown)
        );
        assert_eq!(state, ConfirmationState::Idle);
    }

    #[test]
    fn other_operation_replaces_the_slot() {
        let now = Instant::now();
        let mut state = ConfirmationState::default();
        state.advance(CriticalOperation::Shutdown, now);
        assert_eq!(
            state.advance(CriticalOperation::Restart, now),
            Transition::AwaitingConfirmation(CriticalOperation::Restart)
        );
        assert_eq!(state.pending(), Some(CriticalOperation::Restart));
    }

    #[test]
    fn reset_clears_unconditionally() {
        let mut state = ConfirmationState::default();
        assert_eq!(state.reset(), None);
        state.advance(CriticalOperation::Restart, Instant::now());
        assert_eq!(state.reset(), Some(CriticalOperation::Restart));
        assert!(!state.is_pending());
    }

    #[test]
    fn expiry_is_measured_from_the_request() {
        let start = Instant::now();
        let timeout = Duration::from_secs(30);
        let mut state = ConfirmationState::default();
        assert!(!state.is_expired(start + Duration::from_secs(3600), timeout));

        state.advance(CriticalOperation::Shutdown, start);
        assert!(!state.is_expired(start + Duration::from_secs(30), timeout));
        assert!(state.is_expired(start + Duration::from_secs(31), timeout));
    }

    #[test]
    fn operation_names() {
        assert_eq!(
            CriticalOperation::from_name(" Restart "),
            Some(CriticalOperation::Restart)
        );
        assert_eq!(CriticalOperation::from_name("reboot"), None);
        assert_eq!(
            CriticalOperation::from_intent(Intent::Shutdown),
            Some(CriticalOperation::Shutdown)
        );
        assert_eq!(CriticalOperation::from_intent(Intent::Timer), None);
    }
}
