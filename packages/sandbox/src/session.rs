// ABOUTME: Session state machine types for one sandbox per builder view
// ABOUTME: Tracks the Loading→Booting→Installing→Running→Ready|Error progression

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::SandboxHandle;
use crate::logs::LogEntry;

/// Lifecycle state of a sandbox session.
///
/// Transitions are strictly ordered; only a failure may short-circuit
/// directly to Error from any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Loading,
    Booting,
    Installing,
    Running,
    Ready,
    Error,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Loading => "loading",
            SessionState::Booting => "booting",
            SessionState::Installing => "installing",
            SessionState::Running => "running",
            SessionState::Ready => "ready",
            SessionState::Error => "error",
        }
    }

    /// Whether this state may be left for `next` without a failure
    pub fn can_advance_to(&self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (SessionState::Loading, SessionState::Booting)
                | (SessionState::Booting, SessionState::Installing)
                | (SessionState::Installing, SessionState::Running)
                | (SessionState::Running, SessionState::Ready)
        )
    }
}

/// One sandbox session, owned by a single builder view.
///
/// Created on start, destroyed on teardown; at most one exists per controller
/// at any time. The handle appears after boot; `preview_url` is set only on
/// entering Ready and cleared on leaving it.
pub struct SandboxSession {
    pub id: Uuid,
    pub state: SessionState,
    pub preview_url: Option<String>,
    pub started_at: DateTime<Utc>,
    pub handle: Option<Arc<dyn SandboxHandle>>,
}

impl SandboxSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Loading,
            preview_url: None,
            started_at: Utc::now(),
            handle: None,
        }
    }
}

impl Default for SandboxSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SandboxSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SandboxSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("preview_url", &self.preview_url)
            .field("started_at", &self.started_at)
            .field("handle", &self.handle.as_ref().map(|_| "<handle>"))
            .finish()
    }
}

/// Real-time session events for UI subscribers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SessionEvent {
    /// State machine transition
    State {
        session_id: Uuid,
        state: SessionState,
    },
    /// New log chunk appended to the session buffer
    Log { session_id: Uuid, entry: LogEntry },
    /// Dev server is accepting connections
    Ready { session_id: Uuid, url: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_transitions() {
        assert!(SessionState::Loading.can_advance_to(SessionState::Booting));
        assert!(SessionState::Booting.can_advance_to(SessionState::Installing));
        assert!(SessionState::Installing.can_advance_to(SessionState::Running));
        assert!(SessionState::Running.can_advance_to(SessionState::Ready));
    }

    #[test]
    fn test_no_stage_skipping() {
        assert!(!SessionState::Loading.can_advance_to(SessionState::Ready));
        assert!(!SessionState::Booting.can_advance_to(SessionState::Running));
        assert!(!SessionState::Ready.can_advance_to(SessionState::Running));
    }

    #[test]
    fn test_new_session_has_no_preview_url() {
        let session = SandboxSession::new();
        assert_eq!(session.state, SessionState::Loading);
        assert!(session.preview_url.is_none());
        assert!(session.handle.is_none());
    }
}
