//! Authentication flow state machine
//!
//! ```text
//!   Anonymous ──defer(action)──▶ AwaitingCredential ──install(session)──▶ Authenticated
//!       ▲                              │                                      │
//!       └────────────cancel────────────┘                                      │
//!       └──────────────────────────────sign_out───────────────────────────────┘
//! ```
//!
//! At most one pending action is held. Deferring again replaces it.

use super::PendingAction;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    AwaitingCredential,
    Authenticated,
}

#[derive(Debug, Default)]
pub struct AuthFlow {
    session: Option<Session>,
    pending: Option<PendingAction>,
    awaiting: bool,
}

impl AuthFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AuthState {
        if self.session.is_some() {
            AuthState::Authenticated
        } else if self.awaiting {
            AuthState::AwaitingCredential
        } else {
            AuthState::Anonymous
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Open the credential flow without capturing an action
    pub fn begin_sign_in(&mut self) {
        if self.session.is_none() {
            self.awaiting = true;
        }
    }

    /// Park an action until a session exists. Returns the action it displaced.
    pub fn defer(&mut self, action: PendingAction) -> Option<PendingAction> {
        self.awaiting = true;
        self.pending.replace(action)
    }

    /// Install the session, then hand back the pending action (cleared from
    /// the slot) so the caller can run it against the installed session.
    pub fn install(&mut self, session: Session) -> Option<PendingAction> {
        self.session = Some(session);
        self.awaiting = false;
        self.pending.take()
    }

    /// Abandon the credential flow, discarding any pending action
    pub fn cancel(&mut self) -> Option<PendingAction> {
        self.awaiting = false;
        self.pending.take()
    }

    pub fn sign_out(&mut self) -> Option<Session> {
        self.awaiting = false;
        self.pending = None;
        self.session.take()
    }
}
