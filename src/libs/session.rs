//! Per-user conversation state.
//!
//! A [`SessionStore`] holds one [`SessionState`] per user. A session is
//! created on the first interaction and dropped on an explicit reset; every
//! transition is checked against the current state.

use crate::libs::period::UserId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Welcome,
    WaitingIaf,
    ReadyForFile,
    WaitingFile,
    AnalysisComplete,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Welcome => "welcome",
            SessionState::WaitingIaf => "waiting_iaf",
            SessionState::ReadyForFile => "ready_for_file",
            SessionState::WaitingFile => "waiting_file",
            SessionState::AnalysisComplete => "analysis_complete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} while in state {state}")]
    InvalidTransition { action: &'static str, state: SessionState },
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state, creating a `Welcome` session on first contact.
    pub fn get_or_create(&self, user_id: UserId) -> SessionState {
        *self.sessions.lock().entry(user_id).or_insert(SessionState::Welcome)
    }

    /// Current state without creating a session.
    pub fn get(&self, user_id: UserId) -> Option<SessionState> {
        self.sessions.lock().get(&user_id).copied()
    }

    /// Starts over from `Welcome`.
    pub fn start(&self, user_id: UserId) -> SessionState {
        self.sessions.lock().insert(user_id, SessionState::Welcome);
        SessionState::Welcome
    }

    /// Drops the user's session.
    pub fn reset(&self, user_id: UserId) {
        self.sessions.lock().remove(&user_id);
    }

    pub fn request_iaf(&self, user_id: UserId) -> SessionState {
        self.set(user_id, SessionState::WaitingIaf)
    }

    /// Accepts an IAF value; only valid while waiting for one.
    pub fn accept_iaf(&self, user_id: UserId) -> Result<SessionState, SessionError> {
        self.transition(user_id, "accept IAF", &[SessionState::WaitingIaf], SessionState::ReadyForFile)
    }

    pub fn request_file(&self, user_id: UserId) -> SessionState {
        self.set(user_id, SessionState::WaitingFile)
    }

    /// Accepts an uploaded file; only valid while waiting for one. The state
    /// stays `WaitingFile` until the analysis completes.
    pub fn accept_file(&self, user_id: UserId) -> Result<SessionState, SessionError> {
        self.transition(user_id, "accept a file", &[SessionState::WaitingFile], SessionState::WaitingFile)
    }

    pub fn complete_analysis(&self, user_id: UserId) -> SessionState {
        self.set(user_id, SessionState::AnalysisComplete)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    fn set(&self, user_id: UserId, state: SessionState) -> SessionState {
        self.sessions.lock().insert(user_id, state);
        state
    }

    fn transition(&self, user_id: UserId, action: &'static str, from: &[SessionState], to: SessionState) -> Result<SessionState, SessionError> {
        let mut sessions = self.sessions.lock();
        let state = sessions.entry(user_id).or_insert(SessionState::Welcome);
        if !from.contains(state) {
            return Err(SessionError::InvalidTransition { action, state: *state });
        }
        *state = to;
        Ok(to)
    }
}
