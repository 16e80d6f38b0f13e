//! Error types surfaced by the board client and controller.
//!
//! - `SyncError`: a single request against the board API failed
//! - `ActionError`: a user action failed, tagged with what the user was doing

use crate::model::ValidationError;
use http::StatusCode;
use thiserror::Error;

/// Failure of one API call.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{op} failed with HTTP {status}")]
    Status { op: &'static str, status: StatusCode },

    #[error("{op}: transport error: {message}")]
    Transport { op: &'static str, message: String },

    #[error("{op}: could not decode response: {source}")]
    Decode {
        op: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid request: {0}")]
    Request(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("At least one board must remain")]
    LastBoard,

    #[error("No board is selected")]
    NoActiveBoard,

    #[error("Card {0} is not on the active board")]
    UnknownCard(crate::model::CardId),

    #[error("List {0} is not on the active board")]
    UnknownList(crate::model::ListId),
}

impl SyncError {
    /// True when the request never reached the point of a server response.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, SyncError::Transport { .. })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SyncError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// What the user was doing when something failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Login,
    LoadBoards,
    LoadBoard,
    CreateBoard,
    UpdateBoard,
    DeleteBoard,
    CreateList,
    UpdateList,
    DeleteList,
    CreateCard,
    UpdateCard,
    DeleteCard,
    MoveCard,
    AddMember,
    RemoveMember,
    LoadUsers,
    LoadProfile,
    RegisterUser,
    UpdateUser,
}

impl UserAction {
    pub fn failure_message(&self) -> &'static str {
        match self {
            UserAction::Login => "Failed to log in.",
            UserAction::LoadBoards => "Failed to load projects. Check that you are logged in.",
            UserAction::LoadBoard => "Failed to load project details.",
            UserAction::CreateBoard => "Failed to create project.",
            UserAction::UpdateBoard => "Failed to update project.",
            UserAction::DeleteBoard => "Failed to delete project.",
            UserAction::CreateList => "Failed to create list.",
            UserAction::UpdateList => "Failed to update list.",
            UserAction::DeleteList => "Failed to delete list.",
            UserAction::CreateCard => "Failed to create card.",
            UserAction::UpdateCard => "Failed to update card.",
            UserAction::DeleteCard => "Failed to delete card.",
            UserAction::MoveCard => "Failed to move card.",
            UserAction::AddMember => "Failed to assign member.",
            UserAction::RemoveMember => "Failed to unassign member.",
            UserAction::LoadUsers => "Failed to load users.",
            UserAction::LoadProfile => "Failed to load your profile.",
            UserAction::RegisterUser => "Failed to create user.",
            UserAction::UpdateUser => "Failed to update user.",
        }
    }
}

#[derive(Debug, Error)]
#[error("{}", .action.failure_message())]
pub struct ActionError {
    pub action: UserAction,
    #[source]
    pub source: SyncError,
}

impl ActionError {
    pub fn new(action: UserAction, source: impl Into<SyncError>) -> Self {
        Self {
            action,
            source: source.into(),
        }
    }

    /// Message plus cause, for the status bar and logs.
    pub fn detail(&self) -> String {
        format!("{} ({})", self.action.failure_message(), self.source)
    }
}
