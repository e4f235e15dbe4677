use schema::ClassName;
use thiserror::Error;

use crate::{ObjectId, SessionId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("no active session")]
    NoActiveSession,

    #[error("unknown session {0}")]
    UnknownSession(SessionId),

    #[error("unknown object {0}")]
    UnknownObject(ObjectId),

    #[error("class `{class}` has no action `{action}`")]
    UnknownAction { class: ClassName, action: String },

    #[error("no pending confirmation for {0}")]
    NoPendingConfirmation(ObjectId),

    #[error("action `{action}` failed: {reason}")]
    Action { action: String, reason: String },

    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
}
