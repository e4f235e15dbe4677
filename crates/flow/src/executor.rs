use crate::{FlowError, ObjectHandle, SessionId};

/// Runs a domain action on an object. Reached only after the confirmation gate let it through.
pub trait ActionExecutor: Send + Sync {
    fn invoke(&self, session: SessionId, target: &ObjectHandle, action: &str)
        -> Result<(), FlowError>;
}
