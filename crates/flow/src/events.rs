use schema::ClassName;
use strum::Display;
use tokio::sync::mpsc;
use tracing::trace;

use crate::{ObjectId, SessionId};

/// Notifications published by the navigator.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum FlowEvent {
    Shown {
        session: SessionId,
        object: ObjectId,
        area: String,
    },
    Closed {
        session: SessionId,
        object: ObjectId,
    },
    /// The object's class was updated; its form should re-render.
    Refresh {
        session: SessionId,
        object: ObjectId,
        class: ClassName,
    },
    ConfirmationRequested {
        session: SessionId,
        prompt: ObjectId,
        action: String,
    },
    SessionEnded {
        session: SessionId,
        forms: usize,
    },
}

/// Sending half of the flow event channel. A disconnected bus drops every event.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    sender: Option<mpsc::UnboundedSender<FlowEvent>>,
}

impl EventBus {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<FlowEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { sender: Some(tx) }, rx)
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn publish(&self, event: FlowEvent) {
        let Some(sender) = &self.sender else {
            return;
        };
        if let Err(err) = sender.send(event) {
            trace!(event = %err.0, "flow event dropped, receiver closed");
        }
    }
}
