use std::sync::Arc;

use features::FlowActionFeatures;
use schema::ClassName;
use settings::FlowSettings;
use tracing::warn;

use crate::{DomainObject, Localizer, ObjectId};

/// How an action invocation treats the confirmation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvocationMode {
    /// Ask for confirmation when the action requires it.
    #[default]
    Normal,
    /// The user already confirmed this single invocation.
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    /// Ask first, with this message.
    Confirm(String),
}

/// Decides whether an action runs directly or detours through a yes/no prompt.
pub struct ConfirmationGate {
    localizer: Arc<dyn Localizer>,
    marker: char,
    suffix: String,
}

impl ConfirmationGate {
    pub fn new(localizer: Arc<dyn Localizer>, settings: &FlowSettings) -> Self {
        Self {
            localizer,
            marker: settings.localization_marker,
            suffix: settings.confirm_message_suffix.clone(),
        }
    }

    pub fn check(
        &self,
        features: &FlowActionFeatures,
        class: &str,
        action: &str,
        mode: InvocationMode,
    ) -> GateDecision {
        if !features.confirm_required.is_true() || mode == InvocationMode::Confirmed {
            return GateDecision::Proceed;
        }
        GateDecision::Confirm(self.message(features, class, action))
    }

    /// Prompt text: the explicit message, or `<action><suffix>` as a localization key.
    ///
    /// A message starting with the marker is a key; it is resolved within the class scope and
    /// falls back to the raw text when no translation exists.
    pub fn message(&self, features: &FlowActionFeatures, class: &str, action: &str) -> String {
        let raw = match features.confirm_message.as_deref() {
            Some(explicit) => explicit.to_owned(),
            None => format!("{}{action}{}", self.marker, self.suffix),
        };
        let Some(key) = raw.strip_prefix(self.marker) else {
            return raw;
        };
        match self.localizer.resolve_scoped(class, key) {
            Ok(message) => message,
            Err(err) => {
                warn!(%err, class, action, "confirmation message not localized");
                raw
            }
        }
    }
}

/// The domain object shown while an action waits for a yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    message: String,
    target: ObjectId,
    action: String,
}

impl ConfirmationPrompt {
    pub const CLASS: &'static str = "ConfirmationPrompt";

    pub fn new(message: impl Into<String>, target: ObjectId, action: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            target,
            action: action.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn target(&self) -> ObjectId {
        self.target
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

impl DomainObject for ConfirmationPrompt {
    fn class_name(&self) -> ClassName {
        ClassName::from(Self::CLASS)
    }
}

/// An action waiting for the answer to its prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub prompt: ObjectId,
    pub target: ObjectId,
    pub action: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapLocalizer;

    fn gate(localizer: MapLocalizer) -> ConfirmationGate {
        ConfirmationGate::new(Arc::new(localizer), &FlowSettings::default())
    }

    fn confirm_required() -> FlowActionFeatures {
        let mut features = FlowActionFeatures::default();
        features.confirm_required.set(true);
        features
    }

    #[test]
    fn unconfirmed_actions_proceed() {
        let gate = gate(MapLocalizer::new());
        let features = FlowActionFeatures::default();
        assert_eq!(
            gate.check(&features, "Order", "delete", InvocationMode::Normal),
            GateDecision::Proceed
        );
    }

    #[test]
    fn confirmed_mode_skips_the_prompt() {
        let gate = gate(MapLocalizer::new());
        assert_eq!(
            gate.check(&confirm_required(), "Order", "delete", InvocationMode::Confirmed),
            GateDecision::Proceed
        );
    }

    #[test]
    fn default_message_is_localized_per_action() {
        let gate = gate(MapLocalizer::new().with("Order.delete.confirmMessage", "Really delete?"));
        assert_eq!(
            gate.check(&confirm_required(), "Order", "delete", InvocationMode::Normal),
            GateDecision::Confirm("Really delete?".into())
        );
    }

    #[test]
    fn explicit_messages_and_fallbacks() {
        let gate = gate(MapLocalizer::new().with("sure", "Are you sure?"));

        let mut features = confirm_required();
        features.confirm_message.set("Go ahead?".into());
        assert_eq!(gate.message(&features, "Order", "ship"), "Go ahead?");

        features.confirm_message.set("$sure".into());
        assert_eq!(gate.message(&features, "Order", "ship"), "Are you sure?");

        features.confirm_message.set("$missing".into());
        assert_eq!(gate.message(&features, "Order", "ship"), "$missing");

        features.confirm_message.unset();
        assert_eq!(gate.message(&features, "Order", "ship"), "$ship.confirmMessage");
    }
}
