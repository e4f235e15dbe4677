use serde::{Deserialize, Serialize};

use crate::Settings;

/// Screen areas used when showing forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Area used when neither the caller nor the class names one.
    pub default_area: String,
    /// Areas whose name starts with this prefix are popups.
    pub popup_area: String,
    /// Prefix stripped from positions such as `screen:popup`.
    pub screen_prefix: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            default_area: "body".into(),
            popup_area: "popup".into(),
            screen_prefix: "screen".into(),
        }
    }
}

impl Settings for ViewSettings {
    const SECTION: &'static str = "view";
}

/// Confirmation and localization knobs of the navigation flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowSettings {
    /// Position the confirmation prompt is shown at.
    pub confirm_position: String,
    /// Messages starting with this character are localization keys.
    pub localization_marker: char,
    /// Appended to the action name to build the fallback message key.
    pub confirm_message_suffix: String,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            confirm_position: "screen:popup".into(),
            localization_marker: '$',
            confirm_message_suffix: ".confirmMessage".into(),
        }
    }
}

impl Settings for FlowSettings {
    const SECTION: &'static str = "flow";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `flow=debug,info`.
    pub level: String,
    /// Optional log file; console only when `None`.
    pub file: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: None,
        }
    }
}

impl Settings for LoggingSettings {
    const SECTION: &'static str = "logging";
}
