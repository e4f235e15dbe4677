use serde::{Deserialize, Serialize};
use settings::ViewSettings;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AreaKind {
    Screen,
    Popup,
}

/// A parsed display position such as `screen:popup` or `left`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    raw: String,
    area: String,
    kind: AreaKind,
}

impl Position {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn kind(&self) -> AreaKind {
        self.kind
    }

    pub fn is_popup(&self) -> bool {
        self.kind == AreaKind::Popup
    }
}

/// Turns position strings into typed positions.
#[derive(Debug, Clone)]
pub struct PositionRules {
    screen_prefix: String,
    popup_area: String,
    default_area: String,
}

impl PositionRules {
    pub fn new(view: &ViewSettings) -> Self {
        Self {
            screen_prefix: format!("{}:", view.screen_prefix),
            popup_area: view.popup_area.clone(),
            default_area: view.default_area.clone(),
        }
    }

    pub fn parse(&self, raw: &str) -> Position {
        let area = raw.strip_prefix(&self.screen_prefix).unwrap_or(raw);
        Position {
            raw: raw.to_owned(),
            area: area.to_owned(),
            kind: self.area_kind(area),
        }
    }

    /// Area named by a `screen:` position, `None` for any other layout value.
    pub fn screen_area(&self, raw: &str) -> Option<String> {
        raw.strip_prefix(&self.screen_prefix)
            .filter(|area| !area.is_empty())
            .map(ToOwned::to_owned)
    }

    pub fn area_kind(&self, area: &str) -> AreaKind {
        if area.starts_with(&self.popup_area) {
            AreaKind::Popup
        } else {
            AreaKind::Screen
        }
    }

    pub fn default_area(&self) -> &str {
        &self.default_area
    }
}

impl Default for PositionRules {
    fn default() -> Self {
        Self::new(&ViewSettings::default())
    }
}
