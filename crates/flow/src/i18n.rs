use std::collections::HashMap;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocalizationError {
    #[error("no translation for `{0}`")]
    Missing(String),
}

pub trait Localizer: Send + Sync {
    fn resolve(&self, key: &str) -> Result<String, LocalizationError>;

    /// Looks up `scope.key` first, then the bare `key`.
    fn resolve_scoped(&self, scope: &str, key: &str) -> Result<String, LocalizationError> {
        self.resolve(&format!("{scope}.{key}"))
            .or_else(|_| self.resolve(key))
    }
}

/// In-memory translation table.
#[derive(Debug, Clone, Default)]
pub struct MapLocalizer {
    entries: HashMap<String, String>,
}

impl MapLocalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }
}

impl Localizer for MapLocalizer {
    fn resolve(&self, key: &str) -> Result<String, LocalizationError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| LocalizationError::Missing(key.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_lookup_falls_back_to_bare_key() {
        let localizer = MapLocalizer::new()
            .with("Order.delete", "Delete this order?")
            .with("delete", "Delete?");

        assert_eq!(localizer.resolve_scoped("Order", "delete").unwrap(), "Delete this order?");
        assert_eq!(localizer.resolve_scoped("Invoice", "delete").unwrap(), "Delete?");
        assert_eq!(
            localizer.resolve_scoped("Invoice", "archive"),
            Err(LocalizationError::Missing("archive".into()))
        );
    }
}
