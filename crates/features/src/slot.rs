//! A single feature slot: declared default plus optional override.

use crate::error::FeatureError;
use crate::value::{FeatureData, FeatureValue};

/// One typed feature.
///
/// The default is fixed when the owning record is built. Reads return the explicit value when one
/// was written and fall back to the default otherwise; a slot never reads through to another
/// element's value.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSlot<T> {
    default: Option<T>,
    value: Option<T>,
}

impl<T: FeatureData> FeatureSlot<T> {
    pub fn with_default(default: Option<T>) -> Self {
        Self {
            default,
            value: None,
        }
    }

    /// Effective value: override first, declared default second.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref().or(self.default.as_ref())
    }

    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    /// Whether an explicit value was written, independent of the default.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    pub fn unset(&mut self) {
        self.value = None;
    }

    #[doc(hidden)]
    pub fn set_value(&mut self, name: &str, value: FeatureValue) -> Result<(), FeatureError> {
        let found = value.ty();
        match T::from_value(value) {
            Some(value) => {
                self.value = Some(value);
                Ok(())
            }
            None => Err(FeatureError::TypeMismatch {
                name: name.to_string(),
                expected: T::TYPE,
                found,
            }),
        }
    }

    #[doc(hidden)]
    pub fn set_raw(&mut self, name: &str, raw: &str) -> Result<(), FeatureError> {
        let value = T::parse(raw).map_err(|reason| FeatureError::Parse {
            name: name.to_string(),
            raw: raw.to_string(),
            expected: T::TYPE,
            reason,
        })?;
        self.value = Some(value);
        Ok(())
    }
}

impl FeatureSlot<bool> {
    /// `true` only when the effective value is `true`; absent counts as `false`.
    pub fn is_true(&self) -> bool {
        self.get().copied().unwrap_or(false)
    }
}

impl FeatureSlot<String> {
    pub fn as_deref(&self) -> Option<&str> {
        self.get().map(String::as_str)
    }

    /// Compare the effective value with a literal.
    pub fn is(&self, expected: &str) -> bool {
        self.as_deref() == Some(expected)
    }
}

impl FeatureSlot<Vec<String>> {
    pub fn items(&self) -> &[String] {
        self.get().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Add `item` unless it is already present. Returns whether the list changed.
    pub fn insert_unique(&mut self, item: &str) -> bool {
        if self.items().iter().any(|existing| existing == item) {
            return false;
        }
        let mut items = self.items().to_vec();
        items.push(item.to_string());
        self.value = Some(items);
        true
    }
}
