//! The record contract and the macro that generates concrete records.

use crate::aspect::Aspect;
use crate::error::FeatureError;
use crate::value::{FeatureType, FeatureValue};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// The closed set of feature names of one record.
pub trait FeatureKey:
    Copy + Eq + Hash + Debug + Display + FromStr + IntoEnumIterator + Send + Sync + 'static
{
    /// Name as used by annotations and descriptors (camelCase).
    fn name(self) -> &'static str;

    fn value_type(self) -> FeatureType;

    /// Whether an unset value on a subclass is looked up on its superclass chain.
    fn inherited(self) -> bool;
}

/// A typed feature record of one aspect for one kind of schema element.
pub trait FeatureRecord: Clone + Debug + Default + PartialEq + Send + Sync + 'static {
    type Key: FeatureKey;

    const ASPECT: Aspect;

    fn is_set(&self, key: Self::Key) -> bool;

    /// Effective value of a feature (override, else declared default).
    fn get(&self, key: Self::Key) -> Option<FeatureValue>;

    fn set(&mut self, key: Self::Key, value: FeatureValue) -> Result<(), FeatureError>;

    /// Parse `raw` according to the declared type and store it.
    fn set_raw(&mut self, key: Self::Key, raw: &str) -> Result<(), FeatureError>;

    fn unset(&mut self, key: Self::Key);

    fn key(name: &str) -> Option<Self::Key> {
        name.parse().ok()
    }

    /// Resolve a feature name, reporting unknown names against this record's aspect.
    fn key_or_err(name: &str) -> Result<Self::Key, FeatureError> {
        Self::key(name).ok_or_else(|| FeatureError::UnknownFeature {
            aspect: Self::ASPECT,
            name: name.to_string(),
        })
    }
}

/// Declare a feature record together with its key enum.
///
/// ```ignore
/// feature_record! {
///     /// View features of a class.
///     pub struct ViewClassFeatures(View) keyed by ViewClassFeature {
///         Render => render: String = None, inherited;
///         Columns => columns: i64 = Some(1);
///     }
/// }
/// ```
#[macro_export]
macro_rules! feature_record {
    (@inherited inherited) => {
        true
    };
    (@inherited) => {
        false
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $record:ident ($aspect:ident) keyed by $key:ident {
            $(
                $(#[$fmeta:meta])*
                $variant:ident => $field:ident : $ty:ty = $default:expr $(, $inherited:ident)?
            );* $(;)?
        }
    ) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::strum::Display,
            ::strum::EnumString,
            ::strum::EnumIter,
            ::strum::IntoStaticStr,
        )]
        #[strum(serialize_all = "camelCase")]
        $vis enum $key {
            $($variant),*
        }

        impl $crate::FeatureKey for $key {
            fn name(self) -> &'static str {
                self.into()
            }

            fn value_type(self) -> $crate::FeatureType {
                match self {
                    $($key::$variant => <$ty as $crate::FeatureData>::TYPE),*
                }
            }

            fn inherited(self) -> bool {
                match self {
                    $($key::$variant => $crate::feature_record!(@inherited $($inherited)?)),*
                }
            }
        }

        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $record {
            $(
                $(#[$fmeta])*
                pub $field: $crate::FeatureSlot<$ty>,
            )*
        }

        impl Default for $record {
            fn default() -> Self {
                Self {
                    $($field: $crate::FeatureSlot::with_default($default),)*
                }
            }
        }

        impl $crate::FeatureRecord for $record {
            type Key = $key;

            const ASPECT: $crate::Aspect = $crate::Aspect::$aspect;

            fn is_set(&self, key: $key) -> bool {
                match key {
                    $($key::$variant => self.$field.is_set()),*
                }
            }

            fn get(&self, key: $key) -> Option<$crate::FeatureValue> {
                match key {
                    $($key::$variant => self
                        .$field
                        .get()
                        .cloned()
                        .map($crate::FeatureData::into_value)),*
                }
            }

            fn set(
                &mut self,
                key: $key,
                value: $crate::FeatureValue,
            ) -> Result<(), $crate::FeatureError> {
                let name = $crate::FeatureKey::name(key);
                match key {
                    $($key::$variant => self.$field.set_value(name, value)),*
                }
            }

            fn set_raw(&mut self, key: $key, raw: &str) -> Result<(), $crate::FeatureError> {
                let name = $crate::FeatureKey::name(key);
                match key {
                    $($key::$variant => self.$field.set_raw(name, raw)),*
                }
            }

            fn unset(&mut self, key: $key) {
                match key {
                    $($key::$variant => self.$field.unset()),*
                }
            }
        }
    };
}
