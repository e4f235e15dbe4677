use crate::aspect::Aspect;
use crate::value::FeatureType;
use thiserror::Error;

/// Non-fatal problems raised while applying a feature source.
///
/// None of these abort configuration: the offending attribute keeps its previous value and
/// processing continues with the next one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("unknown {aspect} feature: {name}")]
    UnknownFeature { aspect: Aspect, name: String },

    #[error("descriptor names unknown member: {name}")]
    UnknownMember { name: String },

    #[error("invalid value {raw:?} for feature {name} (expected {expected}): {reason}")]
    Parse {
        name: String,
        raw: String,
        expected: FeatureType,
        reason: String,
    },

    #[error("feature {name} expects {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: FeatureType,
        found: FeatureType,
    },
}
