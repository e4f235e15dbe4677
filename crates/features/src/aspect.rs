//! Aspects and schema element kinds.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A cross-cutting concern that contributes its own feature record to schema elements.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    /// Structural features shared by every other aspect (embedding, expansion).
    Core,
    View,
    Flow,
    Reporting,
    Geo,
}

/// The kind of schema element a feature record is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ElementKind {
    Class,
    Field,
    Action,
    Event,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn aspect_names_round_trip_through_strings() {
        for aspect in Aspect::iter() {
            let name = aspect.to_string();
            assert_eq!(Aspect::from_str(&name).ok(), Some(aspect));
        }
        assert_eq!(Aspect::Reporting.to_string(), "reporting");
    }
}
