//! Per-element holders of one optional record per aspect.
//!
//! A record is created lazily the first time an aspect configures the element, starting from its
//! declared defaults. Elements never configured by an aspect read that aspect's defaults.

use crate::aspect::Aspect;
use crate::catalog::*;
use crate::record::FeatureRecord;
use crate::value::FeatureValue;
use std::borrow::Cow;

/// Access to the record of type `R` held by an element.
pub trait HasBag<R: FeatureRecord> {
    fn bag(&self) -> Option<&R>;

    /// The record, created from its defaults on first access.
    fn bag_mut(&mut self) -> &mut R;
}

macro_rules! bags {
    (
        $(#[$meta:meta])*
        $name:ident { $($field:ident : $record:ty),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $($field: Option<$record>,)*
        }

        $(
            impl HasBag<$record> for $name {
                fn bag(&self) -> Option<&$record> {
                    self.$field.as_ref()
                }

                fn bag_mut(&mut self) -> &mut $record {
                    self.$field.get_or_insert_with(Default::default)
                }
            }
        )*

        impl $name {
            pub fn get<R: FeatureRecord>(&self) -> Option<&R>
            where
                Self: HasBag<R>,
            {
                HasBag::<R>::bag(self)
            }

            pub fn get_mut<R: FeatureRecord>(&mut self) -> &mut R
            where
                Self: HasBag<R>,
            {
                HasBag::<R>::bag_mut(self)
            }

            /// The record, or its declared defaults when the aspect never configured this element.
            pub fn or_default<R: FeatureRecord>(&self) -> Cow<'_, R>
            where
                Self: HasBag<R>,
            {
                match HasBag::<R>::bag(self) {
                    Some(record) => Cow::Borrowed(record),
                    None => Cow::Owned(R::default()),
                }
            }

            /// Aspects that configured this element.
            pub fn aspects(&self) -> Vec<Aspect> {
                let mut aspects = Vec::new();
                $(
                    if self.$field.is_some() {
                        aspects.push(<$record as FeatureRecord>::ASPECT);
                    }
                )*
                aspects
            }

            /// Read a feature by aspect and name. Unknown names and unconfigured aspects read as absent.
            pub fn feature(&self, aspect: Aspect, name: &str) -> Option<FeatureValue> {
                $(
                    if aspect == <$record as FeatureRecord>::ASPECT {
                        let key = <$record as FeatureRecord>::key(name)?;
                        return self.$field.as_ref().and_then(|record| record.get(key));
                    }
                )*
                None
            }
        }
    };
}

bags! {
    /// Feature records of a class.
    ClassFeatures {
        view: ViewClassFeatures,
        reporting: ReportingClassFeatures,
    }
}

bags! {
    /// Feature records of a field.
    FieldFeatures {
        core: CoreFieldFeatures,
        view: ViewFieldFeatures,
        reporting: ReportingFieldFeatures,
        geo: GeoFieldFeatures,
    }
}

bags! {
    /// Feature records of an action or an event.
    ActionFeatures {
        view: ViewActionFeatures,
        flow: FlowActionFeatures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_created_lazily_from_defaults() {
        let mut field = FieldFeatures::default();
        assert!(field.get::<ViewFieldFeatures>().is_none());
        assert!(field.or_default::<ViewFieldFeatures>().visible.is_true());

        field.get_mut::<ViewFieldFeatures>().visible.set(false);
        assert_eq!(field.aspects(), vec![Aspect::View]);
        assert_eq!(
            field.feature(Aspect::View, "visible"),
            Some(FeatureValue::Bool(false))
        );
    }

    #[test]
    fn dynamic_reads_of_unknown_features_are_absent() {
        let mut action = ActionFeatures::default();
        action.get_mut::<FlowActionFeatures>().next.set("Home".to_string());
        assert_eq!(action.feature(Aspect::Flow, "nextClass"), None);
        assert_eq!(action.feature(Aspect::Geo, "zoom"), None);
        assert_eq!(
            action.feature(Aspect::Flow, "next"),
            Some(FeatureValue::Text("Home".to_string()))
        );
    }
}
