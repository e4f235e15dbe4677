//! Field dependency graph.
//!
//! A field lists the siblings it reacts to in its view `dependsOn` feature. The reverse edges are
//! stored in each target's `depends` feature, which is what gets walked when a field changes.
//! Notification is not recursive, so a cycle only causes redundant refreshes.

use crate::element::SchemaClass;
use features::ViewFieldFeatures;
use tracing::trace;

/// Rebuild the `depends` sets of `class` from the `dependsOn` declarations of its fields.
///
/// Targets that are not fields of the class are skipped. Safe to run repeatedly. Returns the
/// number of edges added by this call.
pub fn update_field_dependencies(class: &mut SchemaClass) -> usize {
    let edges: Vec<(String, String)> = class
        .fields()
        .flat_map(|field| {
            let dependent = field.name().to_string();
            field
                .features
                .get::<ViewFieldFeatures>()
                .map(|view| view.depends_on.items().to_vec())
                .unwrap_or_default()
                .into_iter()
                .map(move |target| (target, dependent.clone()))
        })
        .collect();

    let mut added = 0;
    for (target, dependent) in edges {
        let Some(field) = class.field_mut(&target) else {
            trace!(target = %target, dependent = %dependent, "dependency target not found");
            continue;
        };
        let view = field.features.get_mut::<ViewFieldFeatures>();
        if view.depends.insert_unique(&dependent) {
            added += 1;
        }
    }
    added
}

impl SchemaClass {
    /// Fields that `field` declared it depends on.
    pub fn depends_on(&self, field: &str) -> &[String] {
        self.field(field)
            .and_then(|f| f.features.get::<ViewFieldFeatures>())
            .map(|view| view.depends_on.items())
            .unwrap_or(&[])
    }

    /// Fields to refresh when `field` changes.
    pub fn dependents(&self, field: &str) -> &[String] {
        self.field(field)
            .and_then(|f| f.features.get::<ViewFieldFeatures>())
            .map(|view| view.depends.items())
            .unwrap_or(&[])
    }
}
