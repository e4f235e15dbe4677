//! Registry of configured schema classes.

use crate::configurator::{AspectConfigurator, ConfigReport, Owner, Sources};
use crate::definition::ClassDefinition;
use crate::element::{SchemaAction, SchemaClass, SchemaField};
use crate::error::SchemaError;
use crate::name::ClassName;
use features::{ClassFeatures, FeatureKey, FeatureRecord, FeatureValue, HasBag};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builder for [`SchemaRegistry`].
#[derive(Default)]
pub struct SchemaRegistryBuilder {
    configurators: Vec<Arc<dyn AspectConfigurator>>,
}

impl SchemaRegistryBuilder {
    pub fn with_configurator(mut self, configurator: impl AspectConfigurator + 'static) -> Self {
        self.configurators.push(Arc::new(configurator));
        self
    }

    pub fn with_shared_configurator(mut self, configurator: Arc<dyn AspectConfigurator>) -> Self {
        self.configurators.push(configurator);
        self
    }

    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            classes: HashMap::new(),
            definitions: HashMap::new(),
            configurators: self.configurators,
        }
    }
}

/// Configured classes plus the configurators that produce them.
///
/// Written during schema loading, read concurrently afterwards. Callers that toggle features at
/// runtime share the registry behind a lock.
#[derive(Default)]
pub struct SchemaRegistry {
    classes: HashMap<ClassName, SchemaClass>,
    definitions: HashMap<ClassName, ClassDefinition>,
    configurators: Vec<Arc<dyn AspectConfigurator>>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    pub fn add_configurator(&mut self, configurator: Arc<dyn AspectConfigurator>) {
        self.configurators.push(configurator);
    }

    pub fn configurators(&self) -> impl Iterator<Item = &dyn AspectConfigurator> {
        self.configurators.iter().map(|c| c.as_ref())
    }

    /// Configure a class and store it.
    ///
    /// Registering a class that already exists runs the pipeline again over the existing
    /// element: feature records are kept, members missing from the new definition are dropped
    /// and new ones are added.
    pub fn register(&mut self, definition: ClassDefinition) -> Result<ConfigReport, SchemaError> {
        self.check_hierarchy(&definition)?;

        let name = definition.name.clone();
        let mut class = self
            .classes
            .remove(&name)
            .unwrap_or_else(|| SchemaClass::new(name.clone(), definition.superclass.clone()));
        sync_members(&mut class, &definition);

        let report = self.configure(&mut class, &definition);
        if !report.is_empty() {
            warn!(class = %name, warnings = report.len(), "class configured with warnings");
        } else {
            debug!(class = %name, pass = class.configuration_passes(), "class configured");
        }

        self.definitions.insert(name.clone(), definition);
        self.classes.insert(name, class);
        Ok(report)
    }

    /// Run the pipeline again with the definition the class was registered with.
    pub fn reconfigure(&mut self, name: &str) -> Result<ConfigReport, SchemaError> {
        let definition = self
            .definitions
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownClass(ClassName::from(name)))?;
        self.register(definition)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn class(&self, name: &str) -> Option<&SchemaClass> {
        self.classes.get(name)
    }

    pub fn class_mut(&mut self, name: &str) -> Option<&mut SchemaClass> {
        self.classes.get_mut(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &SchemaClass> {
        self.classes.values()
    }

    pub fn field(&self, class: &str, field: &str) -> Option<&SchemaField> {
        self.class(class)?.field(field)
    }

    pub fn action(&self, class: &str, action: &str) -> Option<&SchemaAction> {
        self.class(class)?.action(action)
    }

    /// Registered ancestors of `name`, nearest first.
    pub fn superclasses(&self, name: &str) -> Vec<&SchemaClass> {
        let mut chain = Vec::new();
        let mut next = self.classes.get(name).and_then(|c| c.superclass.clone());
        while let Some(parent) = next {
            let Some(class) = self.classes.get(&parent) else {
                break;
            };
            if chain.len() > self.classes.len() {
                break;
            }
            chain.push(class);
            next = class.superclass.clone();
        }
        chain
    }

    /// Whether `class` is `ancestor` or inherits from it.
    pub fn extends(&self, class: &str, ancestor: &str) -> bool {
        class == ancestor
            || self
                .superclasses(class)
                .iter()
                .any(|parent| parent.name.as_str() == ancestor)
    }

    /// Effective class feature of a registered class.
    ///
    /// An explicit value on the class wins. Unset features that are modelled as inherited are
    /// looked up on the superclass chain, taking the first explicit value. Otherwise the declared
    /// default is returned.
    pub fn class_feature<R>(&self, class: &str, key: R::Key) -> Option<FeatureValue>
    where
        R: FeatureRecord,
        ClassFeatures: HasBag<R>,
    {
        let class = self.classes.get(class)?;
        self.resolve_class_feature::<R>(&class.features, class.superclass.as_ref(), key)
    }

    pub(crate) fn resolve_class_feature<R>(
        &self,
        own: &ClassFeatures,
        superclass: Option<&ClassName>,
        key: R::Key,
    ) -> Option<FeatureValue>
    where
        R: FeatureRecord,
        ClassFeatures: HasBag<R>,
    {
        let record = own.or_default::<R>();
        if record.is_set(key) || !key.inherited() {
            return record.get(key);
        }

        let mut next = superclass.cloned();
        let mut steps = 0;
        while let Some(parent) = next {
            let Some(class) = self.classes.get(&parent) else {
                break;
            };
            if let Some(parent_record) = class.features.get::<R>() {
                if parent_record.is_set(key) {
                    return parent_record.get(key);
                }
            }
            steps += 1;
            if steps > self.classes.len() {
                break;
            }
            next = class.superclass.clone();
        }
        record.get(key)
    }

    fn check_hierarchy(&self, definition: &ClassDefinition) -> Result<(), SchemaError> {
        let Some(superclass) = &definition.superclass else {
            return Ok(());
        };
        if superclass == &definition.name {
            return Err(SchemaError::SelfInheritance(definition.name.clone()));
        }
        if self.extends(superclass.as_str(), definition.name.as_str()) {
            return Err(SchemaError::InheritanceCycle(definition.name.clone()));
        }
        Ok(())
    }

    fn configure(&self, class: &mut SchemaClass, definition: &ClassDefinition) -> ConfigReport {
        let mut report = ConfigReport::default();
        let descriptor = definition.descriptor.as_ref();
        let class_path = definition.name.to_string();

        if let Some(descriptor) = descriptor {
            let fields: Vec<&str> = definition.fields.iter().map(|f| f.name.as_str()).collect();
            let actions: Vec<&str> = definition.actions.iter().map(|a| a.name.as_str()).collect();
            report.record(&class_path, descriptor.unknown_members(&fields, &actions));
        }

        for configurator in &self.configurators {
            configurator.begin_config_class(class, &mut report);
        }

        for configurator in &self.configurators {
            let aspect = configurator.aspect();
            let sources = Sources {
                element: &class_path,
                annotation: definition.annotations.get(aspect),
                getter: None,
                descriptor: descriptor.and_then(|d| d.aspect(aspect)),
            };
            configurator.config_class(class, &sources, self, &mut report);
        }

        {
            let SchemaClass {
                name,
                superclass,
                features,
                fields,
                actions,
                ..
            } = &mut *class;
            let owner = Owner {
                name: &*name,
                superclass: superclass.as_ref(),
                features: &*features,
                registry: self,
            };

            for field_definition in &definition.fields {
                let Some(field) = fields.get_mut(&field_definition.name) else {
                    continue;
                };
                let field_descriptor =
                    descriptor.and_then(|d| d.fields.get(&field_definition.name));
                let field_path = format!("{class_path}.{}", field_definition.name);

                for configurator in &self.configurators {
                    let aspect = configurator.aspect();
                    let sources = Sources {
                        element: &field_path,
                        annotation: field_definition.annotations.get(aspect),
                        getter: field_definition.getter_annotations.get(aspect),
                        descriptor: field_descriptor.and_then(|d| d.aspect(aspect)),
                    };
                    configurator.config_field(&owner, field, &sources, &mut report);
                }

                for event in field.events_mut() {
                    let event_descriptor = field_descriptor.and_then(|d| d.event(event.name()));
                    let event_path = format!("{field_path}#{}", event.name());
                    for configurator in &self.configurators {
                        let sources = Sources {
                            element: &event_path,
                            annotation: None,
                            getter: None,
                            descriptor: event_descriptor.and_then(|d| d.aspect(configurator.aspect())),
                        };
                        configurator.config_event(&owner, event, &sources, &mut report);
                    }
                }
            }

            for action_definition in &definition.actions {
                let Some(action) = actions.get_mut(&action_definition.name) else {
                    continue;
                };
                let action_descriptor =
                    descriptor.and_then(|d| d.actions.get(&action_definition.name));
                let action_path = format!("{class_path}.{}", action_definition.name);

                for configurator in &self.configurators {
                    let aspect = configurator.aspect();
                    let sources = Sources {
                        element: &action_path,
                        annotation: action_definition.annotations.get(aspect),
                        getter: None,
                        descriptor: action_descriptor.and_then(|d| d.aspect(aspect)),
                    };
                    configurator.config_action(&owner, action, &sources, &mut report);
                }
            }
        }

        for configurator in &self.configurators {
            configurator.end_config_class(class, self, &mut report);
        }

        class.finish_pass();
        report
    }
}

/// Bring the members of `class` in line with `definition`, keeping existing feature records.
fn sync_members(class: &mut SchemaClass, definition: &ClassDefinition) {
    let descriptor = definition.descriptor.as_ref();
    class.superclass = definition.superclass.clone();

    class
        .fields
        .retain(|name, _| definition.fields.iter().any(|f| &f.name == name));
    for field_definition in &definition.fields {
        let field = class
            .fields
            .entry(field_definition.name.clone())
            .or_insert_with(|| {
                SchemaField::new(
                    definition.name.clone(),
                    field_definition.name.clone(),
                    field_definition.ty.clone(),
                )
            });
        field.set_has_descriptor(
            descriptor.is_some_and(|d| d.fields.contains_key(&field_definition.name)),
        );
    }

    class
        .actions
        .retain(|name, _| definition.actions.iter().any(|a| &a.name == name));
    for action_definition in &definition.actions {
        let action = class
            .actions
            .entry(action_definition.name.clone())
            .or_insert_with(|| SchemaAction::new(definition.name.clone(), action_definition.name.clone()));
        action.set_signature(
            action_definition.parameters,
            action_definition.return_type.clone(),
        );
        action.set_has_descriptor(
            descriptor.is_some_and(|d| d.actions.contains_key(&action_definition.name)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::FieldDefinition;
    use crate::element::FieldType;
    use features::{ViewClassFeature, ViewClassFeatures};
    use pretty_assertions::assert_eq;

    fn class_with_render(name: &str, superclass: Option<&str>, render: Option<&str>) -> SchemaClass {
        let mut class = SchemaClass::new(ClassName::from(name), superclass.map(ClassName::from));
        if let Some(render) = render {
            class
                .features
                .get_mut::<ViewClassFeatures>()
                .render
                .set(render.to_string());
        }
        class
    }

    #[test]
    fn inherited_class_features_follow_the_superclass_chain() {
        let mut registry = SchemaRegistry::default();
        for class in [
            class_with_render("Base", None, Some("menu")),
            class_with_render("Middle", Some("Base"), None),
            class_with_render("Leaf", Some("Middle"), None),
        ] {
            registry.classes.insert(class.name.clone(), class);
        }

        assert_eq!(
            registry.class_feature::<ViewClassFeatures>("Leaf", ViewClassFeature::Render),
            Some(FeatureValue::Text("menu".to_string()))
        );
        // label is not inherited
        registry
            .class_mut("Base")
            .unwrap()
            .features
            .get_mut::<ViewClassFeatures>()
            .label
            .set("Base".to_string());
        assert_eq!(
            registry.class_feature::<ViewClassFeatures>("Leaf", ViewClassFeature::Label),
            None
        );
        assert!(registry.extends("Leaf", "Base"));
        assert!(!registry.extends("Base", "Leaf"));
    }

    #[test]
    fn self_inheritance_is_rejected() {
        let mut registry = SchemaRegistry::default();
        let err = registry
            .register(ClassDefinition::new("Loop").extends("Loop"))
            .unwrap_err();
        assert_eq!(err, SchemaError::SelfInheritance(ClassName::from("Loop")));
    }

    #[test]
    fn reregistering_drops_members_missing_from_the_definition() {
        let mut registry = SchemaRegistry::default();
        registry
            .register(
                ClassDefinition::new("Person")
                    .field(FieldDefinition::new("name", FieldType::primitive("String")))
                    .field(FieldDefinition::new("age", FieldType::primitive("i64"))),
            )
            .unwrap();
        registry
            .register(
                ClassDefinition::new("Person")
                    .field(FieldDefinition::new("name", FieldType::primitive("String"))),
            )
            .unwrap();

        let person = registry.class("Person").unwrap();
        assert_eq!(person.fields().count(), 1);
        assert_eq!(person.configuration_passes(), 2);
    }

    #[test]
    fn unknown_class_cannot_be_reconfigured() {
        let mut registry = SchemaRegistry::default();
        assert!(matches!(
            registry.reconfigure("Ghost"),
            Err(SchemaError::UnknownClass(_))
        ));
    }
}
