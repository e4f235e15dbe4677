//! Console walk-through: configure two classes, navigate between them and confirm an action.
//!
//! Run with `RUST_LOG` unset; the log level comes from the `logging` settings section.

use std::sync::Arc;

use anyhow::Result;
use app::AppBuilder;
use features::{Annotation, Aspect};
use flow::{
    ActionExecutor, ActionOutcome, DomainObject, FlowError, Form, InvocationMode, ObjectFactory,
    ObjectHandle, ObjectId, SessionId, ViewProvider,
};
use parking_lot::Mutex;
use schema::{ActionDefinition, ClassDefinition, ClassName, FieldDefinition, FieldType};
use tracing::info;

#[derive(Debug)]
struct Instance(ClassName);

impl DomainObject for Instance {
    fn class_name(&self) -> ClassName {
        self.0.clone()
    }
}

struct Singletons;

impl ObjectFactory for Singletons {
    fn create(&self, class: &ClassName) -> Option<Arc<dyn DomainObject>> {
        Some(Arc::new(Instance(class.clone())))
    }
}

#[derive(Debug)]
struct ConsoleForm {
    object: ObjectId,
    class: ClassName,
    area: Mutex<Option<String>>,
}

impl Form for ConsoleForm {
    fn object(&self) -> ObjectId {
        self.object
    }
    fn class(&self) -> &ClassName {
        &self.class
    }
    fn screen_area(&self) -> Option<String> {
        self.area.lock().clone()
    }
    fn show(&self, area: &str) {
        info!(object = %self.object, class = %self.class, area, "show");
        *self.area.lock() = Some(area.to_owned());
    }
    fn close(&self) {
        info!(object = %self.object, "close");
    }
    fn destroy(&self) {
        info!(object = %self.object, "destroy");
    }
}

struct ConsoleViews;

impl ViewProvider for ConsoleViews {
    fn create_form(&self, _session: SessionId, object: &ObjectHandle) -> Arc<dyn Form> {
        Arc::new(ConsoleForm {
            object: object.id,
            class: object.class.clone(),
            area: Mutex::new(None),
        })
    }
}

struct ConsoleExecutor;

impl ActionExecutor for ConsoleExecutor {
    fn invoke(&self, _: SessionId, target: &ObjectHandle, action: &str) -> Result<(), FlowError> {
        info!(object = %target.id, action, "executing");
        Ok(())
    }
}

fn main() -> Result<()> {
    let app = AppBuilder::new(env!("CARGO_PKG_VERSION"))
        .with_class(
            ClassDefinition::new("CustomerList")
                .field(FieldDefinition::new("customers", FieldType::collection("Customer")))
                .action(ActionDefinition::new("purge").annotate(
                    Aspect::Flow,
                    Annotation::new()
                        .flag("confirmRequired", true)
                        .text("confirmMessage", "Remove every customer?"),
                ))
                .action(ActionDefinition::new("open").annotate(
                    Aspect::Flow,
                    Annotation::new().text("next", "Dashboard"),
                )),
        )
        .with_class(ClassDefinition::new("Dashboard"))
        .with_views(Arc::new(ConsoleViews))
        .with_executor(Arc::new(ConsoleExecutor))
        .with_objects(Arc::new(Singletons))
        .build()?;

    let navigator = app.navigator();
    let session = app.open_session();

    navigator.forward(session, ClassName::from("CustomerList"), Some("screen:main"))?;
    let Some(list) = navigator.current(session) else {
        anyhow::bail!("customer list not shown");
    };

    if let ActionOutcome::AwaitingConfirmation(prompt) =
        navigator.invoke_action(session, list.id, "purge", InvocationMode::Normal)?
    {
        navigator.respond(session, prompt, true)?;
    }
    navigator.invoke_action(session, list.id, "open", InvocationMode::Normal)?;
    navigator.back(session)?;

    app.close_session(session);
    Ok(())
}
