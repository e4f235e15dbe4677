#![allow(dead_code)]

use std::sync::{Arc, OnceLock, Weak};

use features::{Annotation, Aspect};
use flow::{
    ActionExecutor, DomainObject, EventBus, FlowContext, FlowError, FlowEvent, Form,
    MapLocalizer, Navigator, ObjectFactory, ObjectHandle, ObjectId, SessionId, SessionTracker,
    ViewProvider,
};
use parking_lot::Mutex;
use schema::{ActionDefinition, ClassDefinition, ClassName, SchemaRegistry};
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug)]
pub struct Record {
    pub class: ClassName,
    pub name: String,
}

impl DomainObject for Record {
    fn class_name(&self) -> ClassName {
        self.class.clone()
    }
}

pub fn record(class: &str, name: &str) -> Arc<dyn DomainObject> {
    Arc::new(Record {
        class: class.into(),
        name: name.into(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(ObjectId, ClassName),
    Show(ObjectId, String),
    Close(ObjectId),
    Destroy(ObjectId),
    Refresh(ObjectId),
}

#[derive(Debug, Default)]
pub struct Journal {
    calls: Mutex<Vec<Call>>,
}

impl Journal {
    pub fn push(&self, call: Call) {
        self.calls.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, wanted: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| wanted(c)).count()
    }

    pub fn last(&self) -> Option<Call> {
        self.calls.lock().last().cloned()
    }
}

#[derive(Debug)]
pub struct TestForm {
    object: ObjectId,
    class: ClassName,
    area: Mutex<Option<String>>,
    journal: Arc<Journal>,
}

impl Form for TestForm {
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
        *self.area.lock() = Some(area.to_owned());
        self.journal.push(Call::Show(self.object, area.to_owned()));
    }

    fn close(&self) {
        *self.area.lock() = None;
        self.journal.push(Call::Close(self.object));
    }

    fn destroy(&self) {
        self.journal.push(Call::Destroy(self.object));
    }

    fn refresh(&self) {
        self.journal.push(Call::Refresh(self.object));
    }
}

pub struct TestViews {
    journal: Arc<Journal>,
}

impl ViewProvider for TestViews {
    fn create_form(&self, _session: SessionId, object: &ObjectHandle) -> Arc<dyn Form> {
        self.journal
            .push(Call::Create(object.id, object.class.clone()));
        Arc::new(TestForm {
            object: object.id,
            class: object.class.clone(),
            area: Mutex::new(None),
            journal: self.journal.clone(),
        })
    }
}

#[derive(Default)]
pub struct TestExecutor {
    calls: Mutex<Vec<(ObjectId, String)>>,
}

impl TestExecutor {
    pub fn calls(&self) -> Vec<(ObjectId, String)> {
        self.calls.lock().clone()
    }
}

impl ActionExecutor for TestExecutor {
    fn invoke(
        &self,
        _session: SessionId,
        target: &ObjectHandle,
        action: &str,
    ) -> Result<(), FlowError> {
        if action == "explode" {
            return Err(FlowError::Action {
                action: action.to_owned(),
                reason: "boom".into(),
            });
        }
        self.calls.lock().push((target.id, action.to_owned()));
        Ok(())
    }
}

/// Builds an instance of any class name it is asked for.
pub struct TestFactory;

impl ObjectFactory for TestFactory {
    fn create(&self, class: &ClassName) -> Option<Arc<dyn DomainObject>> {
        Some(record(class.as_str(), "singleton"))
    }
}

pub type NavigatorSlot = Arc<OnceLock<Weak<Navigator>>>;

/// A form that asks the navigator for the active area instead of tracking its own.
#[derive(Debug)]
pub struct NavigatorAwareForm {
    object: ObjectId,
    class: ClassName,
    session: SessionId,
    navigator: NavigatorSlot,
}

impl Form for NavigatorAwareForm {
    fn object(&self) -> ObjectId {
        self.object
    }

    fn class(&self) -> &ClassName {
        &self.class
    }

    fn screen_area(&self) -> Option<String> {
        let navigator = self.navigator.get()?.upgrade()?;
        navigator.active_area(self.session)
    }

    fn show(&self, _area: &str) {}

    fn close(&self) {}

    fn destroy(&self) {}
}

pub struct NavigatorAwareViews {
    pub navigator: NavigatorSlot,
}

impl ViewProvider for NavigatorAwareViews {
    fn create_form(&self, session: SessionId, object: &ObjectHandle) -> Arc<dyn Form> {
        Arc::new(NavigatorAwareForm {
            object: object.id,
            class: object.class.clone(),
            session,
            navigator: self.navigator.clone(),
        })
    }
}

pub fn schema() -> SchemaRegistry {
    let mut schema = aspects::schema_registry(None);
    schema.register(ClassDefinition::new("Party")).unwrap();
    schema
        .register(
            ClassDefinition::new("Customer")
                .extends("Party")
                .action(
                    ActionDefinition::new("delete")
                        .annotate(Aspect::Flow, Annotation::new().flag("confirmRequired", true)),
                )
                .action(
                    ActionDefinition::new("archive").annotate(
                        Aspect::Flow,
                        Annotation::new()
                            .flag("confirmRequired", true)
                            .text("confirmMessage", "$archive.question"),
                    ),
                )
                .action(
                    ActionDefinition::new("save").annotate(
                        Aspect::Flow,
                        Annotation::new()
                            .text("next", "Dashboard")
                            .text("position", "screen:main"),
                    ),
                )
                .action(
                    ActionDefinition::new("cancel")
                        .annotate(Aspect::Flow, Annotation::new().flag("back", true)),
                )
                .action(ActionDefinition::new("explode")),
        )
        .unwrap();
    schema
        .register(
            ClassDefinition::new("Dashboard")
                .annotate(Aspect::View, Annotation::new().text("layout", "screen:left")),
        )
        .unwrap();
    schema.register(ClassDefinition::new("Invoice")).unwrap();
    schema
}

pub struct Harness {
    pub navigator: Arc<Navigator>,
    pub sessions: Arc<SessionTracker>,
    pub journal: Arc<Journal>,
    pub executor: Arc<TestExecutor>,
    pub events: UnboundedReceiver<FlowEvent>,
}

impl Harness {
    pub fn new() -> Self {
        let journal = Arc::new(Journal::default());
        let views = Arc::new(TestViews {
            journal: journal.clone(),
        });
        Self::with_views(views, journal)
    }

    pub fn with_views(views: Arc<dyn ViewProvider>, journal: Arc<Journal>) -> Self {
        let sessions = Arc::new(SessionTracker::new());
        let executor = Arc::new(TestExecutor::default());
        let (bus, events) = EventBus::channel();
        let localizer =
            MapLocalizer::new().with("Customer.archive.question", "Archive this customer?");

        let cx = FlowContext::builder()
            .schema(schema())
            .sessions(sessions.clone())
            .views(views)
            .executor(executor.clone())
            .objects(Arc::new(TestFactory))
            .localizer(Arc::new(localizer))
            .events(bus)
            .build()
            .unwrap();

        Self {
            navigator: Arc::new(Navigator::new(cx)),
            sessions,
            journal,
            executor,
            events,
        }
    }

    /// Start and activate a fresh session.
    pub fn session(&self) -> SessionId {
        let session = SessionId::new();
        self.navigator.session_started(session);
        self.sessions.activate(session);
        session
    }

    pub fn adopt(&self, session: SessionId, class: &str, name: &str) -> ObjectId {
        self.navigator.adopt(session, record(class, name)).unwrap()
    }

    pub fn drain_events(&mut self) -> Vec<FlowEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}
