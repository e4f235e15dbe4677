use std::sync::Arc;

use parking_lot::RwLock;
use schema::SchemaRegistry;
use settings::{FlowSettings, ViewSettings};

use crate::{
    ActionExecutor, EventBus, FlowError, Localizer, MapLocalizer, ObjectFactory, SessionProvider,
    ViewProvider,
};

/// Collaborators of the flow, handed to the [`Navigator`](crate::Navigator) at construction.
#[derive(Clone)]
pub struct FlowContext {
    pub(crate) schema: Arc<RwLock<SchemaRegistry>>,
    pub(crate) sessions: Arc<dyn SessionProvider>,
    pub(crate) localizer: Arc<dyn Localizer>,
    pub(crate) views: Arc<dyn ViewProvider>,
    pub(crate) objects: Option<Arc<dyn ObjectFactory>>,
    pub(crate) executor: Arc<dyn ActionExecutor>,
    pub(crate) events: EventBus,
    pub(crate) view_settings: ViewSettings,
    pub(crate) flow_settings: FlowSettings,
}

impl FlowContext {
    pub fn builder() -> FlowContextBuilder {
        FlowContextBuilder::default()
    }

    pub fn schema(&self) -> &Arc<RwLock<SchemaRegistry>> {
        &self.schema
    }

    pub fn sessions(&self) -> &Arc<dyn SessionProvider> {
        &self.sessions
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn view_settings(&self) -> &ViewSettings {
        &self.view_settings
    }

    pub fn flow_settings(&self) -> &FlowSettings {
        &self.flow_settings
    }
}

#[derive(Default)]
pub struct FlowContextBuilder {
    schema: Option<Arc<RwLock<SchemaRegistry>>>,
    sessions: Option<Arc<dyn SessionProvider>>,
    localizer: Option<Arc<dyn Localizer>>,
    views: Option<Arc<dyn ViewProvider>>,
    objects: Option<Arc<dyn ObjectFactory>>,
    executor: Option<Arc<dyn ActionExecutor>>,
    events: EventBus,
    view_settings: ViewSettings,
    flow_settings: FlowSettings,
}

impl FlowContextBuilder {
    pub fn schema(self, schema: SchemaRegistry) -> Self {
        self.shared_schema(Arc::new(RwLock::new(schema)))
    }

    pub fn shared_schema(mut self, schema: Arc<RwLock<SchemaRegistry>>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn sessions(mut self, sessions: Arc<dyn SessionProvider>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = Some(localizer);
        self
    }

    pub fn views(mut self, views: Arc<dyn ViewProvider>) -> Self {
        self.views = Some(views);
        self
    }

    pub fn objects(mut self, objects: Arc<dyn ObjectFactory>) -> Self {
        self.objects = Some(objects);
        self
    }

    pub fn executor(mut self, executor: Arc<dyn ActionExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn view_settings(mut self, settings: ViewSettings) -> Self {
        self.view_settings = settings;
        self
    }

    pub fn flow_settings(mut self, settings: FlowSettings) -> Self {
        self.flow_settings = settings;
        self
    }

    /// Sessions, views and executor are required; the rest have defaults.
    pub fn build(self) -> Result<FlowContext, FlowError> {
        Ok(FlowContext {
            schema: self.schema.unwrap_or_default(),
            sessions: self
                .sessions
                .ok_or(FlowError::MissingCollaborator("session provider"))?,
            localizer: self
                .localizer
                .unwrap_or_else(|| Arc::new(MapLocalizer::new())),
            views: self
                .views
                .ok_or(FlowError::MissingCollaborator("view provider"))?,
            objects: self.objects,
            executor: self
                .executor
                .ok_or(FlowError::MissingCollaborator("action executor"))?,
            events: self.events,
            view_settings: self.view_settings,
            flow_settings: self.flow_settings,
        })
    }
}
