//! Application bootstrap.
//!
//! [`AppBuilder`] loads the settings, installs logging, configures the schema with the
//! standard aspects and wires the navigation flow. The resulting [`AppContext`] owns all of it;
//! nothing is stored in process-wide statics apart from the tracing subscriber.

mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use aspects::ReportEngine;
use flow::{
    ActionExecutor, EventBus, FlowContext, FlowEvent, Localizer, Navigator, ObjectFactory,
    SessionId, SessionProvider, SessionTracker, ViewProvider,
};
use parking_lot::RwLock;
use schema::{ClassDefinition, SchemaRegistry};
use settings::{FlowSettings, LoggingSettings, SettingsStore, ViewSettings};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

pub use logging::{env_filter, init_logging};

/// Everything a running application needs.
pub struct AppContext {
    version: &'static str,
    settings: Arc<SettingsStore>,
    schema: Arc<RwLock<SchemaRegistry>>,
    sessions: Arc<SessionTracker>,
    navigator: Navigator,
    events: Option<UnboundedReceiver<FlowEvent>>,
    /// Keeps the non-blocking log writer flushing until the context is dropped.
    _log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    pub fn schema(&self) -> &Arc<RwLock<SchemaRegistry>> {
        &self.schema
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Receiver of the flow events. Can be taken once.
    pub fn take_events(&mut self) -> Option<UnboundedReceiver<FlowEvent>> {
        self.events.take()
    }

    /// Start a session and make it the active one.
    pub fn open_session(&self) -> SessionId {
        let session = SessionId::new();
        self.navigator.session_started(session);
        self.sessions.activate(session);
        session
    }

    /// End a session, destroying its forms. Returns the number of destroyed forms.
    pub fn close_session(&self, session: SessionId) -> usize {
        if self.sessions.active_session() == Some(session) {
            self.sessions.deactivate();
        }
        self.navigator.session_ended(session)
    }
}

/// Builder for [`AppContext`].
pub struct AppBuilder {
    version: &'static str,
    settings_file: Option<PathBuf>,
    logging: bool,
    report_engine: Option<Arc<dyn ReportEngine>>,
    classes: Vec<ClassDefinition>,
    views: Option<Arc<dyn ViewProvider>>,
    executor: Option<Arc<dyn ActionExecutor>>,
    objects: Option<Arc<dyn ObjectFactory>>,
    localizer: Option<Arc<dyn Localizer>>,
}

impl AppBuilder {
    pub fn new(version: &'static str) -> Self {
        Self {
            version,
            settings_file: None,
            logging: true,
            report_engine: None,
            classes: Vec::new(),
            views: None,
            executor: None,
            objects: None,
            localizer: None,
        }
    }

    /// RON file with the user's settings deltas. Without one, settings stay in memory.
    pub fn with_settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    /// Skip installing the tracing subscriber.
    pub fn without_logging(mut self) -> Self {
        self.logging = false;
        self
    }

    pub fn with_report_engine(mut self, engine: Arc<dyn ReportEngine>) -> Self {
        self.report_engine = Some(engine);
        self
    }

    pub fn with_class(mut self, class: ClassDefinition) -> Self {
        self.classes.push(class);
        self
    }

    pub fn with_views(mut self, views: Arc<dyn ViewProvider>) -> Self {
        self.views = Some(views);
        self
    }

    pub fn with_executor(mut self, executor: Arc<dyn ActionExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_objects(mut self, objects: Arc<dyn ObjectFactory>) -> Self {
        self.objects = Some(objects);
        self
    }

    pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = Some(localizer);
        self
    }

    pub fn build(self) -> Result<AppContext> {
        let settings = match &self.settings_file {
            Some(path) => SettingsStore::builder()
                .with_settings_file(path)
                .build()
                .with_context(|| format!("opening settings {}", path.display()))?,
            None => SettingsStore::in_memory(),
        };
        settings.register::<LoggingSettings>()?;
        settings.register::<ViewSettings>()?;
        settings.register::<FlowSettings>()?;

        let log_guard = if self.logging {
            let logging = settings.get::<LoggingSettings>()?;
            init_logging(&logging)?
        } else {
            None
        };

        let mut schema = aspects::schema_registry(self.report_engine);
        let class_count = self.classes.len();
        for class in self.classes {
            let name = class.name.clone();
            let report = schema
                .register(class)
                .with_context(|| format!("configuring class `{name}`"))?;
            for warning in report.warnings() {
                warn!(element = %warning.element, error = %warning.error, "configuration warning");
            }
        }
        let schema = Arc::new(RwLock::new(schema));

        let sessions = Arc::new(SessionTracker::new());
        let (events, receiver) = EventBus::channel();
        let mut cx = FlowContext::builder()
            .shared_schema(schema.clone())
            .sessions(sessions.clone())
            .events(events)
            .view_settings(settings.get::<ViewSettings>()?.as_ref().clone())
            .flow_settings(settings.get::<FlowSettings>()?.as_ref().clone());
        if let Some(views) = self.views {
            cx = cx.views(views);
        }
        if let Some(executor) = self.executor {
            cx = cx.executor(executor);
        }
        if let Some(objects) = self.objects {
            cx = cx.objects(objects);
        }
        if let Some(localizer) = self.localizer {
            cx = cx.localizer(localizer);
        }
        let navigator = Navigator::new(cx.build()?);

        info!(version = self.version, classes = class_count, "application context ready");
        Ok(AppContext {
            version: self.version,
            settings: Arc::new(settings),
            schema,
            sessions,
            navigator,
            events: Some(receiver),
            _log_guard: log_guard,
        })
    }
}
