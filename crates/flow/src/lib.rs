//! Runtime navigation over the configured schema.
//!
//! A [`Navigator`] keeps one [`NavigationHistory`] and one [`ObjectArena`] per session, binds
//! domain objects to forms through the [`FormRegistry`] and routes action invocations through
//! the [`ConfirmationGate`]. All collaborators arrive through a [`FlowContext`]; nothing here
//! is process-global.

pub mod confirm;
pub mod context;
pub mod error;
pub mod events;
pub mod executor;
pub mod form;
pub mod history;
pub mod i18n;
pub mod navigator;
pub mod object;
pub mod position;
pub mod registry;
pub mod session;

pub use confirm::{
    ConfirmationGate, ConfirmationPrompt, GateDecision, InvocationMode, PendingConfirmation,
};
pub use context::{FlowContext, FlowContextBuilder};
pub use error::FlowError;
pub use events::{EventBus, FlowEvent};
pub use executor::ActionExecutor;
pub use form::{Form, ViewProvider};
pub use history::{NavigationEntry, NavigationHistory, PushOutcome};
pub use i18n::{LocalizationError, Localizer, MapLocalizer};
pub use navigator::{ActionOutcome, ForwardOutcome, Navigator, Target};
pub use object::{DomainObject, ObjectArena, ObjectFactory, ObjectHandle, ObjectId};
pub use position::{AreaKind, Position, PositionRules};
pub use registry::FormRegistry;
pub use session::{SessionId, SessionProvider, SessionTracker};
