//! Persistent, section-based settings.
//!
//! Every section is a plain serde struct with a `Default`. Only the fields that
//! differ from the default are written to the RON file, so new defaults reach
//! users who never touched a field.

mod errors;
mod sections;
mod store;

pub use errors::SettingsError;
pub use sections::{FlowSettings, LoggingSettings, ViewSettings};
pub use store::{SettingsStore, SettingsStoreBuilder};

/// A typed settings section.
pub trait Settings: Send + Sync + 'static {
    /// Root key of the section inside the settings file.
    const SECTION: &'static str;
}
