use std::fmt;
use std::sync::Arc;

use schema::ClassName;

use crate::{ObjectHandle, ObjectId, SessionId};

/// A live view component bound to one domain object.
///
/// Calls take `&self`; implementations keep their own interior state.
pub trait Form: Send + Sync + fmt::Debug {
    fn object(&self) -> ObjectId;

    fn class(&self) -> &ClassName;

    /// Area the form is currently shown in.
    fn screen_area(&self) -> Option<String>;

    fn show(&self, area: &str);

    fn close(&self);

    /// Final release when the owning session ends.
    fn destroy(&self);

    /// The bound class changed; re-read features and data.
    fn refresh(&self) {}
}

/// Rendering toolkit seam: produces forms for objects.
pub trait ViewProvider: Send + Sync {
    fn create_form(&self, session: SessionId, object: &ObjectHandle) -> Arc<dyn Form>;
}
