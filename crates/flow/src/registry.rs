use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use schema::SchemaRegistry;
use tracing::{debug, warn};

use crate::{Form, FlowError, ObjectId, SessionId, SessionProvider};

type SessionForms = IndexMap<ObjectId, Arc<dyn Form>>;

/// Per-session association of displayed objects to their forms.
pub struct FormRegistry {
    sessions: Arc<dyn SessionProvider>,
    forms: Mutex<HashMap<SessionId, SessionForms>>,
}

impl FormRegistry {
    pub fn new(sessions: Arc<dyn SessionProvider>) -> Self {
        Self {
            sessions,
            forms: Mutex::new(HashMap::new()),
        }
    }

    fn resolve(&self, session: Option<SessionId>) -> Option<SessionId> {
        session.or_else(|| self.sessions.active_session())
    }

    pub fn open_session(&self, session: SessionId) {
        self.forms.lock().entry(session).or_default();
    }

    pub fn contains_session(&self, session: SessionId) -> bool {
        self.forms.lock().contains_key(&session)
    }

    /// Bind `form` to `object` in the given or active session, returning a replaced form.
    pub fn associate(
        &self,
        session: Option<SessionId>,
        object: ObjectId,
        form: Arc<dyn Form>,
    ) -> Result<Option<Arc<dyn Form>>, FlowError> {
        let session = self.resolve(session).ok_or(FlowError::NoActiveSession)?;
        let mut forms = self.forms.lock();
        let owned = forms
            .get_mut(&session)
            .ok_or(FlowError::UnknownSession(session))?;
        Ok(owned.insert(object, form))
    }

    /// Drop an association without destroying the form.
    pub fn remove(&self, session: Option<SessionId>, object: ObjectId) -> Option<Arc<dyn Form>> {
        let session = self.resolve(session)?;
        self.forms.lock().get_mut(&session)?.shift_remove(&object)
    }

    pub fn lookup(&self, session: Option<SessionId>, object: ObjectId) -> Option<Arc<dyn Form>> {
        let session = self.resolve(session)?;
        self.forms.lock().get(&session)?.get(&object).cloned()
    }

    /// All forms of a session, in association order.
    pub fn forms(&self, session: SessionId) -> Vec<Arc<dyn Form>> {
        self.forms
            .lock()
            .get(&session)
            .map(|owned| owned.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Forms of `session` bound to an instance of `class` or one of its subclasses.
    pub fn lookup_by_class(
        &self,
        session: SessionId,
        class: &str,
        schema: &SchemaRegistry,
    ) -> Vec<Arc<dyn Form>> {
        self.forms(session)
            .into_iter()
            .filter(|form| bound_to(form.as_ref(), class, schema))
            .collect()
    }

    /// [`lookup_by_class`](Self::lookup_by_class) over every live session.
    pub fn lookup_all_sessions_by_class(
        &self,
        class: &str,
        schema: &SchemaRegistry,
    ) -> HashMap<SessionId, Vec<Arc<dyn Form>>> {
        let snapshot: Vec<(SessionId, Vec<Arc<dyn Form>>)> = self
            .forms
            .lock()
            .iter()
            .map(|(session, owned)| (*session, owned.values().cloned().collect()))
            .collect();

        let mut found = HashMap::new();
        for (session, forms) in snapshot {
            let matching: Vec<_> = forms
                .into_iter()
                .filter(|form| bound_to(form.as_ref(), class, schema))
                .collect();
            if !matching.is_empty() {
                found.insert(session, matching);
            }
        }
        found
    }

    /// Destroy every form of `session` once and forget the session.
    pub fn teardown(&self, session: SessionId) -> usize {
        let Some(owned) = self.forms.lock().remove(&session) else {
            return 0;
        };
        let count = owned.len();
        for form in owned.into_values() {
            form.destroy();
        }
        debug!(%session, forms = count, "session forms destroyed");
        count
    }
}

fn bound_to(form: &dyn Form, class: &str, schema: &SchemaRegistry) -> bool {
    let bound = form.class();
    if !schema.contains(bound.as_str()) {
        warn!(class = %bound, object = %form.object(), "form bound to an unregistered class, skipped");
        return false;
    }
    schema.extends(bound.as_str(), class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionTracker;
    use parking_lot::Mutex as PlMutex;
    use schema::{ClassDefinition, ClassName};

    #[derive(Debug)]
    struct StubForm {
        object: ObjectId,
        class: ClassName,
        destroyed: PlMutex<u32>,
    }

    impl Form for StubForm {
        fn object(&self) -> ObjectId {
            self.object
        }
        fn class(&self) -> &ClassName {
            &self.class
        }
        fn screen_area(&self) -> Option<String> {
            None
        }
        fn show(&self, _area: &str) {}
        fn close(&self) {}
        fn destroy(&self) {
            *self.destroyed.lock() += 1;
        }
    }

    fn object_ids<const N: usize>() -> [ObjectId; N] {
        #[derive(Debug)]
        struct Dummy;
        impl crate::DomainObject for Dummy {
            fn class_name(&self) -> ClassName {
                "Dummy".into()
            }
        }
        let mut arena = crate::ObjectArena::new();
        std::array::from_fn(|_| arena.adopt(Arc::new(Dummy)))
    }

    fn form(object: ObjectId, class: &str) -> Arc<StubForm> {
        Arc::new(StubForm {
            object,
            class: class.into(),
            destroyed: PlMutex::new(0),
        })
    }

    fn schema() -> SchemaRegistry {
        let mut schema = SchemaRegistry::default();
        schema.register(ClassDefinition::new("Party")).unwrap();
        schema
            .register(ClassDefinition::new("Customer").extends("Party"))
            .unwrap();
        schema.register(ClassDefinition::new("Invoice")).unwrap();
        schema
    }

    #[test]
    fn associate_needs_a_session() {
        let tracker = Arc::new(SessionTracker::new());
        let registry = FormRegistry::new(tracker.clone());
        let [a] = object_ids();

        assert_eq!(
            registry.associate(None, a, form(a, "Customer")).unwrap_err(),
            FlowError::NoActiveSession
        );

        let session = SessionId::new();
        tracker.activate(session);
        assert_eq!(
            registry.associate(None, a, form(a, "Customer")).unwrap_err(),
            FlowError::UnknownSession(session)
        );

        registry.open_session(session);
        assert!(registry.associate(None, a, form(a, "Customer")).unwrap().is_none());
        assert!(registry.lookup(None, a).is_some());
        assert!(registry.lookup(Some(SessionId::new()), a).is_none());
    }

    #[test]
    fn class_lookup_follows_the_hierarchy_and_skips_unknown_classes() {
        let registry = FormRegistry::new(Arc::new(SessionTracker::new()));
        let schema = schema();
        let (s1, s2) = (SessionId::new(), SessionId::new());
        registry.open_session(s1);
        registry.open_session(s2);
        let [a, b, c, d] = object_ids();

        registry.associate(Some(s1), a, form(a, "Customer")).unwrap();
        registry.associate(Some(s1), b, form(b, "Invoice")).unwrap();
        registry.associate(Some(s1), c, form(c, "Ghost")).unwrap();
        registry.associate(Some(s2), d, form(d, "Party")).unwrap();

        let in_s1 = registry.lookup_by_class(s1, "Party", &schema);
        assert_eq!(in_s1.iter().map(|f| f.object()).collect::<Vec<_>>(), vec![a]);

        let all = registry.lookup_all_sessions_by_class("Party", &schema);
        assert_eq!(all.len(), 2);
        assert_eq!(all[&s2][0].object(), d);
        assert!(registry.lookup_all_sessions_by_class("Nothing", &schema).is_empty());
    }

    #[test]
    fn remove_keeps_the_form_alive() {
        let registry = FormRegistry::new(Arc::new(SessionTracker::new()));
        let session = SessionId::new();
        registry.open_session(session);
        let [a] = object_ids();
        let bound = form(a, "Customer");
        registry.associate(Some(session), a, bound.clone()).unwrap();

        assert!(registry.remove(Some(session), a).is_some());
        assert!(registry.lookup(Some(session), a).is_none());
        assert_eq!(*bound.destroyed.lock(), 0);
    }

    #[test]
    fn teardown_destroys_each_form_once() {
        let registry = FormRegistry::new(Arc::new(SessionTracker::new()));
        let session = SessionId::new();
        registry.open_session(session);
        let ids: [ObjectId; 3] = object_ids();
        let forms: Vec<_> = ids.iter().map(|id| form(*id, "Customer")).collect();
        for f in &forms {
            registry.associate(Some(session), f.object, f.clone()).unwrap();
        }

        assert_eq!(registry.teardown(session), 3);
        assert_eq!(registry.teardown(session), 0);
        assert!(forms.iter().all(|f| *f.destroyed.lock() == 1));
        assert!(!registry.contains_session(session));
    }
}
