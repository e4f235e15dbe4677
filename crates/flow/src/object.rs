use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use schema::ClassName;
use serde::{Deserialize, Serialize};

/// Session-scoped identity of a displayed domain object.
///
/// Ids are handed out by the session's [`ObjectArena`] the first time an object is shown and
/// stay stable until the object is released. Two equal but distinct instances get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// A live domain object the flow can display.
pub trait DomainObject: Send + Sync + fmt::Debug + 'static {
    /// Schema class the object is an instance of.
    fn class_name(&self) -> ClassName;
}

/// Creates session singletons when navigating to a class instead of an instance.
pub trait ObjectFactory: Send + Sync {
    fn create(&self, class: &ClassName) -> Option<Arc<dyn DomainObject>>;
}

#[derive(Debug, Clone)]
pub struct ObjectHandle {
    pub id: ObjectId,
    pub class: ClassName,
    pub object: Arc<dyn DomainObject>,
}

fn address(object: &Arc<dyn DomainObject>) -> usize {
    Arc::as_ptr(object) as *const () as usize
}

/// Per-session arena mapping live objects to [`ObjectId`]s by reference identity.
#[derive(Debug, Default)]
pub struct ObjectArena {
    next: u64,
    objects: HashMap<ObjectId, ObjectHandle>,
    by_address: HashMap<usize, ObjectId>,
    singletons: HashMap<ClassName, ObjectId>,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `object`, assigning a fresh one on first sight.
    pub fn adopt(&mut self, object: Arc<dyn DomainObject>) -> ObjectId {
        let addr = address(&object);
        if let Some(id) = self.by_address.get(&addr) {
            return *id;
        }
        self.next += 1;
        let id = ObjectId(self.next);
        let class = object.class_name();
        self.by_address.insert(addr, id);
        self.objects.insert(id, ObjectHandle { id, class, object });
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&ObjectHandle> {
        self.objects.get(&id)
    }

    pub fn id_of(&self, object: &Arc<dyn DomainObject>) -> Option<ObjectId> {
        self.by_address.get(&address(object)).copied()
    }

    pub fn singleton(&self, class: &str) -> Option<ObjectId> {
        self.singletons.get(class).copied()
    }

    /// Mark an adopted object as the session instance of its class.
    pub fn set_singleton(&mut self, id: ObjectId) -> bool {
        let Some(handle) = self.objects.get(&id) else {
            return false;
        };
        self.singletons.insert(handle.class.clone(), id);
        true
    }

    pub fn release(&mut self, id: ObjectId) -> Option<ObjectHandle> {
        let handle = self.objects.remove(&id)?;
        self.by_address.remove(&address(&handle.object));
        self.singletons.retain(|_, singleton| *singleton != id);
        Some(handle)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Customer(&'static str);

    impl DomainObject for Customer {
        fn class_name(&self) -> ClassName {
            "Customer".into()
        }
    }

    #[test]
    fn identity_not_equality_decides_the_id() {
        let mut arena = ObjectArena::new();
        let a: Arc<dyn DomainObject> = Arc::new(Customer("ann"));
        let b: Arc<dyn DomainObject> = Arc::new(Customer("ann"));

        let id_a = arena.adopt(a.clone());
        assert_eq!(arena.adopt(a.clone()), id_a);
        assert_ne!(arena.adopt(b), id_a);
        assert_eq!(arena.id_of(&a), Some(id_a));
        assert_eq!(arena.get(id_a).map(|h| h.class.as_str()), Some("Customer"));
    }

    #[test]
    fn release_forgets_singletons() {
        let mut arena = ObjectArena::new();
        let id = arena.adopt(Arc::new(Customer("bob")));
        assert!(arena.set_singleton(id));
        assert_eq!(arena.singleton("Customer"), Some(id));

        assert!(arena.release(id).is_some());
        assert_eq!(arena.singleton("Customer"), None);
        assert!(arena.is_empty());
    }
}
