use std::any::TypeId;
use std::rc::Rc;

use tracing::debug;

use super::Signature;
use crate::attributed::Attributed;
use crate::containers::ChainedMap;

/// Registry of prescribed schemas keyed by host type.
///
/// Registration must happen before any attributed scope of that type is
/// constructed.
#[derive(Debug, Default)]
pub struct TypeManager {
    types: ChainedMap<TypeId, Rc<[Signature]>>,
}

impl TypeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema unless `type_id` is already registered. Returns whether
    /// it was added.
    pub fn add(&mut self, type_id: TypeId, signatures: Vec<Signature>) -> bool {
        self.types.insert(type_id, Rc::from(signatures))
    }

    pub fn register<T: Attributed>(&mut self) -> bool {
        let added = self.add(TypeId::of::<T>(), T::signatures());
        debug!(class = T::NAME, added, "register type");
        added
    }

    pub fn remove(&mut self, type_id: TypeId) -> bool {
        self.types.remove(&type_id).is_some()
    }

    pub fn unregister<T: Attributed>(&mut self) -> bool {
        self.remove(TypeId::of::<T>())
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.types.contains_key(&type_id)
    }

    pub fn is_registered<T: Attributed>(&self) -> bool {
        self.contains(TypeId::of::<T>())
    }

    pub fn get(&self, type_id: TypeId) -> Option<Rc<[Signature]>> {
        self.types.get(&type_id).cloned()
    }

    pub fn signatures_for<T: Attributed>(&self) -> Option<Rc<[Signature]>> {
        self.get(TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn clear(&mut self) {
        self.types.clear();
    }
}
