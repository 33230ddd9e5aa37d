use std::fmt;

use smol_str::SmolStr;
use tracing::debug;

use crate::arena::{Arena, ScopeId};
use crate::attributed::{Attributed, Class};
use crate::constants::DEFAULT_CLASS;
use crate::containers::ChainedMap;
use crate::types::TypeManager;
use crate::{Error, Result};

pub type Constructor = Box<dyn Fn(&mut Arena, &TypeManager) -> Result<ScopeId>>;

/// Creates scopes by class name.
pub struct Factory {
    constructors: ChainedMap<SmolStr, Constructor>,
}

impl Factory {
    /// A factory that already knows `"Scope"`.
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register_scope(DEFAULT_CLASS);
        factory
    }

    pub fn empty() -> Self {
        Self {
            constructors: ChainedMap::new(),
        }
    }

    /// Adds `constructor` under `name` unless the name is taken.
    pub fn register(&mut self, name: &str, constructor: Constructor) -> bool {
        let added = self.constructors.insert(SmolStr::new(name), constructor);
        debug!(class = name, added, "register class");
        added
    }

    /// Registers `name` as an alias for a plain scope.
    pub fn register_scope(&mut self, name: &str) -> bool {
        self.register(
            name,
            Box::new(|arena: &mut Arena, _: &TypeManager| -> Result<ScopeId> {
                Ok(arena.create_scope())
            }),
        )
    }

    pub fn register_class<C: Class + Default>(&mut self) -> bool {
        self.register(
            C::NAME,
            Box::new(|arena: &mut Arena, _: &TypeManager| -> Result<ScopeId> {
                Ok(arena.create_class(C::default()))
            }),
        )
    }

    pub fn register_attributed<T: Attributed + Default>(&mut self) -> bool {
        self.register(
            T::NAME,
            Box::new(|arena: &mut Arena, types: &TypeManager| -> Result<ScopeId> {
                arena.create_attributed(types, T::default())
            }),
        )
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.constructors.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(SmolStr::as_str)
    }

    /// Builds a new root scope of class `name` in `arena`.
    pub fn create(&self, name: &str, arena: &mut Arena, types: &TypeManager) -> Result<ScopeId> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| Error::unregistered_class(name))?;
        let id = constructor(arena, types)?;
        debug!(class = name, %id, "instantiate");
        Ok(id)
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Factory").field("classes", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[derive(Debug, Clone, Default)]
    struct Marker;

    impl Class for Marker {
        const NAME: &'static str = "Marker";
    }

    #[rstest::rstest]
    fn creates_registered_classes() {
        let mut factory = Factory::new();
        assert!(factory.register_class::<Marker>());
        assert!(!factory.register_class::<Marker>());
        assert_eq!(factory.len(), 2);

        let mut arena = Arena::new();
        let types = TypeManager::new();
        let scope = factory.create("Scope", &mut arena, &types).unwrap();
        assert_eq!(arena.get(scope).unwrap().class_name(), "Scope");
        let marker = factory.create("Marker", &mut arena, &types).unwrap();
        assert!(arena.get(marker).unwrap().class_as::<Marker>().is_some());
    }

    #[rstest::rstest]
    fn unknown_names_fail() {
        let factory = Factory::empty();
        let mut arena = Arena::new();
        let err = factory
            .create("Scope", &mut arena, &TypeManager::new())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnregisteredClass);
        assert!(arena.is_empty());
    }

    #[rstest::rstest]
    fn remove_unregisters() {
        let mut factory = Factory::new();
        assert!(factory.remove("Scope"));
        assert!(!factory.contains("Scope"));
        assert!(factory.is_empty());
    }
}
