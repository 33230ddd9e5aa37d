mod copy;
mod graph;

use std::fmt;

use crate::attributed::Class;
use crate::scope::Scope;
use crate::{Error, Result};

/// Handle to a scope in an [`Arena`].
///
/// Handles are generation checked: once a scope is destroyed, stale handles
/// to its slot are rejected even after the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId {
    index: u32,
    generation: u32,
}

impl ScopeId {
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}.{}", self.index, self.generation)
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    scope: Option<Scope>,
}

/// Owner of every scope in a property graph.
#[derive(Debug, Default)]
pub struct Arena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live scopes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn contains(&self, id: ScopeId) -> bool {
        self.get(id).is_ok()
    }

    pub fn get(&self, id: ScopeId) -> Result<&Scope> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.scope.as_ref())
            .ok_or_else(|| stale(id))
    }

    pub fn get_mut(&mut self, id: ScopeId) -> Result<&mut Scope> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.scope.as_mut())
            .ok_or_else(|| stale(id))
    }

    pub(crate) fn insert(&mut self, scope: Scope) -> ScopeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.scope = Some(scope);
            return ScopeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            scope: Some(scope),
        });
        ScopeId {
            index,
            generation: 0,
        }
    }

    /// Frees the slot without touching parents or children.
    pub(crate) fn release(&mut self, id: ScopeId) -> Result<Scope> {
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .ok_or_else(|| stale(id))?;
        let scope = slot.scope.take().ok_or_else(|| stale(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Ok(scope)
    }

    /// A new, empty root scope.
    pub fn create_scope(&mut self) -> ScopeId {
        self.insert(Scope::new())
    }

    /// A new root scope carrying `class` but no prescribed attributes.
    pub fn create_class<C: Class>(&mut self, class: C) -> ScopeId {
        self.insert(Scope::with_class(Box::new(class)))
    }

    pub fn ids(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.scope.as_ref().map(|_| ScopeId {
                index: index as u32,
                generation: slot.generation,
            })
        })
    }
}

fn stale(id: ScopeId) -> Error {
    Error::invalid_handle(format!("{id} does not refer to a live scope"))
}
