use std::rc::Rc;

use smol_str::SmolStr;
use tracing::trace;

use super::{Arena, ScopeId};
use crate::attributed::ScopeClass;
use crate::constants::THIS_KEY;
use crate::datum::{Datum, DatumKind};
use crate::scope::Scope;
use crate::types::Signature;
use crate::{Error, Result};

type Snapshot = (
    Vec<(SmolStr, Datum)>,
    Option<Box<dyn ScopeClass>>,
    Option<Rc<[Signature]>>,
);

impl Arena {
    /// Deep copy of `source` as a new root. Nested scopes are copied and
    /// class fields are cloned and rebound; other datums follow
    /// [`Datum`]'s `Clone`.
    pub fn clone_scope(&mut self, source: ScopeId) -> Result<ScopeId> {
        let id = self.copy_subtree(source, None)?;
        trace!(%source, %id, "clone scope");
        Ok(id)
    }

    /// Replaces the contents of `target` with a deep copy of `source`.
    /// `target` keeps its handle and its parent.
    pub fn assign(&mut self, target: ScopeId, source: ScopeId) -> Result<()> {
        if target == source {
            return Ok(());
        }
        if self.is_ancestor(target, source)? {
            return Err(Error::invalid_argument(format!(
                "cannot assign {target} from its own descendant {source}"
            )));
        }
        let (entries, class, schema) = self.snapshot(source)?;
        self.clear(target)?;
        let scope = self.get_mut(target)?;
        scope.class = class;
        scope.schema = schema;
        self.install_copy(target, entries)
    }

    /// Moves the contents of `source` into a new scope that also takes
    /// `source`'s place in its parent. `source` is left an empty root.
    pub fn move_scope(&mut self, source: ScopeId) -> Result<ScopeId> {
        self.get(source)?;
        let target = self.insert(Scope::new());
        self.transfer(source, target)?;
        Ok(target)
    }

    /// Destroys the contents of `target`, then moves `source` into it the
    /// way [`Arena::move_scope`] does.
    pub fn move_assign(&mut self, target: ScopeId, source: ScopeId) -> Result<()> {
        if target == source {
            return Ok(());
        }
        if self.is_ancestor(target, source)? || self.is_ancestor(source, target)? {
            return Err(Error::invalid_argument(format!(
                "cannot move between {source} and {target}, one contains the other"
            )));
        }
        self.orphan(target)?;
        self.clear(target)?;
        let scope = self.get_mut(target)?;
        scope.class = None;
        scope.schema = None;
        self.transfer(source, target)
    }

    fn snapshot(&self, source: ScopeId) -> Result<Snapshot> {
        let scope = self.get(source)?;
        Ok((
            scope
                .entries
                .iter()
                .map(|(name, datum)| (name.clone(), datum.duplicate()))
                .collect(),
            scope.class.as_ref().map(|class| class.clone_class()),
            scope.schema.clone(),
        ))
    }

    fn copy_subtree(&mut self, source: ScopeId, parent: Option<ScopeId>) -> Result<ScopeId> {
        let (entries, class, schema) = self.snapshot(source)?;
        let mut scope = Scope::new();
        scope.class = class;
        scope.schema = schema;
        scope.parent = parent;
        let id = self.insert(scope);
        self.install_copy(id, entries)?;
        Ok(id)
    }

    fn install_copy(&mut self, target: ScopeId, mut entries: Vec<(SmolStr, Datum)>) -> Result<()> {
        for (_, datum) in entries.iter_mut() {
            if !datum.is_kind(DatumKind::Table) {
                continue;
            }
            let sources = datum.scopes().to_vec();
            let ids = datum.table_mut()?;
            ids.clear();
            for child in sources {
                ids.push(self.copy_subtree(child, Some(target))?);
            }
        }
        self.get_mut(target)?.set_entries(entries);
        self.rebind(target)
    }

    fn transfer(&mut self, source: ScopeId, target: ScopeId) -> Result<()> {
        let (entries, class, schema, parent) = {
            let scope = self.get_mut(source)?;
            (
                scope.take_entries(),
                scope.class.take(),
                scope.schema.take(),
                scope.parent.take(),
            )
        };
        if let Some(parent) = parent {
            let scope = self.get_mut(parent)?;
            if let Some((slot, index)) = scope.locate_child(source) {
                scope.entries[slot].1.table_mut()?[index] = target;
            }
        }
        let children: Vec<ScopeId> = entries
            .iter()
            .flat_map(|(_, datum)| datum.scopes().iter().copied())
            .collect();
        let scope = self.get_mut(target)?;
        scope.set_entries(entries);
        scope.class = class;
        scope.schema = schema;
        scope.parent = parent;
        for child in children {
            self.get_mut(child)?.parent = Some(target);
        }
        trace!(%source, %target, "move scope");
        self.repair_this(target)
    }

    /// Structural equality: same names in the same order with equal datums,
    /// comparing nested scopes by value. `"this"` is ignored.
    pub fn scopes_equal(&self, a: ScopeId, b: ScopeId) -> Result<bool> {
        if a == b {
            return Ok(true);
        }
        let left: Vec<_> = self
            .get(a)?
            .entries()
            .filter(|(name, _)| *name != THIS_KEY)
            .collect();
        let right: Vec<_> = self
            .get(b)?
            .entries()
            .filter(|(name, _)| *name != THIS_KEY)
            .collect();
        if left.len() != right.len() {
            return Ok(false);
        }
        for ((left_name, left_datum), (right_name, right_datum)) in left.into_iter().zip(right) {
            if left_name != right_name || !self.datums_equal(left_datum, right_datum)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Datum equality that compares table elements by scope contents.
    pub fn datums_equal(&self, a: &Datum, b: &Datum) -> Result<bool> {
        if !(a.is_kind(DatumKind::Table) && b.is_kind(DatumKind::Table)) {
            return Ok(a == b);
        }
        if a.len() != b.len() {
            return Ok(false);
        }
        for (left, right) in a.scopes().iter().zip(b.scopes()) {
            if !self.scopes_equal(*left, *right)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(arena: &mut Arena) -> ScopeId {
        let root = arena.create_scope();
        arena.append(root, "Name").unwrap().push_back(String::from("Bob")).unwrap();
        let child = arena.append_scope(root, "Address").unwrap();
        arena.append(child, "City").unwrap().push_back(String::from("Orlando")).unwrap();
        root
    }

    #[rstest::rstest]
    fn clone_is_deep_and_equal() {
        let mut arena = Arena::new();
        let root = sample(&mut arena);
        let copy = arena.clone_scope(root).unwrap();
        assert!(arena.scopes_equal(root, copy).unwrap());
        assert_eq!(arena.parent(copy).unwrap(), None);

        let original_child = arena.children(root).unwrap()[0];
        let copied_child = arena.children(copy).unwrap()[0];
        assert_ne!(original_child, copied_child);
        assert_eq!(arena.parent(copied_child).unwrap(), Some(copy));

        arena.append(copied_child, "City").unwrap().set(String::from("Tampa"), 0).unwrap();
        assert!(!arena.scopes_equal(root, copy).unwrap());
    }

    #[rstest::rstest]
    fn equality_is_order_sensitive() {
        let mut arena = Arena::new();
        let a = arena.create_scope();
        let b = arena.create_scope();
        arena.append(a, "x").unwrap();
        arena.append(a, "y").unwrap();
        arena.append(b, "y").unwrap();
        arena.append(b, "x").unwrap();
        assert!(!arena.scopes_equal(a, b).unwrap());
    }

    #[rstest::rstest]
    fn move_takes_the_parent_slot() {
        let mut arena = Arena::new();
        let root = sample(&mut arena);
        let child = arena.children(root).unwrap()[0];
        let moved = arena.move_scope(child).unwrap();

        assert_eq!(arena.children(root).unwrap(), vec![moved]);
        assert_eq!(arena.parent(moved).unwrap(), Some(root));
        assert_eq!(arena.parent(child).unwrap(), None);
        assert!(arena.get(child).unwrap().is_empty());
        assert_eq!(*arena.find(moved, "City").unwrap().unwrap(), "Orlando");
    }

    #[rstest::rstest]
    fn assign_keeps_handle_and_parent() {
        let mut arena = Arena::new();
        let root = sample(&mut arena);
        let holder = arena.create_scope();
        let target = arena.append_scope(holder, "slot").unwrap();
        arena.append(target, "stale").unwrap();

        arena.assign(target, root).unwrap();
        assert_eq!(arena.parent(target).unwrap(), Some(holder));
        assert!(arena.find(target, "stale").unwrap().is_none());
        assert!(arena.scopes_equal(target, root).unwrap());
    }

    #[rstest::rstest]
    fn move_assign_replaces_contents() {
        let mut arena = Arena::new();
        let source = sample(&mut arena);
        let target = arena.create_scope();
        let old_child = arena.append_scope(target, "old").unwrap();

        arena.move_assign(target, source).unwrap();
        assert!(!arena.contains(old_child));
        assert_eq!(*arena.find(target, "Name").unwrap().unwrap(), "Bob");
        let child = arena.children(target).unwrap()[0];
        assert_eq!(arena.parent(child).unwrap(), Some(target));
        assert!(arena.get(source).unwrap().is_empty());
    }
}
