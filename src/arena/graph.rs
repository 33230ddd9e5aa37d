use tracing::trace;

use super::{Arena, ScopeId};
use crate::datum::Datum;
use crate::scope::Scope;
use crate::{Error, Result};

impl Arena {
    pub fn append(&mut self, id: ScopeId, name: &str) -> Result<&mut Datum> {
        self.get_mut(id)?.append(name)
    }

    /// Creates a child scope under the table datum `name`.
    pub fn append_scope(&mut self, parent: ScopeId, name: &str) -> Result<ScopeId> {
        let slot = {
            let scope = self.get_mut(parent)?;
            let slot = scope.append_slot(name)?;
            scope.entries[slot].1.table_mut()?;
            slot
        };
        let mut child = Scope::new();
        child.parent = Some(parent);
        let child = self.insert(child);
        self.get_mut(parent)?.entries[slot].1.table_mut()?.push(child);
        trace!(%parent, %child, name, "append scope");
        Ok(child)
    }

    /// Moves `child` under `parent` at `name`, detaching it from its previous
    /// parent first.
    pub fn adopt(&mut self, parent: ScopeId, child: ScopeId, name: &str) -> Result<()> {
        self.get(child)?;
        if parent == child || self.is_ancestor(child, parent)? {
            return Err(Error::invalid_argument(format!(
                "cannot adopt {child} into its own subtree"
            )));
        }
        let slot = {
            let scope = self.get_mut(parent)?;
            let slot = scope.append_slot(name)?;
            scope.entries[slot].1.table_mut()?;
            slot
        };
        self.orphan(child)?;
        self.get_mut(parent)?.entries[slot].1.table_mut()?.push(child);
        self.get_mut(child)?.parent = Some(parent);
        trace!(%parent, %child, name, "adopt");
        Ok(())
    }

    /// Detaches `child` from its parent, leaving it a root. Roots are left
    /// untouched.
    pub fn orphan(&mut self, child: ScopeId) -> Result<()> {
        let Some(parent) = self.get(child)?.parent else {
            return Ok(());
        };
        let scope = self.get_mut(parent)?;
        if let Some((slot, index)) = scope.locate_child(child) {
            scope.entries[slot].1.table_mut()?.remove(index);
        }
        self.get_mut(child)?.parent = None;
        Ok(())
    }

    pub fn parent(&self, id: ScopeId) -> Result<Option<ScopeId>> {
        Ok(self.get(id)?.parent)
    }

    pub fn children(&self, id: ScopeId) -> Result<Vec<ScopeId>> {
        Ok(self.get(id)?.children().collect())
    }

    /// True when `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: ScopeId, id: ScopeId) -> Result<bool> {
        let mut current = self.get(id)?.parent;
        while let Some(scope) = current {
            if scope == ancestor {
                return Ok(true);
            }
            current = self.get(scope)?.parent;
        }
        Ok(false)
    }

    /// Number of ancestors above `id`.
    pub fn depth(&self, id: ScopeId) -> Result<usize> {
        let mut depth = 0;
        let mut current = self.get(id)?.parent;
        while let Some(scope) = current {
            depth += 1;
            current = self.get(scope)?.parent;
        }
        Ok(depth)
    }

    pub fn find(&self, id: ScopeId, name: &str) -> Result<Option<&Datum>> {
        Ok(self.get(id)?.find(name))
    }

    /// Looks `name` up in `id` and then each ancestor, returning the scope
    /// that holds it.
    pub fn search(&self, id: ScopeId, name: &str) -> Result<Option<(ScopeId, &Datum)>> {
        let mut current = Some(id);
        while let Some(scope_id) = current {
            let scope = self.get(scope_id)?;
            if let Some(datum) = scope.find(name) {
                return Ok(Some((scope_id, datum)));
            }
            current = scope.parent;
        }
        Ok(None)
    }

    /// The table datum in `parent` that holds `child`, and `child`'s index
    /// in it.
    pub fn find_contained_scope(
        &self,
        parent: ScopeId,
        child: ScopeId,
    ) -> Result<Option<(&Datum, usize)>> {
        let scope = self.get(parent)?;
        Ok(scope
            .locate_child(child)
            .map(|(slot, index)| (&scope.entries[slot].1, index)))
    }

    /// Destroys `id` and everything below it.
    pub fn destroy(&mut self, id: ScopeId) -> Result<()> {
        self.orphan(id)?;
        self.destroy_subtree(id)
    }

    /// Removes every entry of `id`, destroying nested scopes.
    pub fn clear(&mut self, id: ScopeId) -> Result<()> {
        let entries = self.get_mut(id)?.take_entries();
        for (_, datum) in entries {
            for child in datum.scopes() {
                self.destroy_subtree(*child)?;
            }
        }
        Ok(())
    }

    pub(crate) fn destroy_subtree(&mut self, root: ScopeId) -> Result<()> {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            let scope = self.release(id)?;
            pending.extend(scope.children());
            trace!(%id, "destroy");
        }
        Ok(())
    }
}
