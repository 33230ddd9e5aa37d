use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::arena::ScopeId;
use crate::attributed::ScopeClass;
use crate::constants::{DEFAULT_CLASS, THIS_KEY};
use crate::containers::ChainedMap;
use crate::datum::{Datum, DatumKind};
use crate::types::Signature;
use crate::{Error, Result};

/// Ordered table of named datums.
///
/// Scopes live in an [`Arena`](crate::Arena); nested scopes are referenced
/// from table datums by [`ScopeId`]. Operations that touch more than one scope
/// (nesting, re-parenting, deep copies) are on the arena.
pub struct Scope {
    pub(crate) entries: Vec<(SmolStr, Datum)>,
    pub(crate) index: ChainedMap<SmolStr, usize>,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) class: Option<Box<dyn ScopeClass>>,
    pub(crate) schema: Option<Rc<[Signature]>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: ChainedMap::new(),
            parent: None,
            class: None,
            schema: None,
        }
    }

    pub(crate) fn with_class(class: Box<dyn ScopeClass>) -> Self {
        let mut scope = Scope::new();
        scope.class = Some(class);
        scope
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Local lookup only; see [`Arena::search`](crate::Arena::search).
    pub fn find(&self, name: &str) -> Option<&Datum> {
        let slot = self.slot_of(name)?;
        self.entries.get(slot).map(|(_, datum)| datum)
    }

    /// Mutable lookup. Table datums are not handed out; their children
    /// change through the arena only.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Datum> {
        let slot = self.slot_of(name)?;
        self.get_mut(slot).map(|(_, datum)| datum)
    }

    pub fn get(&self, slot: usize) -> Option<(&str, &Datum)> {
        self.entries
            .get(slot)
            .map(|(name, datum)| (name.as_str(), datum))
    }

    /// Like [`Scope::find_mut`], `None` for table datums.
    pub fn get_mut(&mut self, slot: usize) -> Option<(&str, &mut Datum)> {
        self.entries
            .get_mut(slot)
            .filter(|(_, datum)| !datum.is_kind(DatumKind::Table))
            .map(|(name, datum)| (name.as_str(), datum))
    }

    pub(crate) fn slot_mut(&mut self, slot: usize) -> Option<&mut Datum> {
        self.entries.get_mut(slot).map(|(_, datum)| datum)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Datum)> {
        self.entries
            .iter()
            .map(|(name, datum)| (name.as_str(), datum))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Slot of `name`, appending an unset datum when it is new.
    pub(crate) fn append_slot(&mut self, name: &str) -> Result<usize> {
        if name.is_empty() {
            return Err(Error::invalid_argument("property names must not be empty"));
        }
        if let Some(slot) = self.slot_of(name) {
            return Ok(slot);
        }
        let slot = self.entries.len();
        let key = SmolStr::new(name);
        self.entries.push((key.clone(), Datum::new()));
        self.index.insert(key, slot);
        Ok(slot)
    }

    /// Existing datum for `name`, or a new unset one.
    ///
    /// Datums created here hold no scopes; use
    /// [`Arena::append_scope`](crate::Arena::append_scope) to nest. An
    /// existing table datum is a schema violation.
    pub fn append(&mut self, name: &str) -> Result<&mut Datum> {
        let slot = self.append_slot(name)?;
        let datum = &mut self.entries[slot].1;
        if datum.is_kind(DatumKind::Table) {
            return Err(Error::schema(format!(
                "{name:?} holds nested scopes, change it through the arena"
            )));
        }
        Ok(datum)
    }

    pub(crate) fn take_entries(&mut self) -> Vec<(SmolStr, Datum)> {
        self.index.clear();
        std::mem::take(&mut self.entries)
    }

    pub(crate) fn set_entries(&mut self, entries: Vec<(SmolStr, Datum)>) {
        self.index.clear();
        for (slot, (name, _)) in entries.iter().enumerate() {
            self.index.insert(name.clone(), slot);
        }
        self.entries = entries;
    }

    /// Ids of every nested scope, in entry order.
    pub fn children(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.entries
            .iter()
            .flat_map(|(_, datum)| datum.scopes().iter().copied())
    }

    /// Slot of the table datum holding `child` and its index in that datum.
    pub fn locate_child(&self, child: ScopeId) -> Option<(usize, usize)> {
        self.entries.iter().enumerate().find_map(|(slot, (_, datum))| {
            if !datum.is_kind(DatumKind::Table) {
                return None;
            }
            datum.position_of_scope(child).map(|index| (slot, index))
        })
    }

    pub fn class(&self) -> Option<&dyn ScopeClass> {
        self.class.as_deref()
    }

    pub fn class_mut(&mut self) -> Option<&mut (dyn ScopeClass + 'static)> {
        self.class.as_deref_mut()
    }

    pub fn class_as<T: 'static>(&self) -> Option<&T> {
        self.class.as_ref()?.as_any().downcast_ref::<T>()
    }

    pub fn class_as_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.class.as_mut()?.as_any_mut().downcast_mut::<T>()
    }

    pub fn class_name(&self) -> &str {
        self.class.as_ref().map_or(DEFAULT_CLASS, |class| class.class_name())
    }

    /// Prescribed signatures, present on attributed scopes only.
    pub fn schema(&self) -> Option<&[Signature]> {
        self.schema.as_deref()
    }

    pub fn is_attributed(&self) -> bool {
        self.schema.is_some()
    }

    pub fn is_attribute(&self, name: &str) -> bool {
        self.slot_of(name).is_some()
    }

    /// `"this"` and every schema name count as prescribed.
    pub fn is_prescribed_attribute(&self, name: &str) -> bool {
        match &self.schema {
            Some(schema) => {
                name == THIS_KEY || schema.iter().any(|signature| signature.name == name)
            }
            None => false,
        }
    }

    pub fn is_auxiliary_attribute(&self, name: &str) -> bool {
        self.is_attribute(name) && !self.is_prescribed_attribute(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Datum)> {
        self.entries()
    }

    pub fn prescribed_attributes(&self) -> impl Iterator<Item = (&str, &Datum)> {
        self.entries()
            .filter(|(name, _)| self.is_prescribed_attribute(name))
    }

    pub fn auxiliary_attributes(&self) -> impl Iterator<Item = (&str, &Datum)> {
        self.entries()
            .filter(|(name, _)| !self.is_prescribed_attribute(name))
    }

    /// Appends a property that is not part of the schema.
    pub fn append_auxiliary_attribute(&mut self, name: &str) -> Result<&mut Datum> {
        if self.is_prescribed_attribute(name) {
            return Err(Error::schema(format!(
                "{name:?} is a prescribed attribute of {}",
                self.class_name()
            )));
        }
        self.append(name)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("class", &self.class_name())
            .field("parent", &self.parent)
            .field("entries", &self.entries)
            .finish()
    }
}
