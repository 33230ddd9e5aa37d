use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::arena::{Arena, ScopeId};
use crate::constants::THIS_KEY;
use crate::datum::{Datum, Pointer};
use crate::scope::Scope;
use crate::types::{Signature, TypeManager};
use crate::{Error, Result};

/// Concrete type carried by a scope.
///
/// Implemented for every [`Class`]; the object-safe half used by the arena.
pub trait ScopeClass: Any + fmt::Debug {
    fn class_name(&self) -> &str;

    fn clone_class(&self) -> Box<dyn ScopeClass>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A named scope type.
pub trait Class: Clone + fmt::Debug + 'static {
    const NAME: &'static str;
}

impl<T: Class> ScopeClass for T {
    fn class_name(&self) -> &str {
        T::NAME
    }

    fn clone_class(&self) -> Box<dyn ScopeClass> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A class whose fields are exposed as prescribed attributes.
///
/// A derived class lists the parent's signatures in its own schema, usually
/// by extending `Parent::signatures()` mapped through [`Signature::inherit`].
pub trait Attributed: Class {
    fn signatures() -> Vec<Signature>;
}

impl Arena {
    /// Constructs an attributed scope for `value`, binding its prescribed
    /// attributes to `value`'s fields.
    pub fn create_attributed<T: Attributed>(
        &mut self,
        types: &TypeManager,
        value: T,
    ) -> Result<ScopeId> {
        let schema = types.get(TypeId::of::<T>()).unwrap_or_else(|| {
            debug!(class = T::NAME, "type not registered, no prescribed attributes");
            Rc::from(Vec::new())
        });
        let mut scope = Scope::with_class(Box::new(value));
        scope.schema = Some(schema);
        let id = self.insert(scope);
        if let Err(err) = self.populate(id) {
            self.destroy(id)?;
            return Err(err);
        }
        Ok(id)
    }

    fn schema_of(&self, id: ScopeId) -> Result<Option<Rc<[Signature]>>> {
        Ok(self.get(id)?.schema.clone())
    }

    fn populate(&mut self, id: ScopeId) -> Result<()> {
        let Some(schema) = self.schema_of(id)? else {
            return Ok(());
        };
        self.append(id, THIS_KEY)?.assign(Pointer::Scope(id))?;
        for signature in schema.iter() {
            if signature.is_table() {
                let scope = self.get_mut(id)?;
                let slot = scope.append_slot(&signature.name)?;
                scope.entries[slot].1.table_mut()?;
                for _ in 0..signature.count {
                    self.append_scope(id, &signature.name)?;
                }
            } else {
                self.bind_signature(id, signature)?;
            }
        }
        Ok(())
    }

    fn bind_signature(&mut self, id: ScopeId, signature: &Signature) -> Result<()> {
        let scope = self.get_mut(id)?;
        let binding = scope
            .class()
            .and_then(|class| signature.bind(class))
            .ok_or_else(|| {
                Error::schema(format!(
                    "{} has no field for prescribed attribute {:?}",
                    scope.class_name(),
                    signature.name
                ))
            })?;
        if binding.kind() != signature.kind || binding.len() != signature.count {
            return Err(Error::schema(format!(
                "field for {:?} is {}[{}], signature declares {}[{}]",
                signature.name,
                binding.kind(),
                binding.len(),
                signature.kind,
                signature.count
            )));
        }
        scope.append(&signature.name)?.bind(binding)
    }

    /// Points every prescribed field attribute of `id` at `id`'s own class
    /// fields and refreshes `"this"`.
    pub(crate) fn rebind(&mut self, id: ScopeId) -> Result<()> {
        let Some(schema) = self.schema_of(id)? else {
            return Ok(());
        };
        for signature in schema.iter().filter(|signature| !signature.is_table()) {
            self.bind_signature(id, signature)?;
        }
        self.repair_this(id)
    }

    pub(crate) fn repair_this(&mut self, id: ScopeId) -> Result<()> {
        if self.get(id)?.is_attributed() {
            self.append(id, THIS_KEY)?.assign(Pointer::Scope(id))?;
        }
        Ok(())
    }

    /// Appends a non-prescribed attribute to `id`.
    pub fn append_auxiliary_attribute(&mut self, id: ScopeId, name: &str) -> Result<&mut Datum> {
        self.get_mut(id)?.append_auxiliary_attribute(name)
    }
}
