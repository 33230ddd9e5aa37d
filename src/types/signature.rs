use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::attributed::{Class, ScopeClass};
use crate::datum::{Binding, DatumKind, Element, Field};

/// Produces the binding for one prescribed field of a class instance.
pub type FieldAccessor = Rc<dyn Fn(&dyn ScopeClass) -> Option<Binding>>;

/// One prescribed attribute of a class.
///
/// For table signatures `count` is the number of child scopes created at
/// construction. For every other kind it is the length of the host field the
/// attribute is bound to.
#[derive(Clone)]
pub struct Signature {
    pub name: SmolStr,
    pub kind: DatumKind,
    pub count: usize,
    pub accessor: Option<FieldAccessor>,
}

impl Signature {
    pub fn table(name: &str, count: usize) -> Self {
        Self {
            name: SmolStr::new(name),
            kind: DatumKind::Table,
            count,
            accessor: None,
        }
    }

    /// A field signature for host type `T`, bound through `field`.
    pub fn field<T: 'static, E: Element>(
        name: &str,
        count: usize,
        field: fn(&T) -> &Field<E>,
    ) -> Self {
        let accessor: FieldAccessor = Rc::new(move |class: &dyn ScopeClass| {
            class
                .as_any()
                .downcast_ref::<T>()
                .map(|host| field(host).binding())
        });
        Self {
            name: SmolStr::new(name),
            kind: E::KIND,
            count,
            accessor: Some(accessor),
        }
    }

    pub fn with_accessor(name: &str, kind: DatumKind, count: usize, accessor: FieldAccessor) -> Self {
        Self {
            name: SmolStr::new(name),
            kind,
            count,
            accessor: Some(accessor),
        }
    }

    /// Re-targets a parent class's signature at a class `C` that embeds
    /// the parent, reached through `base`. Table signatures are unchanged.
    pub fn inherit<C: 'static, P: Class>(self, base: fn(&C) -> &P) -> Self {
        let Some(parent) = self.accessor.clone() else {
            return self;
        };
        let accessor: FieldAccessor = Rc::new(move |class: &dyn ScopeClass| {
            let host = class.as_any().downcast_ref::<C>()?;
            let embedded: &dyn ScopeClass = base(host);
            parent(embedded)
        });
        Self {
            accessor: Some(accessor),
            ..self
        }
    }

    pub fn is_table(&self) -> bool {
        self.kind == DatumKind::Table
    }

    pub fn bind(&self, class: &dyn ScopeClass) -> Option<Binding> {
        self.accessor.as_ref().and_then(|accessor| accessor(class))
    }
}

/// Signatures compare by name, kind and count.
impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind && self.count == other.count
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("count", &self.count)
            .field("bound", &self.accessor.is_some())
            .finish()
    }
}
