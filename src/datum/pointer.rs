use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::arena::ScopeId;

/// Runtime type information for objects stored in pointer datums.
pub trait Rtti: fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    /// Value equality against another object. Identity is checked first by
    /// [`Pointer`], so the default only matches the same object.
    fn equals(&self, _other: &dyn Rtti) -> bool {
        false
    }

    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

/// Payload of a pointer datum.
#[derive(Clone, Default)]
pub enum Pointer {
    #[default]
    Null,
    Object(Rc<dyn Rtti>),
    /// A scope in the same arena, used by the `"this"` attribute.
    Scope(ScopeId),
}

impl Pointer {
    pub fn object<T: Rtti + 'static>(value: T) -> Self {
        Pointer::Object(Rc::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Pointer::Null)
    }

    pub fn as_scope(&self) -> Option<ScopeId> {
        match self {
            Pointer::Scope(id) => Some(*id),
            _ => None,
        }
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Pointer::Object(object) => object.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for Pointer {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Pointer::Null, Pointer::Null) => true,
            (Pointer::Scope(a), Pointer::Scope(b)) => a == b,
            (Pointer::Object(a), Pointer::Object(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)) || a.equals(b.as_ref())
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pointer::Null => f.write_str("Null"),
            Pointer::Object(object) => f.debug_tuple("Object").field(object).finish(),
            Pointer::Scope(id) => f.debug_tuple("Scope").field(id).finish(),
        }
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pointer::Null => f.write_str("null"),
            Pointer::Object(object) => f.write_str(&object.describe()),
            Pointer::Scope(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Tag(u32);

    impl Rtti for Tag {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn equals(&self, other: &dyn Rtti) -> bool {
            other
                .as_any()
                .downcast_ref::<Tag>()
                .is_some_and(|other| other.0 == self.0)
        }
    }

    #[derive(Debug)]
    struct Opaque;

    impl Rtti for Opaque {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[rstest::rstest]
    fn identity_or_value_equality() {
        let a = Pointer::object(Tag(1));
        assert_eq!(a, a.clone());
        assert_eq!(a, Pointer::object(Tag(1)));
        assert_ne!(a, Pointer::object(Tag(2)));
        assert_ne!(a, Pointer::Null);
    }

    #[rstest::rstest]
    fn opaque_objects_compare_by_identity() {
        let a = Pointer::object(Opaque);
        assert_eq!(a, a.clone());
        assert_ne!(a, Pointer::object(Opaque));
        assert_eq!(a.downcast_ref::<Opaque>().map(|_| ()), Some(()));
        assert!(a.downcast_ref::<Tag>().is_none());
    }
}
