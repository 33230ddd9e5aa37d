use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::pointer::Pointer;
use super::DatumKind;
use crate::arena::ScopeId;
use crate::num::{Mat4, Vec4};

/// Fixed-length storage owned by a host object that a [`Datum`](super::Datum)
/// can view.
///
/// Cloning a `Field` copies its elements into new storage, so a cloned host
/// never shares fields with its source. Views are handed out through
/// [`Field::binding`].
pub struct Field<T>(Rc<RefCell<Vec<T>>>);

impl<T> Field<T> {
    pub fn new(values: Vec<T>) -> Self {
        Field(Rc::new(RefCell::new(values)))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn borrow(&self) -> Ref<'_, [T]> {
        Ref::map(self.0.borrow(), Vec::as_slice)
    }

    pub fn borrow_mut(&self) -> RefMut<'_, [T]> {
        RefMut::map(self.0.borrow_mut(), Vec::as_mut_slice)
    }

    pub fn set(&self, index: usize, value: T) -> bool {
        match self.0.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// True when both handles view the same storage.
    pub fn same_storage(&self, other: &Field<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn share(&self) -> Field<T> {
        Field(Rc::clone(&self.0))
    }
}

impl<T: Clone> Field<T> {
    pub fn scalar(value: T) -> Self {
        Field::new(vec![value])
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.0.borrow().get(index).cloned()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.0.borrow().clone()
    }
}

impl<T: Element> Field<T> {
    /// A kinded handle onto this storage for binding a datum.
    pub fn binding(&self) -> Binding {
        T::binding(self.share())
    }
}

impl<T: Clone> Clone for Field<T> {
    fn clone(&self) -> Self {
        Field::new(self.to_vec())
    }
}

impl<T: Clone + Default> Default for Field<T> {
    fn default() -> Self {
        Field::scalar(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&*self.0.borrow()).finish()
    }
}

/// Shared field storage tagged with its element kind.
#[derive(Debug)]
pub enum Binding {
    Float(Field<f32>),
    Integer(Field<i32>),
    Matrix(Field<Mat4>),
    Pointer(Field<Pointer>),
    String(Field<String>),
    Vector(Field<Vec4>),
}

impl Binding {
    pub fn kind(&self) -> DatumKind {
        match self {
            Binding::Float(_) => DatumKind::Float,
            Binding::Integer(_) => DatumKind::Integer,
            Binding::Matrix(_) => DatumKind::Matrix,
            Binding::Pointer(_) => DatumKind::Pointer,
            Binding::String(_) => DatumKind::String,
            Binding::Vector(_) => DatumKind::Vector,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Binding::Float(field) => field.len(),
            Binding::Integer(field) => field.len(),
            Binding::Matrix(field) => field.len(),
            Binding::Pointer(field) => field.len(),
            Binding::String(field) => field.len(),
            Binding::Vector(field) => field.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn into_values(self) -> Values {
        match self {
            Binding::Float(field) => Values::Float(Buffer::Bound(field)),
            Binding::Integer(field) => Values::Integer(Buffer::Bound(field)),
            Binding::Matrix(field) => Values::Matrix(Buffer::Bound(field)),
            Binding::Pointer(field) => Values::Pointer(Buffer::Bound(field)),
            Binding::String(field) => Values::String(Buffer::Bound(field)),
            Binding::Vector(field) => Values::Vector(Buffer::Bound(field)),
        }
    }
}

/// Element storage for one kind: owned, or a view over host fields.
pub enum Buffer<T> {
    Owned(Vec<T>),
    Bound(Field<T>),
}

impl<T> Buffer<T> {
    pub fn len(&self) -> usize {
        match self {
            Buffer::Owned(values) => values.len(),
            Buffer::Bound(field) => field.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        match self {
            Buffer::Owned(values) => values.capacity(),
            Buffer::Bound(field) => field.len(),
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Buffer::Owned(_))
    }

    pub fn with_slice<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        match self {
            Buffer::Owned(values) => f(values),
            Buffer::Bound(field) => f(&field.borrow()),
        }
    }

    pub(crate) fn owned_mut(&mut self) -> Option<&mut Vec<T>> {
        match self {
            Buffer::Owned(values) => Some(values),
            Buffer::Bound(_) => None,
        }
    }

    pub(crate) fn set(&mut self, index: usize, value: T) -> bool {
        match self {
            Buffer::Owned(values) => match values.get_mut(index) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => false,
            },
            Buffer::Bound(field) => field.set(index, value),
        }
    }
}

impl<T: Clone> Buffer<T> {
    pub fn get(&self, index: usize) -> Option<T> {
        match self {
            Buffer::Owned(values) => values.get(index).cloned(),
            Buffer::Bound(field) => field.get(index),
        }
    }
}

impl<T: Clone> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        match self {
            Buffer::Owned(values) => Buffer::Owned(values.clone()),
            Buffer::Bound(field) => Buffer::Bound(field.share()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Buffer::Owned(values) => f.debug_tuple("Owned").field(values).finish(),
            Buffer::Bound(field) => f.debug_tuple("Bound").field(field).finish(),
        }
    }
}

/// Typed payload of a datum. `Unset` until the kind is fixed.
#[derive(Debug, Clone, Default)]
pub enum Values {
    #[default]
    Unset,
    Float(Buffer<f32>),
    Integer(Buffer<i32>),
    Matrix(Buffer<Mat4>),
    Pointer(Buffer<Pointer>),
    String(Buffer<String>),
    Vector(Buffer<Vec4>),
    Table(Vec<ScopeId>),
}

impl Values {
    pub fn empty(kind: DatumKind) -> Self {
        match kind {
            DatumKind::Float => Values::Float(Buffer::Owned(Vec::new())),
            DatumKind::Integer => Values::Integer(Buffer::Owned(Vec::new())),
            DatumKind::Matrix => Values::Matrix(Buffer::Owned(Vec::new())),
            DatumKind::Pointer => Values::Pointer(Buffer::Owned(Vec::new())),
            DatumKind::String => Values::String(Buffer::Owned(Vec::new())),
            DatumKind::Vector => Values::Vector(Buffer::Owned(Vec::new())),
            DatumKind::Table => Values::Table(Vec::new()),
        }
    }

    pub fn kind(&self) -> Option<DatumKind> {
        match self {
            Values::Unset => None,
            Values::Float(_) => Some(DatumKind::Float),
            Values::Integer(_) => Some(DatumKind::Integer),
            Values::Matrix(_) => Some(DatumKind::Matrix),
            Values::Pointer(_) => Some(DatumKind::Pointer),
            Values::String(_) => Some(DatumKind::String),
            Values::Vector(_) => Some(DatumKind::Vector),
            Values::Table(_) => Some(DatumKind::Table),
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for i32 {}
    impl Sealed for crate::num::Mat4 {}
    impl Sealed for crate::datum::Pointer {}
    impl Sealed for String {}
    impl Sealed for crate::num::Vec4 {}
}

/// Element types a datum can hold outside of tables.
pub trait Element: Clone + PartialEq + fmt::Debug + sealed::Sealed + 'static {
    const KIND: DatumKind;

    fn buffer(values: &Values) -> Option<&Buffer<Self>>;

    fn buffer_mut(values: &mut Values) -> Option<&mut Buffer<Self>>;

    fn wrap(buffer: Buffer<Self>) -> Values;

    fn binding(field: Field<Self>) -> Binding;

    /// Value used when a resize grows the datum.
    fn fill() -> Self;
}

macro_rules! element {
    ($ty:ty, $variant:ident, $fill:expr) => {
        impl Element for $ty {
            const KIND: DatumKind = DatumKind::$variant;

            fn buffer(values: &Values) -> Option<&Buffer<Self>> {
                match values {
                    Values::$variant(buffer) => Some(buffer),
                    _ => None,
                }
            }

            fn buffer_mut(values: &mut Values) -> Option<&mut Buffer<Self>> {
                match values {
                    Values::$variant(buffer) => Some(buffer),
                    _ => None,
                }
            }

            fn wrap(buffer: Buffer<Self>) -> Values {
                Values::$variant(buffer)
            }

            fn binding(field: Field<Self>) -> Binding {
                Binding::$variant(field)
            }

            fn fill() -> Self {
                $fill
            }
        }
    };
}

element!(f32, Float, 0.0);
element!(i32, Integer, 0);
element!(Mat4, Matrix, Mat4::IDENTITY);
element!(Pointer, Pointer, Pointer::Null);
element!(String, String, String::new());
element!(Vec4, Vector, Vec4::ZERO);
