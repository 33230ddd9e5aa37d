mod json;
mod pointer;
mod storage;

use std::fmt;

use crate::arena::ScopeId;
use crate::num::number::{format_float, format_integer, parse_float, parse_integer};
use crate::num::{Mat4, Vec4};
use crate::text::{format_mat4, format_vec4, parse_mat4, parse_vec4};
use crate::{Error, Result};

pub use pointer::{Pointer, Rtti};
pub use storage::{Binding, Buffer, Element, Field, Values};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatumKind {
    Float,
    Integer,
    Matrix,
    Pointer,
    String,
    Vector,
    Table,
}

impl DatumKind {
    pub const ALL: [DatumKind; 7] = [
        DatumKind::Float,
        DatumKind::Integer,
        DatumKind::Matrix,
        DatumKind::Pointer,
        DatumKind::String,
        DatumKind::Vector,
        DatumKind::Table,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DatumKind::Float => "float",
            DatumKind::Integer => "integer",
            DatumKind::Matrix => "matrix",
            DatumKind::Pointer => "pointer",
            DatumKind::String => "string",
            DatumKind::Vector => "vector",
            DatumKind::Table => "table",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        DatumKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for DatumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn kind_name(kind: Option<DatumKind>) -> &'static str {
    kind.map_or("unset", DatumKind::name)
}

fn kind_mismatch(requested: DatumKind, found: Option<DatumKind>) -> Error {
    Error::type_conflict(format!(
        "datum holds {} values, {requested} requested",
        kind_name(found)
    ))
}

fn view_error(op: &str) -> Error {
    Error::ownership(format!("{op} on a datum viewing external storage"))
}

fn table_error(op: &str) -> Error {
    Error::schema(format!("{op} on a table datum must go through the arena"))
}

/// Runs `$body` with `$buffer` bound to whichever non-table buffer is active.
macro_rules! with_buffer {
    ($values:expr, $buffer:ident => $body:expr, $ids:ident => $table:expr, unset => $unset:expr) => {
        match $values {
            Values::Unset => $unset,
            Values::Float($buffer) => $body,
            Values::Integer($buffer) => $body,
            Values::Matrix($buffer) => $body,
            Values::Pointer($buffer) => $body,
            Values::String($buffer) => $body,
            Values::Vector($buffer) => $body,
            Values::Table($ids) => $table,
        }
    };
}

fn resize_owned<T: Element>(buffer: &mut Buffer<T>, len: usize) -> Result<()> {
    let values = buffer.owned_mut().ok_or_else(|| view_error("resize"))?;
    if len < values.len() {
        values.truncate(len);
    } else {
        values.resize_with(len, T::fill);
    }
    Ok(())
}

fn reserve_vec<T>(values: &mut Vec<T>, capacity: usize) {
    if capacity > values.capacity() {
        values.reserve_exact(capacity - values.len());
    }
}

fn buffers_eq<T: PartialEq>(a: &Buffer<T>, b: &Buffer<T>) -> bool {
    a.with_slice(|left| b.with_slice(|right| left == right))
}

/// A kinded, resizable array of values.
///
/// A datum starts unset and takes its kind from the first typed write,
/// [`Datum::set_kind`], or [`Datum::bind`]. Once bound to host storage it
/// becomes a fixed-length view: elements can be read and written, but
/// nothing may change its length.
///
/// Cloning copies owned storage and aliases bound storage. A cloned table
/// datum is empty: child scopes are copied with
/// [`Arena::clone_scope`](crate::Arena::clone_scope).
#[derive(Debug, Default)]
pub struct Datum {
    values: Values,
}

impl Clone for Datum {
    fn clone(&self) -> Self {
        match &self.values {
            Values::Table(_) => Datum::with_kind(DatumKind::Table),
            values => Datum {
                values: values.clone(),
            },
        }
    }
}

impl Datum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(kind: DatumKind) -> Self {
        Datum {
            values: Values::empty(kind),
        }
    }

    pub fn from_vec<T: Element>(values: Vec<T>) -> Self {
        Datum {
            values: T::wrap(Buffer::Owned(values)),
        }
    }

    pub fn bound(binding: Binding) -> Result<Self> {
        let mut datum = Datum::new();
        datum.bind(binding)?;
        Ok(datum)
    }

    pub fn kind(&self) -> Option<DatumKind> {
        self.values.kind()
    }

    pub fn is_kind(&self, kind: DatumKind) -> bool {
        self.kind() == Some(kind)
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn len(&self) -> usize {
        with_buffer!(&self.values, buffer => buffer.len(), ids => ids.len(), unset => 0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        with_buffer!(&self.values, buffer => buffer.capacity(), ids => ids.capacity(), unset => 0)
    }

    pub fn owns_storage(&self) -> bool {
        with_buffer!(&self.values, buffer => buffer.is_owned(), _ids => true, unset => true)
    }

    pub fn set_kind(&mut self, kind: DatumKind) -> Result<()> {
        match self.kind() {
            None => {
                self.values = Values::empty(kind);
                Ok(())
            }
            Some(current) if current == kind => Ok(()),
            Some(current) => Err(Error::type_conflict(format!(
                "datum kind is already {current}, cannot change it to {kind}"
            ))),
        }
    }

    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        with_buffer!(
            &mut self.values,
            buffer => {
                let values = buffer.owned_mut().ok_or_else(|| view_error("reserve"))?;
                reserve_vec(values, capacity);
                Ok(())
            },
            ids => {
                reserve_vec(ids, capacity);
                Ok(())
            },
            unset => Err(Error::type_conflict("reserve on a datum with no kind"))
        )
    }

    /// Grows with per-kind fill values or truncates. Truncation keeps the
    /// current capacity.
    pub fn resize(&mut self, len: usize) -> Result<()> {
        with_buffer!(
            &mut self.values,
            buffer => resize_owned(buffer, len),
            _ids => Err(table_error("resize")),
            unset => Err(Error::type_conflict("resize on a datum with no kind"))
        )
    }

    /// Turns the datum into a view over host storage.
    pub fn bind(&mut self, binding: Binding) -> Result<()> {
        if binding.is_empty() {
            return Err(Error::invalid_argument(
                "cannot bind a datum to empty storage",
            ));
        }
        if let Some(kind) = self.kind() {
            if kind != binding.kind() {
                return Err(Error::type_conflict(format!(
                    "cannot bind a {kind} datum to {} storage",
                    binding.kind()
                )));
            }
        }
        self.values = binding.into_values();
        Ok(())
    }

    pub fn set_storage<T: Element>(&mut self, field: &Field<T>) -> Result<()> {
        self.bind(field.binding())
    }

    fn buffer<T: Element>(&self) -> Result<&Buffer<T>> {
        T::buffer(&self.values).ok_or_else(|| kind_mismatch(T::KIND, self.kind()))
    }

    fn owned_mut<T: Element>(&mut self, op: &str) -> Result<&mut Vec<T>> {
        if matches!(self.values, Values::Unset) {
            self.values = Values::empty(T::KIND);
        }
        let found = self.kind();
        match T::buffer_mut(&mut self.values) {
            Some(buffer) => buffer.owned_mut().ok_or_else(|| view_error(op)),
            None => Err(kind_mismatch(T::KIND, found)),
        }
    }

    pub fn get<T: Element>(&self, index: usize) -> Result<T> {
        let buffer = self.buffer::<T>()?;
        buffer
            .get(index)
            .ok_or_else(|| Error::bounds(index, buffer.len()))
    }

    pub fn front<T: Element>(&self) -> Result<T> {
        self.get(0)
    }

    pub fn back<T: Element>(&self) -> Result<T> {
        let buffer = self.buffer::<T>()?;
        match buffer.len() {
            0 => Err(Error::bounds(0, 0)),
            len => self.get(len - 1),
        }
    }

    /// Writes element `index`; allowed on views.
    pub fn set<T: Element>(&mut self, value: T, index: usize) -> Result<()> {
        if matches!(self.values, Values::Unset) {
            return Err(Error::bounds(index, 0));
        }
        let found = self.kind();
        let buffer = T::buffer_mut(&mut self.values).ok_or_else(|| kind_mismatch(T::KIND, found))?;
        let len = buffer.len();
        if buffer.set(index, value) {
            Ok(())
        } else {
            Err(Error::bounds(index, len))
        }
    }

    pub fn push_back<T: Element>(&mut self, value: T) -> Result<()> {
        self.owned_mut::<T>("push_back")?.push(value);
        Ok(())
    }

    /// Makes the datum hold `value` as its only element. A view keeps its
    /// length and has element 0 overwritten.
    pub fn assign<T: Element>(&mut self, value: T) -> Result<()> {
        if !self.owns_storage() {
            return self.set(value, 0);
        }
        let values = self.owned_mut::<T>("assign")?;
        values.clear();
        values.push(value);
        Ok(())
    }

    /// Returns false when the datum was already empty.
    pub fn pop_back(&mut self) -> Result<bool> {
        with_buffer!(
            &mut self.values,
            buffer => {
                let values = buffer.owned_mut().ok_or_else(|| view_error("pop_back"))?;
                Ok(values.pop().is_some())
            },
            _ids => Err(table_error("pop_back")),
            unset => Ok(false)
        )
    }

    pub fn remove_at(&mut self, index: usize) -> Result<()> {
        with_buffer!(
            &mut self.values,
            buffer => {
                let values = buffer.owned_mut().ok_or_else(|| view_error("remove_at"))?;
                if index >= values.len() {
                    return Err(Error::bounds(index, values.len()));
                }
                values.remove(index);
                Ok(())
            },
            _ids => Err(table_error("remove_at")),
            unset => Err(Error::bounds(index, 0))
        )
    }

    /// Removes the first element equal to `value`.
    pub fn remove<T: Element>(&mut self, value: &T) -> Result<bool> {
        if !self.owns_storage() {
            return Err(view_error("remove"));
        }
        match self.index_of(value)? {
            Some(index) => {
                self.remove_at(index)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn index_of<T: Element>(&self, value: &T) -> Result<Option<usize>> {
        if matches!(self.values, Values::Unset) {
            return Ok(None);
        }
        let buffer = self.buffer::<T>()?;
        Ok(buffer.with_slice(|items| items.iter().position(|item| item == value)))
    }

    pub fn clear(&mut self) -> Result<()> {
        with_buffer!(
            &mut self.values,
            buffer => {
                buffer.owned_mut().ok_or_else(|| view_error("clear"))?.clear();
                Ok(())
            },
            _ids => Err(table_error("clear")),
            unset => Ok(())
        )
    }

    pub fn shrink_to_fit(&mut self) -> Result<()> {
        with_buffer!(
            &mut self.values,
            buffer => {
                buffer.owned_mut().ok_or_else(|| view_error("shrink_to_fit"))?.shrink_to_fit();
                Ok(())
            },
            ids => {
                ids.shrink_to_fit();
                Ok(())
            },
            unset => Ok(())
        )
    }

    /// Moves the contents out, leaving this datum unset.
    pub fn take(&mut self) -> Datum {
        std::mem::take(self)
    }

    /// Copy that keeps table handles, for the arena's own deep copies.
    pub(crate) fn duplicate(&self) -> Datum {
        Datum {
            values: self.values.clone(),
        }
    }

    pub fn scopes(&self) -> &[ScopeId] {
        match &self.values {
            Values::Table(ids) => ids,
            _ => &[],
        }
    }

    pub fn scope_at(&self, index: usize) -> Result<ScopeId> {
        match &self.values {
            Values::Table(ids) => ids
                .get(index)
                .copied()
                .ok_or_else(|| Error::bounds(index, ids.len())),
            _ => Err(kind_mismatch(DatumKind::Table, self.kind())),
        }
    }

    pub fn position_of_scope(&self, id: ScopeId) -> Option<usize> {
        self.scopes().iter().position(|child| *child == id)
    }

    /// Table storage, fixing an unset datum to table kind.
    pub(crate) fn table_mut(&mut self) -> Result<&mut Vec<ScopeId>> {
        if matches!(self.values, Values::Unset) {
            self.values = Values::Table(Vec::new());
        }
        match &mut self.values {
            Values::Table(ids) => Ok(ids),
            other => Err(Error::schema(format!(
                "name holds a {} datum, not a table",
                kind_name(other.kind())
            ))),
        }
    }

    /// Parses `text` into element `index`.
    pub fn set_from_string(&mut self, text: &str, index: usize) -> Result<()> {
        match self.kind() {
            Some(DatumKind::Integer) => self.set(parse_integer(text)?, index),
            Some(DatumKind::Float) => self.set(parse_float(text)?, index),
            Some(DatumKind::Vector) => self.set(parse_vec4(text)?, index),
            Some(DatumKind::Matrix) => self.set(parse_mat4(text)?, index),
            Some(DatumKind::String) => self.set(text.to_string(), index),
            other => Err(Error::type_conflict(format!(
                "cannot parse text into a {} datum",
                kind_name(other)
            ))),
        }
    }

    pub fn push_back_from_string(&mut self, text: &str) -> Result<()> {
        match self.kind() {
            Some(DatumKind::Integer) => self.push_back(parse_integer(text)?),
            Some(DatumKind::Float) => self.push_back(parse_float(text)?),
            Some(DatumKind::Vector) => self.push_back(parse_vec4(text)?),
            Some(DatumKind::Matrix) => self.push_back(parse_mat4(text)?),
            Some(DatumKind::String) => self.push_back(text.to_string()),
            other => Err(Error::type_conflict(format!(
                "cannot parse text into a {} datum",
                kind_name(other)
            ))),
        }
    }

    pub fn element_to_string(&self, index: usize) -> Result<String> {
        let missing = || Error::bounds(index, self.len());
        let text = match &self.values {
            Values::Unset => return Err(missing()),
            Values::Integer(buffer) => buffer.get(index).map(format_integer),
            Values::Float(buffer) => buffer.get(index).map(format_float),
            Values::Vector(buffer) => buffer.get(index).map(|v| format_vec4(&v)),
            Values::Matrix(buffer) => buffer.get(index).map(|m| format_mat4(&m)),
            Values::String(buffer) => buffer.get(index),
            Values::Pointer(buffer) => buffer.get(index).map(|p| p.to_string()),
            Values::Table(ids) => ids.get(index).map(|id| id.to_string()),
        };
        text.ok_or_else(missing)
    }

    fn first_is<T: Element>(&self, value: &T) -> bool {
        T::buffer(&self.values)
            .and_then(|buffer| buffer.get(0))
            .is_some_and(|first| first == *value)
    }
}

impl PartialEq for Datum {
    fn eq(&self, other: &Self) -> bool {
        match (&self.values, &other.values) {
            (Values::Unset, Values::Unset) => true,
            (Values::Float(a), Values::Float(b)) => buffers_eq(a, b),
            (Values::Integer(a), Values::Integer(b)) => buffers_eq(a, b),
            (Values::Matrix(a), Values::Matrix(b)) => buffers_eq(a, b),
            (Values::Pointer(a), Values::Pointer(b)) => buffers_eq(a, b),
            (Values::String(a), Values::String(b)) => buffers_eq(a, b),
            (Values::Vector(a), Values::Vector(b)) => buffers_eq(a, b),
            (Values::Table(a), Values::Table(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! scalar_impls {
    ($($ty:ty),*) => {
        $(
            impl PartialEq<$ty> for Datum {
                fn eq(&self, other: &$ty) -> bool {
                    self.first_is(other)
                }
            }

            impl From<$ty> for Datum {
                fn from(value: $ty) -> Self {
                    Datum::from_vec(vec![value])
                }
            }
        )*
    };
}

scalar_impls!(f32, i32, Mat4, Vec4, Pointer, String);

impl PartialEq<str> for Datum {
    fn eq(&self, other: &str) -> bool {
        String::buffer(&self.values)
            .and_then(|buffer| buffer.get(0))
            .is_some_and(|first| first == other)
    }
}

impl PartialEq<&str> for Datum {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::from(value.to_string())
    }
}

impl<T: Element> From<Vec<T>> for Datum {
    fn from(values: Vec<T>) -> Self {
        Datum::from_vec(values)
    }
}

/// A single element prints bare; anything else prints as a bracketed list.
impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.len();
        let items = (0..len).filter_map(|index| self.element_to_string(index).ok());
        if len == 1 {
            for item in items {
                f.write_str(&item)?;
            }
            return Ok(());
        }
        f.write_str("[")?;
        for (i, item) in items.enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&item)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[rstest::rstest]
    #[case("float", Some(DatumKind::Float))]
    #[case("integer", Some(DatumKind::Integer))]
    #[case("matrix", Some(DatumKind::Matrix))]
    #[case("string", Some(DatumKind::String))]
    #[case("table", Some(DatumKind::Table))]
    #[case("vector", Some(DatumKind::Vector))]
    #[case("Integer", None)]
    #[case("int", None)]
    fn kind_names(#[case] name: &str, #[case] expected: Option<DatumKind>) {
        assert_eq!(DatumKind::from_name(name), expected);
    }

    #[rstest::rstest]
    fn kind_is_fixed_by_first_write() {
        let mut datum = Datum::new();
        assert_eq!(datum.kind(), None);
        datum.push_back(1).unwrap();
        assert!(datum.is_kind(DatumKind::Integer));
        let err = datum.push_back(1.5f32).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeConflict);
        assert!(datum.set_kind(DatumKind::Integer).is_ok());
        assert_eq!(
            datum.set_kind(DatumKind::String).unwrap_err().kind,
            ErrorKind::TypeConflict
        );
    }

    #[rstest::rstest]
    fn reserve_and_resize_need_a_kind() {
        let mut datum = Datum::new();
        assert_eq!(datum.reserve(4).unwrap_err().kind, ErrorKind::TypeConflict);
        assert_eq!(datum.resize(4).unwrap_err().kind, ErrorKind::TypeConflict);
    }

    #[rstest::rstest]
    fn resize_fills_and_truncates() {
        let mut datum = Datum::with_kind(DatumKind::Matrix);
        datum.resize(3).unwrap();
        assert_eq!(datum.len(), 3);
        assert_eq!(datum.get::<Mat4>(2).unwrap(), Mat4::IDENTITY);

        let mut strings = Datum::from(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        strings.reserve(10).unwrap();
        let capacity = strings.capacity();
        strings.resize(1).unwrap();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings.capacity(), capacity);
        assert_eq!(strings, "a");
    }

    #[rstest::rstest]
    fn bounds_are_checked() {
        let mut datum = Datum::from(vec![1, 2]);
        assert_eq!(datum.get::<i32>(2).unwrap_err().kind, ErrorKind::Bounds);
        assert_eq!(datum.set(5, 2).unwrap_err().kind, ErrorKind::Bounds);
        assert_eq!(datum.remove_at(9).unwrap_err().kind, ErrorKind::Bounds);
        assert_eq!(Datum::new().set(1, 0).unwrap_err().kind, ErrorKind::Bounds);
        assert_eq!(
            Datum::with_kind(DatumKind::Integer).back::<i32>().unwrap_err().kind,
            ErrorKind::Bounds
        );
    }

    #[rstest::rstest]
    fn views_allow_reads_and_writes_only() {
        let field = Field::new(vec![10, 20]);
        let mut datum = Datum::new();
        datum.set_storage(&field).unwrap();
        assert!(!datum.owns_storage());
        assert_eq!(datum.capacity(), 2);
        assert_eq!(datum.back::<i32>().unwrap(), 20);

        datum.set(11, 0).unwrap();
        assert_eq!(field.get(0), Some(11));
        field.set(1, 21);
        assert_eq!(datum.get::<i32>(1).unwrap(), 21);

        for err in [
            datum.push_back(3).unwrap_err(),
            datum.pop_back().unwrap_err(),
            datum.remove_at(0).unwrap_err(),
            datum.reserve(8).unwrap_err(),
            datum.resize(1).unwrap_err(),
            datum.clear().unwrap_err(),
            datum.remove(&11).unwrap_err(),
        ] {
            assert_eq!(err.kind, ErrorKind::Ownership);
        }
        assert_eq!(datum.len(), 2);
    }

    #[rstest::rstest]
    fn binding_checks_kind_and_count() {
        let mut datum = Datum::with_kind(DatumKind::Float);
        let err = datum.set_storage(&Field::scalar(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeConflict);
        let err = datum.set_storage(&Field::<f32>::new(Vec::new())).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        datum.set_storage(&Field::new(vec![1.0f32, 2.0])).unwrap();
        assert_eq!(datum.len(), 2);
    }

    #[rstest::rstest]
    fn cloned_tables_drop_their_handles() {
        let mut arena = crate::Arena::new();
        let child = arena.create_scope();
        let mut table = Datum::new();
        table.table_mut().unwrap().push(child);

        let copy = table.clone();
        assert!(copy.is_kind(DatumKind::Table));
        assert!(copy.is_empty());
        assert_eq!(table.duplicate().scopes(), &[child]);
    }

    #[rstest::rstest]
    fn clone_copies_owned_and_aliases_views() {
        let owned = Datum::from(vec![Vec4::splat(1.0)]);
        let mut copy = owned.clone();
        copy.set(Vec4::ZERO, 0).unwrap();
        assert_ne!(owned, copy);

        let field = Field::scalar(String::from("x"));
        let view = Datum::bound(field.binding()).unwrap();
        let mut alias = view.clone();
        alias.set(String::from("y"), 0).unwrap();
        assert_eq!(view, "y");
        assert_eq!(field.get(0).as_deref(), Some("y"));
    }

    #[rstest::rstest]
    fn take_leaves_source_unset() {
        let mut datum = Datum::from(3.5f32);
        let moved = datum.take();
        assert_eq!(moved, 3.5f32);
        assert_eq!(datum.kind(), None);
        assert!(datum.is_empty());
    }

    #[rstest::rstest]
    fn remove_and_index_of() {
        let mut datum = Datum::from(vec![1, 2, 3, 2]);
        assert_eq!(datum.index_of(&2).unwrap(), Some(1));
        assert!(datum.remove(&2).unwrap());
        assert!(!datum.remove(&7).unwrap());
        assert_eq!(datum, Datum::from(vec![1, 3, 2]));
        assert_eq!(datum.index_of(&1.0f32).unwrap_err().kind, ErrorKind::TypeConflict);
        assert!(datum.pop_back().unwrap());
        assert_eq!(datum.back::<i32>().unwrap(), 3);
    }

    #[rstest::rstest]
    fn assign_replaces_contents() {
        let mut datum = Datum::from(vec![1, 2, 3]);
        datum.assign(9).unwrap();
        assert_eq!(datum.len(), 1);
        assert_eq!(datum, 9);

        let field = Field::new(vec![0, 0]);
        let mut view = Datum::bound(field.binding()).unwrap();
        view.assign(4).unwrap();
        assert_eq!(field.to_vec(), vec![4, 0]);
    }

    #[rstest::rstest]
    fn text_conversions() {
        let mut datum = Datum::with_kind(DatumKind::Vector);
        datum.push_back_from_string("vec4(1, 2, 3, 4)").unwrap();
        assert_eq!(datum, Vec4::new(1.0, 2.0, 3.0, 4.0));
        datum.set_from_string("0 0 0 1", 0).unwrap();
        assert_eq!(datum.element_to_string(0).unwrap(), "vec4(0, 0, 0, 1)");

        let mut ints = Datum::with_kind(DatumKind::Integer);
        ints.push_back_from_string("42").unwrap();
        assert_eq!(ints.to_string(), "42");

        let mut table = Datum::with_kind(DatumKind::Table);
        assert_eq!(
            table.push_back_from_string("x").unwrap_err().kind,
            ErrorKind::TypeConflict
        );
    }

    #[rstest::rstest]
    fn table_datums_reject_element_mutators() {
        let mut table = Datum::with_kind(DatumKind::Table);
        assert_eq!(table.resize(2).unwrap_err().kind, ErrorKind::Schema);
        assert_eq!(table.clear().unwrap_err().kind, ErrorKind::Schema);
        assert_eq!(
            Datum::from(1).table_mut().unwrap_err().kind,
            ErrorKind::Schema
        );
        assert!(Datum::new().table_mut().is_ok());
    }

    #[rstest::rstest]
    fn display_lists() {
        assert_eq!(Datum::from(vec![1.5f32, 2.0]).to_string(), "[1.5, 2]");
        assert_eq!(Datum::with_kind(DatumKind::String).to_string(), "[]");
        assert_eq!(Datum::from("Bob").to_string(), "Bob");
    }
}
