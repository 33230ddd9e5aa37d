pub mod arena;
pub mod attributed;
pub mod constants;
pub mod containers;
pub mod datum;
pub mod error;
pub mod factory;
pub mod num;
pub mod options;
pub mod parse;
pub mod scope;
pub mod text;
pub mod types;

use std::io::Read;
use std::rc::Rc;

use serde_json::Value;

pub use crate::arena::{Arena, ScopeId};
pub use crate::attributed::{Attributed, Class, ScopeClass};
pub use crate::datum::{Binding, Datum, DatumKind, Field, Pointer, Rtti};
pub use crate::error::{Error, ErrorKind};
pub use crate::factory::Factory;
pub use crate::num::{Mat4, Vec4};
pub use crate::options::ParseOptions;
pub use crate::parse::{
    Member, ParseCoordinator, ParseHelper, SharedData, SharedTableData, TableParseHelper,
};
pub use crate::scope::Scope;
pub use crate::types::{Signature, TypeManager};

pub type Result<T> = std::result::Result<T, Error>;

/// Coordinator with one [`TableParseHelper`] writing into a fresh arena.
pub fn table_coordinator(
    factory: Rc<Factory>,
    types: Rc<TypeManager>,
    options: &ParseOptions,
) -> Result<ParseCoordinator> {
    let shared = SharedTableData::new(factory, types);
    let mut coordinator = ParseCoordinator::with_options(shared, options.clone());
    coordinator.add_helper(TableParseHelper::with_options(options))?;
    Ok(coordinator)
}

fn into_graph(mut coordinator: ParseCoordinator) -> Result<(Arena, ScopeId)> {
    coordinator
        .shared_as_mut::<SharedTableData>()
        .map(SharedTableData::take_arena)
        .ok_or_else(|| Error::invalid_argument("coordinator does not hold table data"))
}

/// Parses a table-grammar document into a new graph, returning the arena and
/// the root scope.
pub fn from_str(
    input: &str,
    factory: Rc<Factory>,
    types: Rc<TypeManager>,
) -> Result<(Arena, ScopeId)> {
    from_str_with_options(input, factory, types, &ParseOptions::default())
}

pub fn from_str_with_options(
    input: &str,
    factory: Rc<Factory>,
    types: Rc<TypeManager>,
    options: &ParseOptions,
) -> Result<(Arena, ScopeId)> {
    let mut coordinator = table_coordinator(factory, types, options)?;
    coordinator.parse_str(input)?;
    into_graph(coordinator)
}

pub fn from_reader<R: Read>(
    reader: R,
    factory: Rc<Factory>,
    types: Rc<TypeManager>,
) -> Result<(Arena, ScopeId)> {
    from_reader_with_options(reader, factory, types, &ParseOptions::default())
}

pub fn from_reader_with_options<R: Read>(
    reader: R,
    factory: Rc<Factory>,
    types: Rc<TypeManager>,
    options: &ParseOptions,
) -> Result<(Arena, ScopeId)> {
    let mut coordinator = table_coordinator(factory, types, options)?;
    coordinator.parse_reader(reader)?;
    into_graph(coordinator)
}

pub fn from_value(
    value: &Value,
    factory: Rc<Factory>,
    types: Rc<TypeManager>,
    options: &ParseOptions,
) -> Result<(Arena, ScopeId)> {
    let mut coordinator = table_coordinator(factory, types, options)?;
    coordinator.parse_value(value)?;
    into_graph(coordinator)
}
