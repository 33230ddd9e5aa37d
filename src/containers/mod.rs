pub mod chained_map;
pub mod slist;
pub mod stack;

pub use chained_map::ChainedMap;
pub use slist::SList;
pub use stack::Stack;
