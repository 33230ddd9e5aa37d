//! Walks a parsed JSON document and hands its members to grammar helpers.

mod coordinator;
mod shared;
pub mod table;

use std::any::Any;

use serde_json::Value;

use crate::Result;

pub use coordinator::ParseCoordinator;
pub use shared::{DepthOnly, SharedData};
pub use table::{Frame, Origin, SharedTableData, TableParseHelper};

/// One member handed to a helper: its key, its value, and for array
/// elements the position inside the array.
#[derive(Debug, Clone, Copy)]
pub struct Member<'a> {
    pub key: &'a str,
    pub value: &'a Value,
    pub in_array: bool,
    pub index: usize,
}

impl<'a> Member<'a> {
    pub fn new(key: &'a str, value: &'a Value) -> Self {
        Self {
            key,
            value,
            in_array: false,
            index: 0,
        }
    }

    pub fn element(key: &'a str, value: &'a Value, index: usize) -> Self {
        Self {
            key,
            value,
            in_array: true,
            index,
        }
    }

    pub fn is_object(&self) -> bool {
        self.value.is_object()
    }
}

/// A grammar handler.
///
/// `start_handler` returns `Ok(false)` to decline a member, letting the next
/// helper try it. The helper that accepts an object member sees all of its
/// children before its `end_handler` runs.
pub trait ParseHelper: Any {
    fn initialize(&mut self) {}

    fn clean_up(&mut self) {}

    fn start_handler(&mut self, shared: &mut dyn SharedData, member: Member<'_>) -> Result<bool>;

    fn end_handler(&mut self, shared: &mut dyn SharedData, member: Member<'_>) -> Result<()>;

    /// A fresh helper of the same type and configuration.
    fn create(&self) -> Box<dyn ParseHelper>;

    fn as_any(&self) -> &dyn Any;
}

impl dyn ParseHelper {
    pub fn is<T: ParseHelper>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: ParseHelper>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}
