mod manager;
mod signature;

pub use manager::TypeManager;
pub use signature::{FieldAccessor, Signature};
