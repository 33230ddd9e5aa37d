pub mod linear;
pub mod number;

pub use linear::{Mat4, Vec4};
