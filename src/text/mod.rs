pub mod literal;

pub use literal::{format_mat4, format_vec4, parse_mat4, parse_vec4};
