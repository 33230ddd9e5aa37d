use crate::num::number::{format_float, scan_numbers};
use crate::num::{Mat4, Vec4};
use crate::{Error, Result};

fn push_components(out: &mut String, vector: &Vec4) {
    out.push('(');
    for (i, component) in vector.as_array().iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format_float(*component));
    }
    out.push(')');
}

/// `vec4(x, y, z, w)`
pub fn format_vec4(vector: &Vec4) -> String {
    let mut out = String::from("vec4");
    push_components(&mut out, vector);
    out
}

/// `mat4x4((c0), (c1), (c2), (c3))`, one group per column.
pub fn format_mat4(matrix: &Mat4) -> String {
    let mut out = String::from("mat4x4(");
    for (i, column) in matrix.columns().iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        push_components(&mut out, column);
    }
    out.push(')');
    out
}

pub fn parse_vec4(text: &str) -> Result<Vec4> {
    let numbers = scan_numbers(text)?;
    match numbers.as_slice() {
        [x, y, z, w] => Ok(Vec4::new(*x, *y, *z, *w)),
        other => Err(Error::invalid_argument(format!(
            "expected 4 components in {text:?}, found {}",
            other.len()
        ))),
    }
}

pub fn parse_mat4(text: &str) -> Result<Mat4> {
    let numbers = scan_numbers(text)?;
    Mat4::from_cols_slice(&numbers).ok_or_else(|| {
        Error::invalid_argument(format!(
            "expected 16 components in {text:?}, found {}",
            numbers.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn vec4_text_form() {
        let vector = Vec4::new(1.0, 0.0, 0.5, -1.0);
        assert_eq!(format_vec4(&vector), "vec4(1, 0, 0.5, -1)");
        assert_eq!(parse_vec4(&format_vec4(&vector)).unwrap(), vector);
    }

    #[rstest::rstest]
    fn mat4_text_form() {
        let text = format_mat4(&Mat4::IDENTITY);
        assert_eq!(
            text,
            "mat4x4((1, 0, 0, 0), (0, 1, 0, 0), (0, 0, 1, 0), (0, 0, 0, 1))"
        );
        assert_eq!(parse_mat4(&text).unwrap(), Mat4::IDENTITY);
    }

    #[rstest::rstest]
    #[case("vec4(1, 2, 3)")]
    #[case("vec4(1, 2, 3, 4, 5)")]
    #[case("vec4(a, b, c, d)")]
    fn vec4_needs_four_numbers(#[case] text: &str) {
        assert!(parse_vec4(text).is_err());
    }

    #[rstest::rstest]
    fn mat4_accepts_bare_lists() {
        let text = "1 0 0 0  0 2 0 0  0 0 3 0  0 0 0 4";
        let matrix = parse_mat4(text).unwrap();
        assert_eq!(matrix[1][1], 2.0);
        assert_eq!(matrix[3][3], 4.0);
        assert!(parse_mat4("mat4x4((1, 2))").is_err());
    }
}
