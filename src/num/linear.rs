use std::ops::{Index, IndexMut};

/// Four-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec4(pub [f32; 4]);

impl Vec4 {
    pub const ZERO: Vec4 = Vec4([0.0; 4]);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Vec4([x, y, z, w])
    }

    pub fn splat(value: f32) -> Self {
        Vec4([value; 4])
    }

    pub fn x(&self) -> f32 {
        self.0[0]
    }

    pub fn y(&self) -> f32 {
        self.0[1]
    }

    pub fn z(&self) -> f32 {
        self.0[2]
    }

    pub fn w(&self) -> f32 {
        self.0[3]
    }

    pub fn as_array(&self) -> &[f32; 4] {
        &self.0
    }
}

impl From<[f32; 4]> for Vec4 {
    fn from(value: [f32; 4]) -> Self {
        Vec4(value)
    }
}

impl Index<usize> for Vec4 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.0[index]
    }
}

impl IndexMut<usize> for Vec4 {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.0[index]
    }
}

/// Column-major 4x4 float matrix. Defaults to identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(pub [Vec4; 4]);

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4([
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    ]);

    pub const ZERO: Mat4 = Mat4([Vec4::ZERO; 4]);

    pub fn from_columns(columns: [Vec4; 4]) -> Self {
        Mat4(columns)
    }

    pub fn diagonal(value: f32) -> Self {
        let mut out = Mat4::ZERO;
        for i in 0..4 {
            out.0[i][i] = value;
        }
        out
    }

    pub fn column(&self, index: usize) -> Vec4 {
        self.0[index]
    }

    pub fn columns(&self) -> &[Vec4; 4] {
        &self.0
    }

    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (col, column) in self.0.iter().enumerate() {
            out[col * 4..col * 4 + 4].copy_from_slice(column.as_array());
        }
        out
    }

    pub fn from_cols_slice(values: &[f32]) -> Option<Self> {
        if values.len() != 16 {
            return None;
        }
        let mut out = Mat4::ZERO;
        for (col, chunk) in values.chunks_exact(4).enumerate() {
            out.0[col] = Vec4([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Some(out)
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::IDENTITY
    }
}

impl Index<usize> for Mat4 {
    type Output = Vec4;

    fn index(&self, index: usize) -> &Vec4 {
        &self.0[index]
    }
}

impl IndexMut<usize> for Mat4 {
    fn index_mut(&mut self, index: usize) -> &mut Vec4 {
        &mut self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn identity_is_default() {
        assert_eq!(Mat4::default(), Mat4::diagonal(1.0));
        assert_eq!(Mat4::IDENTITY.column(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[rstest::rstest]
    fn cols_slice_layout() {
        let values: Vec<f32> = (0..16).map(|v| v as f32).collect();
        let matrix = Mat4::from_cols_slice(&values).unwrap();
        assert_eq!(matrix[1], Vec4::new(4.0, 5.0, 6.0, 7.0));
        assert_eq!(matrix.to_cols_array().to_vec(), values);
        assert!(Mat4::from_cols_slice(&values[..15]).is_none());
    }
}
