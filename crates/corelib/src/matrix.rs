//! Hand-rolled 4x4 and 3x3 matrices.
//!
//! Storage is column-major (`m[col * N + row]`), the same layout WebGL-style
//! APIs and `glam::DMat4::to_cols_array` use. Vectors are columns on the right,
//! so `a * b` applies `b` first.

use std::ops::Mul;

use crate::{DMat3, DMat4, DVec3};

/// 4x4 matrix, column-major.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4 {
    pub m: [f64; 16],
}

impl Matrix4 {
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    #[inline]
    pub const fn from_cols_array(m: [f64; 16]) -> Self {
        Self { m }
    }

    #[inline]
    pub const fn to_cols_array(&self) -> [f64; 16] {
        self.m
    }

    /// Element at `row`, `col`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.m[col * 4 + row]
    }

    /// Translation stored in the last column.
    pub fn translation(v: DVec3) -> Self {
        Self::from_cols_array([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            v.x, v.y, v.z, 1.0,
        ])
    }

    pub fn scaling(v: DVec3) -> Self {
        Self::from_cols_array([
            v.x, 0.0, 0.0, 0.0, //
            0.0, v.y, 0.0, 0.0, //
            0.0, 0.0, v.z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Counter-clockwise rotation about +X (right-handed).
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols_array([
            1.0, 0.0, 0.0, 0.0, //
            0.0, c, s, 0.0, //
            0.0, -s, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols_array([
            c, 0.0, -s, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            s, 0.0, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols_array([
            c, s, 0.0, 0.0, //
            -s, c, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// OpenGL-style perspective projection (clip z in [-1, 1]).
    pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = (std::f64::consts::FRAC_PI_2 - 0.5 * fov_y).tan();
        let range_inv = 1.0 / (near - far);
        Self::from_cols_array([
            f / aspect, 0.0, 0.0, 0.0, //
            0.0, f, 0.0, 0.0, //
            0.0, 0.0, (near + far) * range_inv, -1.0, //
            0.0, 0.0, near * far * range_inv * 2.0, 0.0,
        ])
    }

    /// Transform a point (w = 1) and drop w.
    pub fn transform_point(&self, p: DVec3) -> DVec3 {
        DVec3::new(
            self.at(0, 0) * p.x + self.at(0, 1) * p.y + self.at(0, 2) * p.z + self.at(0, 3),
            self.at(1, 0) * p.x + self.at(1, 1) * p.y + self.at(1, 2) * p.z + self.at(1, 3),
            self.at(2, 0) * p.x + self.at(2, 1) * p.y + self.at(2, 2) * p.z + self.at(2, 3),
        )
    }

    /// Upper-left 3x3 block.
    pub fn upper_left(&self) -> Matrix3 {
        let m = &self.m;
        Matrix3::from_cols_array([m[0], m[1], m[2], m[4], m[5], m[6], m[8], m[9], m[10]])
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.at(row, k) * rhs.at(k, col);
                }
                out[col * 4 + row] = sum;
            }
        }
        Matrix4::from_cols_array(out)
    }
}

impl From<DMat4> for Matrix4 {
    fn from(m: DMat4) -> Self {
        Self::from_cols_array(m.to_cols_array())
    }
}

impl From<Matrix4> for DMat4 {
    fn from(m: Matrix4) -> Self {
        DMat4::from_cols_array(&m.m)
    }
}

/// 3x3 matrix, column-major. Used for normal transforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix3 {
    pub m: [f64; 9],
}

impl Matrix3 {
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    #[inline]
    pub const fn from_cols_array(m: [f64; 9]) -> Self {
        Self { m }
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.m[col * 3 + row]
    }

    pub fn determinant(&self) -> f64 {
        let [a00, a01, a02, a10, a11, a12, a20, a21, a22] = self.m;
        a00 * (a22 * a11 - a12 * a21) + a01 * (-a22 * a10 + a12 * a20)
            + a02 * (a21 * a10 - a11 * a20)
    }

    pub fn transpose(&self) -> Self {
        let mut out = [0.0; 9];
        for col in 0..3 {
            for row in 0..3 {
                out[row * 3 + col] = self.at(row, col);
            }
        }
        Self::from_cols_array(out)
    }

    /// Inverse by cofactors; `None` for a singular matrix.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let [a00, a01, a02, a10, a11, a12, a20, a21, a22] = self.m;
        let inv = 1.0 / det;
        Some(Self::from_cols_array([
            (a22 * a11 - a12 * a21) * inv,
            (-a22 * a01 + a02 * a21) * inv,
            (a12 * a01 - a02 * a11) * inv,
            (-a22 * a10 + a12 * a20) * inv,
            (a22 * a00 - a02 * a20) * inv,
            (-a12 * a00 + a02 * a10) * inv,
            (a21 * a10 - a11 * a20) * inv,
            (-a21 * a00 + a01 * a20) * inv,
            (a11 * a00 - a01 * a10) * inv,
        ]))
    }

    /// Inverse-transpose of the upper-left 3x3 of a modelview matrix.
    pub fn normal_from(m: &Matrix4) -> Option<Self> {
        m.upper_left().inverse().map(|inv| inv.transpose())
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Matrix3> for DMat3 {
    fn from(m: Matrix3) -> Self {
        DMat3::from_cols_array(&m.m)
    }
}
