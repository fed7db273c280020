//! Transform layer: every matrix operation the scene needs, computed either by
//! the hand-rolled [`crate::matrix`] code or by `glam`.
//!
//! The backend is a plain value threaded through the calls. Both paths
//! post-multiply (`m * op`) so they agree to rounding error.

use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::matrix::{Matrix3, Matrix4};
use crate::{DMat3, DMat4, DVec3};

/// Which math implementation computes the scene matrices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MathBackend {
    /// Hand-rolled [`Matrix4`]/[`Matrix3`].
    Manual,
    /// Reference implementation (`glam`).
    #[default]
    Glam,
}

impl MathBackend {
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            MathBackend::Manual => MathBackend::Glam,
            MathBackend::Glam => MathBackend::Manual,
        }
    }
}

impl fmt::Display for MathBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MathBackend::Manual => "manual",
            MathBackend::Glam => "glam",
        })
    }
}

impl FromStr for MathBackend {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "manual" => Ok(MathBackend::Manual),
            "glam" => Ok(MathBackend::Glam),
            _ => Err(CoreError::UnknownBackend(s.to_owned())),
        }
    }
}

/// Rotation axis for [`rotate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

pub fn translate(m: DMat4, v: DVec3, backend: MathBackend) -> DMat4 {
    match backend {
        MathBackend::Manual => (Matrix4::from(m) * Matrix4::translation(v)).into(),
        MathBackend::Glam => m * DMat4::from_translation(v),
    }
}

pub fn scale(m: DMat4, v: DVec3, backend: MathBackend) -> DMat4 {
    match backend {
        MathBackend::Manual => (Matrix4::from(m) * Matrix4::scaling(v)).into(),
        MathBackend::Glam => m * DMat4::from_scale(v),
    }
}

pub fn rotate(m: DMat4, axis: Axis, angle: f64, backend: MathBackend) -> DMat4 {
    match backend {
        MathBackend::Manual => {
            let r = match axis {
                Axis::X => Matrix4::rotation_x(angle),
                Axis::Y => Matrix4::rotation_y(angle),
                Axis::Z => Matrix4::rotation_z(angle),
            };
            (Matrix4::from(m) * r).into()
        }
        MathBackend::Glam => {
            let r = match axis {
                Axis::X => DMat4::from_rotation_x(angle),
                Axis::Y => DMat4::from_rotation_y(angle),
                Axis::Z => DMat4::from_rotation_z(angle),
            };
            m * r
        }
    }
}

/// OpenGL-style perspective (clip z in [-1, 1]).
pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64, backend: MathBackend) -> DMat4 {
    match backend {
        MathBackend::Manual => Matrix4::perspective(fov_y, aspect, near, far).into(),
        MathBackend::Glam => DMat4::perspective_rh_gl(fov_y, aspect, near, far),
    }
}

/// Normal matrix for a modelview matrix; `None` when its 3x3 block is singular.
pub fn normal_matrix(m: DMat4, backend: MathBackend) -> Option<DMat3> {
    match backend {
        MathBackend::Manual => Matrix3::normal_from(&Matrix4::from(m)).map(DMat3::from),
        MathBackend::Glam => {
            let upper = DMat3::from_mat4(m);
            let det = upper.determinant();
            if det == 0.0 || !det.is_finite() {
                return None;
            }
            Some(upper.inverse().transpose())
        }
    }
}
