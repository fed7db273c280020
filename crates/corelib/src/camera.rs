use crate::DMat4;
use crate::pipeline::{self, MathBackend};

/// Distance from the eye to the rotation center of the room.
pub const DEFAULT_VIEW_DISTANCE: f64 = 15.0;

/// Perspective projection (right-handed).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub fov_y_rad: f64,
    pub aspect: f64,
    pub z_near: f64,
    pub z_far: f64,
}

impl Projection {
    pub fn new(fov_y_rad: f64, aspect: f64, z_near: f64, z_far: f64) -> Self {
        Self {
            fov_y_rad,
            aspect,
            z_near,
            z_far,
        }
    }

    /// NOTE: This returns OpenGL-style projection (z in [-1,1]).
    /// Renderer multiplies by OPENGL_TO_WGPU to match z in [0,1].
    #[inline]
    pub fn matrix(&self, backend: MathBackend) -> DMat4 {
        pipeline::perspective(
            self.fov_y_rad,
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
            backend,
        )
    }

    #[inline]
    pub fn with_aspect(mut self, aspect: f64) -> Self {
        self.aspect = aspect;
        self
    }
}

impl Default for Projection {
    /// Narrow frustum hugging the room at [`DEFAULT_VIEW_DISTANCE`].
    fn default() -> Self {
        Self::new(std::f64::consts::PI / 5.0, 1.0, 10.0, 20.0)
    }
}
