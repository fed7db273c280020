use crate::pipeline::{self, Axis, MathBackend};
use crate::{DMat4, DVec3};

/// One step of a placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformOp {
    Translate(DVec3),
    Scale(DVec3),
    /// Angle in radians.
    Rotate(Axis, f64),
}

/// Ordered list of ops, applied as `base * op[0] * op[1] * ...`
/// (the last op acts on the model first).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transform {
    ops: Vec<TransformOp>,
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn scale(mut self, v: DVec3) -> Self {
        self.ops.push(TransformOp::Scale(v));
        self
    }

    pub fn uniform_scale(self, s: f64) -> Self {
        self.scale(DVec3::splat(s))
    }

    pub fn translate(mut self, v: DVec3) -> Self {
        self.ops.push(TransformOp::Translate(v));
        self
    }

    pub fn rotate_degrees(mut self, axis: Axis, degrees: f64) -> Self {
        self.ops.push(TransformOp::Rotate(axis, degrees.to_radians()));
        self
    }

    /// Compose this placement onto `base` using the chosen math backend.
    pub fn apply(&self, base: DMat4, backend: MathBackend) -> DMat4 {
        self.ops.iter().fold(base, |m, op| match *op {
            TransformOp::Translate(v) => pipeline::translate(m, v, backend),
            TransformOp::Scale(v) => pipeline::scale(m, v, backend),
            TransformOp::Rotate(axis, angle) => pipeline::rotate(m, axis, angle, backend),
        })
    }

    /// Model matrix alone (`apply` onto identity).
    #[inline]
    pub fn matrix(&self, backend: MathBackend) -> DMat4 {
        self.apply(DMat4::IDENTITY, backend)
    }
}
