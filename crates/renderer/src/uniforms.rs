//! GPU-side uniform layout and the f64 -> f32 conversion of draw matrices.

use bytemuck::{Pod, Zeroable};
use corelib::scene::DrawItem;
use glam::{DMat3, DMat4, Mat4};

/// Maps OpenGL clip z in [-1, 1] to wgpu's [0, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

/// Material and light, shared by every object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    /// Eye space; w = 0 for a directional light.
    pub light_position: [f32; 4],
    pub diffuse_color: [f32; 4],
    pub specular_color: [f32; 3],
    pub specular_exponent: f32,
}

impl Default for Lighting {
    /// White material lit from the eye.
    fn default() -> Self {
        Self {
            light_position: [0.0, 0.0, 0.0, 1.0],
            diffuse_color: [1.0, 1.0, 1.0, 1.0],
            specular_color: [0.5, 0.5, 0.5],
            specular_exponent: 10.0,
        }
    }
}

/// Per-object UBO (16-byte aligned; mat3 columns padded to vec4).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub modelview: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 3],
    pub light_position: [f32; 4],
    pub diffuse_color: [f32; 4],
    pub specular: [f32; 4],
}

impl ObjectUniform {
    /// `projection` is OpenGL-style; the depth remap happens here.
    pub fn new(item: &DrawItem, projection: DMat4, lighting: &Lighting) -> Self {
        let [sr, sg, sb] = lighting.specular_color;
        Self {
            modelview: item.model_view.as_mat4().to_cols_array_2d(),
            projection: (OPENGL_TO_WGPU * projection.as_mat4()).to_cols_array_2d(),
            normal_matrix: padded_mat3(item.normal_matrix),
            light_position: lighting.light_position,
            diffuse_color: lighting.diffuse_color,
            specular: [sr, sg, sb, lighting.specular_exponent],
        }
    }
}

fn padded_mat3(m: DMat3) -> [[f32; 4]; 3] {
    let m = m.as_mat3();
    [
        m.x_axis.extend(0.0).to_array(),
        m.y_axis.extend(0.0).to_array(),
        m.z_axis.extend(0.0).to_array(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::scene::ModelKind;
    use glam::{DVec3, Vec4};

    #[test]
    fn uniform_matches_wgsl_layout() {
        // mat4 + mat4 + mat3x3 (3 * vec4) + 3 * vec4
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 64 + 64 + 48 + 48);
        assert_eq!(std::mem::size_of::<ObjectUniform>() % 16, 0);
    }

    #[test]
    fn depth_range_is_remapped() {
        let projection = DMat4::perspective_rh_gl(0.6, 1.0, 10.0, 20.0);
        let item = DrawItem {
            model: ModelKind::Cube,
            model_view: DMat4::IDENTITY,
            normal_matrix: DMat3::IDENTITY,
        };
        let u = ObjectUniform::new(&item, projection, &Lighting::default());
        let p = Mat4::from_cols_array_2d(&u.projection);
        let near = p * Vec4::new(0.0, 0.0, -10.0, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -20.0, 1.0);
        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-5);
        assert_eq!(u.specular, [0.5, 0.5, 0.5, 10.0]);
    }

    #[test]
    fn normal_matrix_columns_are_padded() {
        let item = DrawItem {
            model: ModelKind::Chair,
            model_view: DMat4::IDENTITY,
            normal_matrix: DMat3::from_diagonal(DVec3::new(1.0, 2.0, 3.0)),
        };
        let u = ObjectUniform::new(&item, DMat4::IDENTITY, &Lighting::default());
        assert_eq!(
            u.normal_matrix,
            [[1.0, 0.0, 0.0, 0.0], [0.0, 2.0, 0.0, 0.0], [0.0, 0.0, 3.0, 0.0]]
        );
    }
}
