//! Core types: math re-exports, matrix pipelines, scene, trackball.

pub use glam::{DMat3, DMat4, DVec2, DVec3, DVec4, UVec2, dvec3};

pub mod camera;
pub mod error;
pub mod matrix;
pub mod pipeline;
pub mod scene;
pub mod trackball;
pub mod transform;

pub use error::{CoreError, CoreResult};
pub use pipeline::MathBackend;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_identity_matrix() {
        let t = transform::Transform::identity();
        assert_eq!(t.matrix(MathBackend::Manual), DMat4::IDENTITY);
        assert_eq!(t.matrix(MathBackend::Glam), DMat4::IDENTITY);
    }

    #[test]
    fn scale_then_translate_matrix() {
        let t = transform::Transform::identity()
            .uniform_scale(2.0)
            .translate(dvec3(1.0, 2.0, 3.0));
        // Translation is scaled because it acts on the model first.
        let m = t.matrix(MathBackend::Manual).to_cols_array();
        assert!((m[12] - 2.0).abs() < 1e-12);
        assert!((m[13] - 4.0).abs() < 1e-12);
        assert!((m[14] - 6.0).abs() < 1e-12);
        assert!((m[0] - 2.0).abs() < 1e-12);
        assert!((m[5] - 2.0).abs() < 1e-12);
        assert!((m[10] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn room_view_projection_is_finite() {
        let rotator = trackball::TrackballRotator::new(Some(camera::DEFAULT_VIEW_DISTANCE));
        let proj = camera::Projection::default().with_aspect(16.0 / 9.0);
        for backend in [MathBackend::Manual, MathBackend::Glam] {
            let p = proj.matrix(backend);
            for item in scene::Scene::furnished_room().draw_list(rotator.view_matrix(), backend) {
                let pv = p * item.model_view;
                assert!(pv.to_cols_array().iter().all(|f| f.is_finite()));
            }
        }
    }

    #[test]
    fn room_sits_inside_the_depth_range() {
        let rotator = trackball::TrackballRotator::new(Some(camera::DEFAULT_VIEW_DISTANCE));
        let proj = camera::Projection::default();
        let origin = rotator.view_matrix().transform_point3(DVec3::ZERO);
        assert_eq!(origin.z, -camera::DEFAULT_VIEW_DISTANCE);
        assert!(-origin.z > proj.z_near && -origin.z < proj.z_far);
    }
}
