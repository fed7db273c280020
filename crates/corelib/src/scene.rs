//! Declarative scene: a flat list of (model, placement) pairs.
//!
//! Each object is composed onto the view matrix independently, so draw order
//! carries no hidden matrix state.

use crate::pipeline::{self, Axis, MathBackend};
use crate::transform::Transform;
use crate::{DMat3, DMat4, dvec3};

/// Meshes the renderer knows how to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Chair,
    Table,
    Cube,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Chair, ModelKind::Table, ModelKind::Cube];
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub model: ModelKind,
    pub transform: Transform,
}

impl SceneObject {
    pub fn new(model: ModelKind, transform: Transform) -> Self {
        Self { model, transform }
    }
}

/// Matrices for one draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub model: ModelKind,
    pub model_view: DMat4,
    pub normal_matrix: DMat3,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new(objects: Vec<SceneObject>) -> Self {
        Self { objects }
    }

    /// Four chairs around a table with a cube on it.
    pub fn furnished_room() -> Self {
        let chair = || Transform::identity().uniform_scale(2.0);
        Self::new(vec![
            SceneObject::new(
                ModelKind::Chair,
                chair()
                    .rotate_degrees(Axis::Y, 90.0)
                    .translate(dvec3(1.0, -1.0, 0.8)),
            ),
            SceneObject::new(ModelKind::Chair, chair().translate(dvec3(1.2, -1.0, 0.7))),
            SceneObject::new(
                ModelKind::Chair,
                chair()
                    .translate(dvec3(-1.0, -1.0, -0.65))
                    .rotate_degrees(Axis::Y, 180.0),
            ),
            SceneObject::new(
                ModelKind::Chair,
                chair()
                    .translate(dvec3(-0.5, -1.0, 1.0))
                    .rotate_degrees(Axis::Y, 270.0),
            ),
            SceneObject::new(
                ModelKind::Table,
                Transform::identity()
                    .uniform_scale(2.0)
                    .translate(dvec3(0.0, -0.5, 0.0))
                    .rotate_degrees(Axis::Y, 45.0),
            ),
            SceneObject::new(
                ModelKind::Cube,
                Transform::identity().translate(dvec3(0.3, -0.2, 0.0)),
            ),
        ])
    }

    #[inline]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Modelview and normal matrices for every object, in list order.
    /// Objects with a degenerate placement are skipped.
    pub fn draw_list(&self, view: DMat4, backend: MathBackend) -> Vec<DrawItem> {
        self.objects
            .iter()
            .filter_map(|obj| {
                let model_view = obj.transform.apply(view, backend);
                let Some(normal_matrix) = pipeline::normal_matrix(model_view, backend) else {
                    log::warn!("Skipping {:?}: singular modelview matrix", obj.model);
                    return None;
                };
                Some(DrawItem {
                    model: obj.model,
                    model_view,
                    normal_matrix,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DVec3;

    #[test]
    fn room_layout() {
        let scene = Scene::furnished_room();
        let kinds: Vec<_> = scene.objects().iter().map(|o| o.model).collect();
        assert_eq!(
            kinds,
            [
                ModelKind::Chair,
                ModelKind::Chair,
                ModelKind::Chair,
                ModelKind::Chair,
                ModelKind::Table,
                ModelKind::Cube
            ]
        );
    }

    #[test]
    fn first_chair_is_scaled_rotated_then_translated() {
        let scene = Scene::furnished_room();
        let m = scene.objects()[0].transform.matrix(MathBackend::Glam);
        let expected = DMat4::from_scale(DVec3::splat(2.0))
            * DMat4::from_rotation_y(90f64.to_radians())
            * DMat4::from_translation(DVec3::new(1.0, -1.0, 0.8));
        assert!(m.abs_diff_eq(expected, 1e-12));
    }

    #[test]
    fn draw_list_is_independent_of_backend_and_order() {
        let scene = Scene::furnished_room();
        let view = DMat4::from_translation(DVec3::new(0.0, 0.0, -15.0));
        let manual = scene.draw_list(view, MathBackend::Manual);
        let glam = scene.draw_list(view, MathBackend::Glam);
        assert_eq!(manual.len(), 6);
        for (a, b) in manual.iter().zip(&glam) {
            assert_eq!(a.model, b.model);
            assert!(a.model_view.abs_diff_eq(b.model_view, 1e-9));
            assert!(a.normal_matrix.abs_diff_eq(b.normal_matrix, 1e-9));
        }

        // Drawing only the cube gives the same matrix as drawing it last.
        let cube_only = Scene::new(vec![scene.objects()[5].clone()]);
        let alone = cube_only.draw_list(view, MathBackend::Glam);
        assert!(alone[0].model_view.abs_diff_eq(glam[5].model_view, 1e-12));
    }

    #[test]
    fn degenerate_object_is_skipped() {
        let flat = Transform::identity().scale(DVec3::new(1.0, 0.0, 1.0));
        let scene = Scene::new(vec![
            SceneObject::new(ModelKind::Cube, flat),
            SceneObject::new(ModelKind::Table, Transform::identity()),
        ]);
        let items = scene.draw_list(DMat4::IDENTITY, MathBackend::Glam);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].model, ModelKind::Table);
    }
}
