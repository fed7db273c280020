//! Virtual-sphere trackball.
//!
//! The view orientation is an orthonormal frame (`unitx`, `unity`, `unitz`)
//! rather than angles or a quaternion. A drag step maps the previous and the
//! current pointer positions onto a hemisphere facing the viewer and rotates
//! the frame by a transvection: two reflections through lines, which is a
//! proper rotation and keeps the frame orthonormal without trigonometry.
//!
//! Rotation by exactly 180 degrees (anti-parallel rays) has no defined axis;
//! the bisector normalizes a zero vector and the frame turns to NaN. Pointer
//! rays from a single drag step are never that far apart in practice.

use std::fmt;

use glam::{DVec2, DVec4, UVec2};

use crate::{DMat3, DMat4, DVec3};

/// Default viewpoint direction (normalized on use).
pub const DEFAULT_VIEWPOINT_DIRECTION: DVec3 = DVec3::new(0.0, 0.0, 10.0);
/// Default up hint.
pub const DEFAULT_VIEW_UP: DVec3 = DVec3::Y;

/// Right-handed orthonormal camera axes in world coordinates.
/// `unitz` points from the scene toward the viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewFrame {
    pub unitx: DVec3,
    pub unity: DVec3,
    pub unitz: DVec3,
}

impl ViewFrame {
    pub const IDENTITY: Self = Self {
        unitx: DVec3::X,
        unity: DVec3::Y,
        unitz: DVec3::Z,
    };

    /// Gram-Schmidt frame from a viewing direction and an up hint.
    /// Collinear inputs give a NaN frame.
    pub fn looking_along(viewpoint_direction: DVec3, view_up: DVec3) -> Self {
        let unitz = viewpoint_direction / viewpoint_direction.length();
        let unity = view_up - unitz * unitz.dot(view_up);
        let unity = unity / unity.length();
        let unitx = unity.cross(unitz);
        Self {
            unitx,
            unity,
            unitz,
        }
    }

    /// Rotation taking world coordinates to eye coordinates
    /// (rows are the frame axes).
    #[inline]
    pub fn rotation(&self) -> DMat3 {
        DMat3::from_cols(self.unitx, self.unity, self.unitz).transpose()
    }

    /// Pixel position to a world-space ray. Inside `circle` the point is lifted
    /// onto the front hemisphere; outside it is returned flat.
    pub fn to_ray(&self, circle: &ProjectedCircle, position: DVec2) -> DVec3 {
        let dx = position.x - circle.center.x;
        let dy = circle.center.y - position.y;
        let v = self.unitx * dx + self.unity * dy;
        let dist2 = v.length_squared();
        if dist2 > circle.radius2 {
            v
        } else {
            v + self.unitz * (circle.radius2 - dist2).sqrt()
        }
    }

    /// Rotate the frame by reflecting each axis in the bisector of `e1` and
    /// `e2`, then in `e1`. The view then carries direction `e1` onto `e2`.
    pub fn apply_transvection(&mut self, e1: DVec3, e2: DVec3) {
        let e1 = e1 / e1.length();
        let e2 = e2 / e2.length();
        let e = e1 + e2;
        let e = e / e.length();
        for axis in [&mut self.unitx, &mut self.unity, &mut self.unitz] {
            *axis = reflect_in_axis(e1, reflect_in_axis(e, *axis));
        }
    }

    /// Largest deviation from orthonormality (lengths and pairwise dots).
    pub fn orthonormality_error(&self) -> f64 {
        let Self {
            unitx,
            unity,
            unitz,
        } = *self;
        [
            (unitx.length() - 1.0).abs(),
            (unity.length() - 1.0).abs(),
            (unitz.length() - 1.0).abs(),
            unitx.dot(unity).abs(),
            unity.dot(unitz).abs(),
            unitz.dot(unitx).abs(),
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }
}

impl Default for ViewFrame {
    fn default() -> Self {
        Self::looking_along(DEFAULT_VIEWPOINT_DIRECTION, DEFAULT_VIEW_UP)
    }
}

/// Reflection of `source` through the line spanned by unit `axis`.
#[inline]
fn reflect_in_axis(axis: DVec3, source: DVec3) -> DVec3 {
    axis * (2.0 * axis.dot(source)) - source
}

/// Circle inscribed in the surface; its interior maps onto the hemisphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedCircle {
    pub center: DVec2,
    pub radius2: f64,
}

impl ProjectedCircle {
    pub fn for_surface(surface: UVec2) -> Self {
        let center = surface.as_dvec2() / 2.0;
        let radius = center.x.min(center.y);
        Self {
            center,
            radius2: radius * radius,
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius2.sqrt()
    }
}

/// Pointer input in surface pixel coordinates (origin top-left, y down).
/// `contacts` is the number of simultaneous touch points (1 for a mouse).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Press {
        position: DVec2,
        contacts: usize,
        surface: UVec2,
    },
    Move {
        position: DVec2,
        contacts: usize,
    },
    Release,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragSession {
    circle: ProjectedCircle,
    previous: DVec2,
}

/// Installed with [`TrackballRotator::with_redraw`]; runs after each rotation step.
pub type RedrawCallback = Box<dyn FnMut()>;

/// Trackball camera controller.
pub struct TrackballRotator {
    frame: ViewFrame,
    view_distance: Option<f64>,
    rotation_center: Option<DVec3>,
    drag: Option<DragSession>,
    redraw: Option<RedrawCallback>,
}

impl TrackballRotator {
    /// Frame looking down -z with +y up.
    pub fn new(view_distance: Option<f64>) -> Self {
        Self::with_view(view_distance, None, None)
    }

    pub fn with_view(
        view_distance: Option<f64>,
        viewpoint_direction: Option<DVec3>,
        view_up: Option<DVec3>,
    ) -> Self {
        let mut rotator = Self {
            frame: ViewFrame::IDENTITY,
            view_distance: None,
            rotation_center: None,
            drag: None,
            redraw: None,
        };
        rotator.set_view(view_distance, viewpoint_direction, view_up);
        rotator
    }

    pub fn with_redraw(mut self, redraw: impl FnMut() + 'static) -> Self {
        self.redraw = Some(Box::new(redraw));
        self
    }

    /// Reset orientation and distance.
    pub fn set_view(
        &mut self,
        view_distance: Option<f64>,
        viewpoint_direction: Option<DVec3>,
        view_up: Option<DVec3>,
    ) {
        self.frame = ViewFrame::looking_along(
            viewpoint_direction.unwrap_or(DEFAULT_VIEWPOINT_DIRECTION),
            view_up.unwrap_or(DEFAULT_VIEW_UP),
        );
        self.view_distance = view_distance;
    }

    #[inline]
    pub fn frame(&self) -> &ViewFrame {
        &self.frame
    }

    /// Column-major view matrix: frame rotation about the rotation center,
    /// pushed back by the view distance.
    pub fn view_matrix(&self) -> DMat4 {
        let rotation = self.frame.rotation();
        let mut t = match self.rotation_center {
            Some(center) => center - rotation * center,
            None => DVec3::ZERO,
        };
        if let Some(distance) = self.view_distance {
            t.z -= distance;
        }
        DMat4::from_cols(
            rotation.x_axis.extend(0.0),
            rotation.y_axis.extend(0.0),
            rotation.z_axis.extend(0.0),
            DVec4::new(t.x, t.y, t.z, 1.0),
        )
    }

    #[inline]
    pub fn view_distance(&self) -> Option<f64> {
        self.view_distance
    }

    #[inline]
    pub fn set_view_distance(&mut self, view_distance: Option<f64>) {
        self.view_distance = view_distance;
    }

    /// Rotation center, or the origin when none was set.
    #[inline]
    pub fn rotation_center(&self) -> DVec3 {
        self.rotation_center.unwrap_or(DVec3::ZERO)
    }

    #[inline]
    pub fn set_rotation_center(&mut self, center: DVec3) {
        self.rotation_center = Some(center);
    }

    #[inline]
    pub fn apply_transvection(&mut self, e1: DVec3, e2: DVec3) {
        self.frame.apply_transvection(e1, e2);
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Drive the drag state machine. Returns `true` when the frame rotated.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Press {
                position,
                contacts,
                surface,
            } => {
                if contacts != 1 {
                    self.end_drag("multi-touch");
                } else if self.drag.is_none() {
                    let circle = ProjectedCircle::for_surface(surface.max(UVec2::ONE));
                    log::debug!(
                        "Trackball drag start at ({:.1}, {:.1}), radius {:.1}",
                        position.x,
                        position.y,
                        circle.radius()
                    );
                    self.drag = Some(DragSession {
                        circle,
                        previous: position,
                    });
                }
                false
            }
            PointerEvent::Move { position, contacts } => {
                if self.drag.is_none() {
                    return false;
                }
                if contacts != 1 {
                    self.end_drag("multi-touch");
                    return false;
                }
                self.drag_to(position);
                true
            }
            PointerEvent::Release => {
                self.end_drag("release");
                false
            }
            PointerEvent::Cancel => {
                self.end_drag("cancel");
                false
            }
        }
    }

    fn drag_to(&mut self, position: DVec2) {
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        let ray1 = self.frame.to_ray(&session.circle, session.previous);
        let ray2 = self.frame.to_ray(&session.circle, position);
        session.previous = position;
        self.frame.apply_transvection(ray1, ray2);
        log::trace!("Trackball step {ray1:?} -> {ray2:?}");
        if let Some(redraw) = self.redraw.as_mut() {
            redraw();
        }
    }

    fn end_drag(&mut self, reason: &str) {
        if self.drag.take().is_some() {
            log::debug!("Trackball drag end ({reason})");
        }
    }
}

impl Default for TrackballRotator {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for TrackballRotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackballRotator")
            .field("frame", &self.frame)
            .field("view_distance", &self.view_distance)
            .field("rotation_center", &self.rotation_center)
            .field("dragging", &self.drag.is_some())
            .field("redraw", &self.redraw.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const EPS: f64 = 1e-9;

    fn frames_close(a: &ViewFrame, b: &ViewFrame) -> bool {
        a.unitx.abs_diff_eq(b.unitx, EPS)
            && a.unity.abs_diff_eq(b.unity, EPS)
            && a.unitz.abs_diff_eq(b.unitz, EPS)
    }

    fn press(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Press {
            position: DVec2::new(x, y),
            contacts: 1,
            surface: UVec2::new(400, 300),
        }
    }

    fn drag(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: DVec2::new(x, y),
            contacts: 1,
        }
    }

    #[test]
    fn default_frame_is_identity() {
        let rotator = TrackballRotator::default();
        assert!(frames_close(rotator.frame(), &ViewFrame::IDENTITY));
        assert!(!rotator.is_dragging());
    }

    #[test]
    fn construction_removes_up_component() {
        let frame = ViewFrame::looking_along(DVec3::new(1.0, 1.0, 1.0), DVec3::Y);
        assert!(frame.orthonormality_error() < EPS);
        assert!(frame.unitz.abs_diff_eq(DVec3::splat(1.0 / 3f64.sqrt()), EPS));
        assert!(frame.unitx.abs_diff_eq(frame.unity.cross(frame.unitz), EPS));
        // up hint stays in the y/z plane of the frame
        assert!(frame.unitx.dot(DVec3::Y).abs() < EPS);
    }

    #[test]
    fn transvections_keep_frame_orthonormal() {
        let mut frame = ViewFrame::default();
        let steps = [
            (DVec3::new(1.0, 0.2, 3.0), DVec3::new(0.8, 0.5, 3.0)),
            (DVec3::new(-2.0, 1.0, 0.5), DVec3::new(-1.0, 2.0, 1.0)),
            (DVec3::new(0.0, 0.0, 1.0), DVec3::new(0.3, -0.4, 1.0)),
            (DVec3::new(5.0, 5.0, 0.0), DVec3::new(4.0, 6.0, 1.0)),
        ];
        for _ in 0..50 {
            for (e1, e2) in steps {
                frame.apply_transvection(e1, e2);
                assert!(frame.orthonormality_error() < EPS);
                assert!(frame.unitx.abs_diff_eq(frame.unity.cross(frame.unitz), EPS));
            }
        }
    }

    #[test]
    fn identity_transvection_leaves_frame() {
        let mut frame = ViewFrame::looking_along(DVec3::new(0.3, -1.0, 2.0), DVec3::Y);
        let before = frame;
        frame.apply_transvection(DVec3::new(2.0, 1.0, -4.0), DVec3::new(2.0, 1.0, -4.0));
        assert!(frames_close(&frame, &before));
    }

    #[test]
    fn quarter_turn_and_back() {
        let mut frame = ViewFrame::IDENTITY;
        frame.apply_transvection(DVec3::X, DVec3::Y);
        assert!(frame.orthonormality_error() < EPS);
        // +z stays put for a rotation about z
        assert!(frame.unitz.abs_diff_eq(DVec3::Z, EPS));
        // the view now shows world +x where +y was
        let view = frame.rotation();
        assert!((view * DVec3::X).abs_diff_eq(DVec3::Y, EPS));

        frame.apply_transvection(DVec3::Y, DVec3::X);
        assert!(frames_close(&frame, &ViewFrame::IDENTITY));
    }

    #[test]
    fn ray_at_center_is_the_pole() {
        let circle = ProjectedCircle::for_surface(UVec2::new(400, 300));
        assert_eq!(circle.radius(), 150.0);
        let frame = ViewFrame::IDENTITY;
        let ray = frame.to_ray(&circle, DVec2::new(200.0, 150.0));
        assert_eq!(ray, DVec3::new(0.0, 0.0, 150.0));
    }

    #[test]
    fn ray_on_boundary_has_no_lift() {
        let circle = ProjectedCircle::for_surface(UVec2::new(400, 300));
        let frame = ViewFrame::IDENTITY;
        // y grows downward on screen, upward in the frame
        let ray = frame.to_ray(&circle, DVec2::new(200.0, 0.0));
        assert_eq!(ray, DVec3::new(0.0, 150.0, 0.0));
        let ray = frame.to_ray(&circle, DVec2::new(350.0, 150.0));
        assert_eq!(ray, DVec3::new(150.0, 0.0, 0.0));
    }

    #[test]
    fn ray_outside_circle_is_flat() {
        let circle = ProjectedCircle::for_surface(UVec2::new(400, 300));
        let frame = ViewFrame::looking_along(DVec3::new(1.0, 2.0, 2.0), DVec3::Y);
        let ray = frame.to_ray(&circle, DVec2::new(390.0, 10.0));
        let expected = frame.unitx * 190.0 + frame.unity * 140.0;
        assert!(ray.abs_diff_eq(expected, EPS));
        assert!(ray.dot(frame.unitz).abs() < EPS);
    }

    #[test]
    fn ray_inside_circle_lies_on_sphere() {
        let circle = ProjectedCircle::for_surface(UVec2::new(400, 300));
        let frame = ViewFrame::looking_along(DVec3::new(-1.0, 0.5, 2.0), DVec3::Y);
        let ray = frame.to_ray(&circle, DVec2::new(250.0, 100.0));
        assert!((ray.length() - 150.0).abs() < EPS);
        assert!(ray.dot(frame.unitz) > 0.0);
    }

    #[test]
    fn plain_view_matrix_is_frame_rotation() {
        let rotator = TrackballRotator::with_view(None, Some(DVec3::new(1.0, 2.0, 3.0)), None);
        let frame = *rotator.frame();
        let m = rotator.view_matrix();
        assert_eq!(m.row(0), frame.unitx.extend(0.0));
        assert_eq!(m.row(1), frame.unity.extend(0.0));
        assert_eq!(m.row(2), frame.unitz.extend(0.0));
        assert_eq!(m.w_axis, DVec4::W);
    }

    #[test]
    fn view_distance_pushes_scene_back() {
        let mut rotator = TrackballRotator::new(Some(15.0));
        assert_eq!(rotator.view_distance(), Some(15.0));
        assert_eq!(rotator.view_matrix().w_axis, DVec4::new(0.0, 0.0, -15.0, 1.0));
        rotator.set_view_distance(Some(-2.0));
        assert_eq!(rotator.view_matrix().w_axis.z, 2.0);
    }

    #[test]
    fn rotation_center_is_a_fixed_point() {
        let mut rotator =
            TrackballRotator::with_view(None, Some(DVec3::new(0.5, 1.0, 1.0)), None);
        assert_eq!(rotator.rotation_center(), DVec3::ZERO);
        let center = DVec3::new(1.0, -2.0, 0.5);
        rotator.set_rotation_center(center);
        assert_eq!(rotator.rotation_center(), center);
        let m = rotator.view_matrix();
        assert!(m.transform_point3(center).abs_diff_eq(center, EPS));

        rotator.set_view_distance(Some(10.0));
        let shifted = rotator.view_matrix().transform_point3(center);
        assert!(shifted.abs_diff_eq(center - DVec3::Z * 10.0, EPS));
    }

    #[test]
    fn drag_rotates_and_requests_redraw() {
        let redraws = Rc::new(Cell::new(0));
        let counter = redraws.clone();
        let mut rotator =
            TrackballRotator::new(Some(15.0)).with_redraw(move || counter.set(counter.get() + 1));

        assert!(!rotator.handle_pointer(drag(10.0, 10.0)), "move while idle");
        assert!(!rotator.handle_pointer(press(200.0, 150.0)));
        assert!(rotator.is_dragging());
        assert!(rotator.handle_pointer(drag(230.0, 150.0)));
        assert!(rotator.handle_pointer(drag(260.0, 140.0)));
        assert_eq!(redraws.get(), 2);
        assert!(!frames_close(rotator.frame(), &ViewFrame::IDENTITY));
        assert!(rotator.frame().orthonormality_error() < EPS);

        rotator.handle_pointer(PointerEvent::Release);
        assert!(!rotator.is_dragging());
        let frame = *rotator.frame();
        assert!(!rotator.handle_pointer(drag(0.0, 0.0)));
        assert_eq!(*rotator.frame(), frame);
        assert_eq!(redraws.get(), 2);
    }

    #[test]
    fn horizontal_drag_turns_about_vertical_axis() {
        let mut rotator = TrackballRotator::default();
        rotator.handle_pointer(press(200.0, 150.0));
        rotator.handle_pointer(drag(250.0, 150.0));
        let frame = rotator.frame();
        assert!(frame.unity.abs_diff_eq(DVec3::Y, EPS));
        // dragging right brings the left side of the scene toward the viewer
        assert!(frame.unitz.x < 0.0);
    }

    #[test]
    fn second_press_while_dragging_is_ignored() {
        let mut rotator = TrackballRotator::default();
        rotator.handle_pointer(press(200.0, 150.0));
        rotator.handle_pointer(press(10.0, 10.0));
        assert!(rotator.is_dragging());
        rotator.handle_pointer(drag(200.0, 150.0));
        // drag continued from the first press, so no movement happened
        assert!(frames_close(rotator.frame(), &ViewFrame::IDENTITY));
    }

    #[test]
    fn second_contact_cancels_without_rotation() {
        let mut rotator = TrackballRotator::default();
        rotator.handle_pointer(press(200.0, 150.0));
        let cancelled = rotator.handle_pointer(PointerEvent::Press {
            position: DVec2::new(300.0, 100.0),
            contacts: 2,
            surface: UVec2::new(400, 300),
        });
        assert!(!cancelled);
        assert!(!rotator.is_dragging());
        assert!(!rotator.handle_pointer(drag(260.0, 100.0)));
        assert_eq!(*rotator.frame(), ViewFrame::IDENTITY);

        rotator.handle_pointer(press(200.0, 150.0));
        let moved = rotator.handle_pointer(PointerEvent::Move {
            position: DVec2::new(220.0, 150.0),
            contacts: 2,
        });
        assert!(!moved);
        assert!(!rotator.is_dragging());
        assert_eq!(*rotator.frame(), ViewFrame::IDENTITY);
    }

    #[test]
    fn cancel_ends_session() {
        let mut rotator = TrackballRotator::default();
        rotator.handle_pointer(press(100.0, 100.0));
        rotator.handle_pointer(PointerEvent::Cancel);
        assert!(!rotator.is_dragging());
    }
}
