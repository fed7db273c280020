//! Window input -> trackball pointer events.
//!
//! Mouse: left button + cursor position. Touch: every active finger is
//! tracked by id so a second contact can cancel the drag. The device that
//! starts a drag owns it until release; the other device is ignored meanwhile.

use std::collections::HashMap;

use corelib::trackball::PointerEvent;
use glam::{DVec2, UVec2};
use winit::event::TouchPhase;

/// Device that started the current drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DragOwner {
    Mouse,
    Touch,
}

#[derive(Debug, Default)]
pub struct PointerTracker {
    surface: UVec2,
    cursor: Option<DVec2>,
    mouse_down: bool,
    touches: HashMap<u64, DVec2>,
    owner: Option<DragOwner>,
}

impl PointerTracker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: UVec2::new(width, height).max(UVec2::ONE),
            ..Default::default()
        }
    }

    /// Physical surface size reported with every press.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface = UVec2::new(width, height).max(UVec2::ONE);
    }

    #[inline]
    pub fn surface(&self) -> UVec2 {
        self.surface
    }

    pub fn cursor_moved(&mut self, x: f64, y: f64) -> Option<PointerEvent> {
        let position = DVec2::new(x, y);
        self.cursor = Some(position);
        (self.mouse_down && self.owner == Some(DragOwner::Mouse)).then_some(PointerEvent::Move {
            position,
            contacts: 1,
        })
    }

    /// Cursor left the window; a drag in progress keeps its last position.
    pub fn cursor_left(&mut self) {
        if !self.mouse_down {
            self.cursor = None;
        }
    }

    /// Left button state change. Ignored while a touch drag is active.
    pub fn mouse_button(&mut self, pressed: bool) -> Option<PointerEvent> {
        if pressed {
            let position = self.cursor?;
            self.mouse_down = true;
            if self.owner == Some(DragOwner::Touch) {
                return None;
            }
            self.owner = Some(DragOwner::Mouse);
            Some(PointerEvent::Press {
                position,
                contacts: 1,
                surface: self.surface,
            })
        } else if self.mouse_down {
            self.mouse_down = false;
            if self.owner != Some(DragOwner::Mouse) {
                return None;
            }
            self.owner = None;
            Some(PointerEvent::Release)
        } else {
            None
        }
    }

    /// Touch contact change. Ignored while a mouse drag is active.
    pub fn touch(&mut self, id: u64, phase: TouchPhase, x: f64, y: f64) -> Option<PointerEvent> {
        let position = DVec2::new(x, y);
        match phase {
            TouchPhase::Started => {
                self.touches.insert(id, position);
                if self.owner == Some(DragOwner::Mouse) {
                    return None;
                }
                self.owner = Some(DragOwner::Touch);
                Some(PointerEvent::Press {
                    position,
                    contacts: self.touches.len(),
                    surface: self.surface,
                })
            }
            TouchPhase::Moved => {
                self.touches.insert(id, position);
                (self.owner == Some(DragOwner::Touch)).then_some(PointerEvent::Move {
                    position,
                    contacts: self.touches.len(),
                })
            }
            TouchPhase::Ended => {
                self.touches.remove(&id);
                if self.owner != Some(DragOwner::Touch) {
                    return None;
                }
                if self.touches.is_empty() {
                    self.owner = None;
                }
                Some(PointerEvent::Release)
            }
            TouchPhase::Cancelled => {
                self.touches.remove(&id);
                if self.touches.is_empty() {
                    return self.cancel();
                }
                (self.owner == Some(DragOwner::Touch)).then_some(PointerEvent::Cancel)
            }
        }
    }

    /// Forget every pressed button and contact, e.g. on focus loss when the
    /// matching release events will never arrive.
    pub fn cancel(&mut self) -> Option<PointerEvent> {
        self.touches.clear();
        self.mouse_down = false;
        self.owner = None;
        Some(PointerEvent::Cancel)
    }
}
