use egui::{CursorIcon, PointerButton, Pos2, vec2};

use super::InputEvent;
use crate::view::ViewControl;

/// Camera gesture in progress. The kind is latched on pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NavigationGesture {
    #[default]
    Idle,
    /// Middle button drag
    Panning { last: Pos2 },
    /// Right button drag, rotation tracked by the view from its start point
    Rotating,
    /// Shift + right button drag, rolls about the view axis
    RollRotating { last: Pos2 },
}

impl NavigationGesture {
    /// Button whose release ends the gesture
    fn button(&self) -> Option<PointerButton> {
        match self {
            Self::Idle => None,
            Self::Panning { .. } => Some(PointerButton::Middle),
            Self::Rotating | Self::RollRotating { .. } => Some(PointerButton::Secondary),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Panning { .. } => "panning",
            Self::Rotating => "rotating",
            Self::RollRotating { .. } => "roll-rotating",
        }
    }
}

/// What the viewer has to do after an event went through the classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Nothing changed
    Ignored,
    /// Gesture state changed, nothing to repaint
    Updated,
    /// The camera moved
    Redraw,
    /// Primary click to turn into a construction point
    Pick(Pos2),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Roll angle per pixel of horizontal drag
    pub roll_radians_per_pixel: f64,
    /// Wheel delta of one zoom step
    pub wheel_notch: i32,
    /// Vertical offset of the zoom target per step
    pub zoom_pixels_per_step: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            roll_radians_per_pixel: 0.01,
            wheel_notch: 120,
            zoom_pixels_per_step: 10.0,
        }
    }
}

/// Turns pointer events into camera gestures or construction picks
#[derive(Debug, Default)]
pub struct GestureClassifier {
    config: GestureConfig,
    gesture: NavigationGesture,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            gesture: NavigationGesture::Idle,
        }
    }

    pub fn gesture(&self) -> NavigationGesture {
        self.gesture
    }

    pub fn is_navigating(&self) -> bool {
        self.gesture != NavigationGesture::Idle
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self.gesture {
            NavigationGesture::Idle => CursorIcon::Default,
            NavigationGesture::Panning { .. } => CursorIcon::Grabbing,
            NavigationGesture::Rotating | NavigationGesture::RollRotating { .. } => {
                CursorIcon::AllScroll
            }
        }
    }

    /// Drops any gesture in progress, e.g. when the viewport loses the pointer
    pub fn cancel(&mut self) -> GestureOutcome {
        if !self.is_navigating() {
            return GestureOutcome::Ignored;
        }
        log::debug!("{} gesture cancelled", self.gesture.name());
        self.gesture = NavigationGesture::Idle;
        GestureOutcome::Updated
    }

    pub fn handle(&mut self, event: &InputEvent, view: &mut impl ViewControl) -> GestureOutcome {
        match *event {
            InputEvent::PointerDown {
                pos,
                button,
                modifiers,
            } => self.on_pointer_down(pos, button, modifiers.shift, view),
            InputEvent::PointerMove { pos } => self.on_pointer_move(pos, view),
            InputEvent::PointerUp { button, .. } => {
                if self.gesture.button() == Some(button) {
                    log::debug!("{} gesture ended", self.gesture.name());
                    self.gesture = NavigationGesture::Idle;
                    GestureOutcome::Updated
                } else {
                    GestureOutcome::Ignored
                }
            }
            InputEvent::Scroll { pos, delta } => self.on_scroll(pos, delta, view),
            InputEvent::Cancel => self.cancel(),
        }
    }

    fn on_pointer_down(
        &mut self,
        pos: Pos2,
        button: PointerButton,
        shift: bool,
        view: &mut impl ViewControl,
    ) -> GestureOutcome {
        if self.is_navigating() {
            return GestureOutcome::Ignored;
        }

        self.gesture = match button {
            PointerButton::Primary => return GestureOutcome::Pick(pos),
            PointerButton::Middle => NavigationGesture::Panning { last: pos },
            PointerButton::Secondary if shift => NavigationGesture::RollRotating { last: pos },
            PointerButton::Secondary => {
                view.rotate_start(pos);
                NavigationGesture::Rotating
            }
            _ => return GestureOutcome::Ignored,
        };
        log::debug!("{} gesture started at {:?}", self.gesture.name(), pos);
        GestureOutcome::Updated
    }

    fn on_pointer_move(&mut self, pos: Pos2, view: &mut impl ViewControl) -> GestureOutcome {
        match &mut self.gesture {
            NavigationGesture::Idle => GestureOutcome::Ignored,
            NavigationGesture::Panning { last } => {
                let delta = pos - *last;
                view.pan(delta.x, delta.y);
                *last = pos;
                GestureOutcome::Redraw
            }
            NavigationGesture::Rotating => {
                view.rotate(pos);
                GestureOutcome::Redraw
            }
            NavigationGesture::RollRotating { last } => {
                let angle = (pos.x - last.x) as f64 * self.config.roll_radians_per_pixel;
                view.turn(angle);
                *last = pos;
                GestureOutcome::Redraw
            }
        }
    }

    fn on_scroll(&mut self, pos: Pos2, delta: i32, view: &mut impl ViewControl) -> GestureOutcome {
        let steps = delta / self.config.wheel_notch.max(1);
        if steps == 0 {
            return GestureOutcome::Ignored;
        }
        let target = pos + vec2(0.0, steps as f32 * self.config.zoom_pixels_per_step);
        view.zoom_at(pos, target);
        GestureOutcome::Redraw
    }
}
