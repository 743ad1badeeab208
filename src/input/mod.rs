use egui::{Context, Modifiers, MouseWheelUnit, PointerButton, Pos2, Rect};

mod gestures;
pub use gestures::{GestureClassifier, GestureConfig, GestureOutcome, NavigationGesture};

/// Pointer input for the 3D viewport, in viewport-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed
    PointerDown {
        pos: Pos2,
        button: PointerButton,
        modifiers: Modifiers,
    },
    /// Mouse button was released
    PointerUp { pos: Pos2, button: PointerButton },
    /// Mouse moved (with or without buttons pressed)
    PointerMove { pos: Pos2 },
    /// Wheel turned; `delta` uses 120 units per notch, positive away from the user
    Scroll { pos: Pos2, delta: i32 },
    /// The pointer left the window or the window lost focus; any drag in progress is over
    Cancel,
}

/// Handles converting raw egui input into viewport `InputEvent`s
#[derive(Debug)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    wheel_notch: i32,
    wheel_points_per_notch: f32,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(120, 40.0)
    }
}

impl InputHandler {
    pub fn new(wheel_notch: i32, wheel_points_per_notch: f32) -> Self {
        Self {
            last_pointer_pos: None,
            wheel_notch,
            wheel_points_per_notch,
        }
    }

    /// Collects this frame's events for the viewport covering `rect`.
    ///
    /// Presses and wheel turns are only reported while `hovered`; moves and releases
    /// are always reported so a drag that leaves the viewport still ends. Losing the
    /// pointer or the window focus is reported as `Cancel`, since the matching
    /// release may never arrive.
    pub fn process_input(&mut self, ctx: &Context, rect: Rect, hovered: bool) -> Vec<InputEvent> {
        let local = |pos: Pos2| (pos - rect.min).to_pos2();
        let mut events = Vec::new();

        ctx.input(|input| {
            for event in &input.events {
                match event {
                    egui::Event::PointerMoved(pos) => {
                        self.last_pointer_pos = Some(*pos);
                        events.push(InputEvent::PointerMove { pos: local(*pos) });
                    }
                    egui::Event::PointerButton {
                        pos,
                        button,
                        pressed: true,
                        modifiers,
                    } => {
                        if hovered && rect.contains(*pos) {
                            events.push(InputEvent::PointerDown {
                                pos: local(*pos),
                                button: *button,
                                modifiers: *modifiers,
                            });
                        }
                    }
                    egui::Event::PointerButton {
                        pos,
                        button,
                        pressed: false,
                        ..
                    } => {
                        events.push(InputEvent::PointerUp {
                            pos: local(*pos),
                            button: *button,
                        });
                    }
                    egui::Event::MouseWheel { unit, delta, .. } => {
                        let Some(pos) = self.last_pointer_pos.or(input.pointer.hover_pos()) else {
                            continue;
                        };
                        if !(hovered && rect.contains(pos)) {
                            continue;
                        }
                        let delta = self.wheel_delta(*unit, delta.y);
                        if delta != 0 {
                            events.push(InputEvent::Scroll {
                                pos: local(pos),
                                delta,
                            });
                        }
                    }
                    egui::Event::PointerGone => {
                        self.last_pointer_pos = None;
                        events.push(InputEvent::Cancel);
                    }
                    egui::Event::WindowFocused(false) => {
                        events.push(InputEvent::Cancel);
                    }
                    _ => {}
                }
            }
        });

        events
    }

    /// Converts a wheel movement into notch units
    pub fn wheel_delta(&self, unit: MouseWheelUnit, amount: f32) -> i32 {
        let notch = self.wheel_notch as f32;
        let delta = match unit {
            MouseWheelUnit::Point => amount * notch / self.wheel_points_per_notch.max(1.0),
            MouseWheelUnit::Line | MouseWheelUnit::Page => amount * notch,
        };
        delta.round() as i32
    }
}
