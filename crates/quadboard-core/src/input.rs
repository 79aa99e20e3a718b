//! Pointer event recognition: raw pointer events in, canvas gestures out.

use crate::interaction::GestureTarget;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Default double-click window.
pub const DOUBLE_CLICK_TIME_MS: u64 = 500;
/// Default maximum travel between the two presses of a double click.
pub const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Raw pointer event in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        target: GestureTarget,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        /// `None` when the device reports no pointer position.
        position: Option<Point>,
        delta: Vec2,
    },
    /// Pointer left the canvas.
    Leave,
}

/// Canvas-level gesture recognized from raw events.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// One wheel notch; negative `delta_y` is "up".
    Wheel {
        position: Option<Point>,
        delta_y: f64,
    },
    /// Stage drag frame, in screen pixels.
    Pan { delta: Vec2 },
    DoubleActivation {
        position: Option<Point>,
        target: GestureTarget,
    },
}

/// Thresholds for double-click detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickSettings {
    pub double_click_time: Duration,
    pub double_click_distance: f64,
}

impl Default for ClickSettings {
    fn default() -> Self {
        Self {
            double_click_time: Duration::from_millis(DOUBLE_CLICK_TIME_MS),
            double_click_distance: DOUBLE_CLICK_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Click {
    time: Instant,
    position: Point,
    target: GestureTarget,
}

/// Tracks pointer state between events and turns it into [`Gesture`]s.
#[derive(Debug, Clone)]
pub struct InputState {
    settings: ClickSettings,
    /// Last known pointer position in screen coordinates.
    pointer_position: Option<Point>,
    /// Last position seen while dragging the stage.
    pan_anchor: Option<Point>,
    /// Last left press, for double-click detection.
    last_click: Option<Click>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(ClickSettings::default())
    }
}

impl InputState {
    /// Create input state with the given double-click thresholds.
    pub fn new(settings: ClickSettings) -> Self {
        Self {
            settings,
            pointer_position: None,
            pan_anchor: None,
            last_click: None,
        }
    }

    /// Last known pointer position.
    pub fn pointer_position(&self) -> Option<Point> {
        self.pointer_position
    }

    /// Whether a stage drag is in progress.
    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// Process a pointer event at the current time.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Vec<Gesture> {
        self.handle_pointer_event_at(event, Instant::now())
    }

    /// Process a pointer event that happened at `now`.
    pub fn handle_pointer_event_at(&mut self, event: PointerEvent, now: Instant) -> Vec<Gesture> {
        let mut gestures = Vec::new();
        match event {
            PointerEvent::Down {
                position,
                button,
                target,
            } => {
                self.pointer_position = Some(position);
                if button != MouseButton::Left {
                    return gestures;
                }

                if self.is_double_click(now, position, &target) {
                    // Reset so a triple click is not a second double click
                    self.last_click = None;
                    gestures.push(Gesture::DoubleActivation {
                        position: Some(position),
                        target: target.clone(),
                    });
                } else {
                    self.last_click = Some(Click {
                        time: now,
                        position,
                        target: target.clone(),
                    });
                }

                // Only empty canvas drags the stage; item drags belong to the host
                if target == GestureTarget::Canvas {
                    self.pan_anchor = Some(position);
                }
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = Some(position);
                if button == MouseButton::Left {
                    self.pan_anchor = None;
                }
            }
            PointerEvent::Move { position } => {
                self.pointer_position = Some(position);
                // Hover moves and item drags leave the anchor unset
                if let Some(anchor) = self.pan_anchor {
                    self.pan_anchor = Some(position);
                    let delta = position - anchor;
                    if delta != Vec2::ZERO {
                        gestures.push(Gesture::Pan { delta });
                    }
                }
            }
            PointerEvent::Scroll { position, delta } => {
                if position.is_some() {
                    self.pointer_position = position;
                }
                gestures.push(Gesture::Wheel {
                    position,
                    delta_y: delta.y,
                });
            }
            PointerEvent::Leave => {
                self.pointer_position = None;
                self.pan_anchor = None;
            }
        }
        gestures
    }

    fn is_double_click(&self, now: Instant, position: Point, target: &GestureTarget) -> bool {
        let Some(last) = &self.last_click else {
            return false;
        };
        let elapsed = now.saturating_duration_since(last.time);
        elapsed < self.settings.double_click_time
            && position.distance(last.position) < self.settings.double_click_distance
            && &last.target == target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemId;

    fn down(x: f64, y: f64, target: GestureTarget) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
            target,
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::default();
        let t0 = Instant::now();

        assert!(input.handle_pointer_event_at(down(100.0, 100.0, GestureTarget::Canvas), t0).is_empty());
        input.handle_pointer_event_at(up(100.0, 100.0), t0);

        let gestures = input.handle_pointer_event_at(
            down(101.0, 100.0, GestureTarget::Canvas),
            t0 + Duration::from_millis(200),
        );
        assert_eq!(
            gestures,
            vec![Gesture::DoubleActivation {
                position: Some(Point::new(101.0, 100.0)),
                target: GestureTarget::Canvas,
            }]
        );
    }

    #[test]
    fn test_triple_click_is_one_double_click() {
        let mut input = InputState::default();
        let t0 = Instant::now();
        let mut count = 0;
        for i in 0..3 {
            let at = t0 + Duration::from_millis(100 * i);
            count += input
                .handle_pointer_event_at(down(10.0, 10.0, GestureTarget::Canvas), at)
                .len();
            input.handle_pointer_event_at(up(10.0, 10.0), at);
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn test_double_click_too_slow() {
        let mut input = InputState::default();
        let t0 = Instant::now();
        input.handle_pointer_event_at(down(10.0, 10.0, GestureTarget::Canvas), t0);
        input.handle_pointer_event_at(up(10.0, 10.0), t0);
        let gestures = input.handle_pointer_event_at(
            down(10.0, 10.0, GestureTarget::Canvas),
            t0 + Duration::from_millis(800),
        );
        assert!(gestures.is_empty());
    }

    #[test]
    fn test_double_click_too_far() {
        let mut input = InputState::default();
        let t0 = Instant::now();
        input.handle_pointer_event_at(down(100.0, 100.0, GestureTarget::Canvas), t0);
        input.handle_pointer_event_at(up(100.0, 100.0), t0);
        let gestures = input.handle_pointer_event_at(
            down(200.0, 200.0, GestureTarget::Canvas),
            t0 + Duration::from_millis(50),
        );
        assert!(gestures.is_empty());
    }

    #[test]
    fn test_double_click_on_item_reports_item_target() {
        let mut input = InputState::default();
        let t0 = Instant::now();
        let target = GestureTarget::Item(ItemId::new("a"));
        input.handle_pointer_event_at(down(5.0, 5.0, target.clone()), t0);
        input.handle_pointer_event_at(up(5.0, 5.0), t0);
        let gestures =
            input.handle_pointer_event_at(down(5.0, 5.0, target.clone()), t0 + Duration::from_millis(10));
        assert_eq!(
            gestures,
            vec![Gesture::DoubleActivation {
                position: Some(Point::new(5.0, 5.0)),
                target,
            }]
        );
    }

    #[test]
    fn test_clicks_on_different_targets_are_not_a_double_click() {
        let mut input = InputState::default();
        let t0 = Instant::now();
        input.handle_pointer_event_at(down(5.0, 5.0, GestureTarget::Item(ItemId::new("a"))), t0);
        input.handle_pointer_event_at(up(5.0, 5.0), t0);
        let gestures = input.handle_pointer_event_at(
            down(5.0, 5.0, GestureTarget::Canvas),
            t0 + Duration::from_millis(10),
        );
        assert!(gestures.is_empty());
    }

    #[test]
    fn test_canvas_drag_pans() {
        let mut input = InputState::default();
        input.handle_pointer_event(down(100.0, 100.0, GestureTarget::Canvas));
        assert!(input.is_panning());

        let gestures = input.handle_pointer_event(PointerEvent::Move {
            position: Point::new(150.0, 120.0),
        });
        assert_eq!(gestures, vec![Gesture::Pan { delta: Vec2::new(50.0, 20.0) }]);

        let gestures = input.handle_pointer_event(PointerEvent::Move {
            position: Point::new(140.0, 120.0),
        });
        assert_eq!(gestures, vec![Gesture::Pan { delta: Vec2::new(-10.0, 0.0) }]);

        input.handle_pointer_event(up(140.0, 120.0));
        assert!(!input.is_panning());
        let gestures = input.handle_pointer_event(PointerEvent::Move {
            position: Point::new(0.0, 0.0),
        });
        assert!(gestures.is_empty());
    }

    #[test]
    fn test_item_drag_does_not_pan() {
        let mut input = InputState::default();
        input.handle_pointer_event(down(100.0, 100.0, GestureTarget::Item(ItemId::new("a"))));
        for x in [150.0, 250.0, 400.0] {
            let gestures = input.handle_pointer_event(PointerEvent::Move {
                position: Point::new(x, 120.0),
            });
            assert!(gestures.is_empty());
            assert!(!input.is_panning());
        }
    }

    #[test]
    fn test_hover_does_not_pan() {
        let mut input = InputState::default();
        for (x, y) in [(10.0, 10.0), (60.0, 40.0), (-30.0, 500.0)] {
            let gestures = input.handle_pointer_event(PointerEvent::Move {
                position: Point::new(x, y),
            });
            assert!(gestures.is_empty());
        }
        assert!(!input.is_panning());
        assert_eq!(input.pointer_position(), Some(Point::new(-30.0, 500.0)));
    }

    #[test]
    fn test_right_button_drag_does_not_pan() {
        let mut input = InputState::default();
        input.handle_pointer_event(PointerEvent::Down {
            position: Point::new(0.0, 0.0),
            button: MouseButton::Right,
            target: GestureTarget::Canvas,
        });
        let gestures = input.handle_pointer_event(PointerEvent::Move {
            position: Point::new(30.0, 30.0),
        });
        assert!(gestures.is_empty());
    }

    #[test]
    fn test_scroll_produces_wheel() {
        let mut input = InputState::default();
        let gestures = input.handle_pointer_event(PointerEvent::Scroll {
            position: Some(Point::new(400.0, 300.0)),
            delta: Vec2::new(0.0, -120.0),
        });
        assert_eq!(
            gestures,
            vec![Gesture::Wheel {
                position: Some(Point::new(400.0, 300.0)),
                delta_y: -120.0,
            }]
        );
        assert_eq!(input.pointer_position(), Some(Point::new(400.0, 300.0)));
    }

    #[test]
    fn test_leave_ends_pan_and_forgets_pointer() {
        let mut input = InputState::default();
        input.handle_pointer_event(down(1.0, 1.0, GestureTarget::Canvas));
        input.handle_pointer_event(PointerEvent::Leave);
        assert!(!input.is_panning());
        assert_eq!(input.pointer_position(), None);
    }
}
