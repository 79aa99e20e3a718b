//! Edit session state machine.
//!
//! The canvas is either idle or editing a session anchored where the user
//! double-activated empty canvas. Only the host closes a session.

use crate::item::ItemId;
use crate::mapper::{ViewTransform, world_from_screen};
use crate::quadrant::Quadrant;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What a gesture landed on, as reported by the input layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureTarget {
    /// Empty canvas area.
    Canvas,
    /// An item rendered by the host.
    Item(ItemId),
}

/// Anchor of an open edit session, captured once when it opens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EditSession {
    viewport_point: Point,
    world_point: Point,
}

impl EditSession {
    /// Capture a session at a viewport-space point under the current view.
    pub fn capture(view: &ViewTransform, viewport_point: Point) -> Self {
        Self {
            viewport_point,
            world_point: world_from_screen(view, viewport_point),
        }
    }

    /// Where the gesture happened, in viewport pixels. Anchor for the host's form.
    pub fn viewport_point(&self) -> Point {
        self.viewport_point
    }

    /// Where the new item belongs on the plane.
    pub fn world_point(&self) -> Point {
        self.world_point
    }

    /// Quadrant the session anchor falls in.
    pub fn quadrant(&self) -> Option<Quadrant> {
        Quadrant::of(self.world_point)
    }
}

/// How the host closed a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionOutcome {
    Committed,
    Cancelled,
}

/// Why a gesture did not change the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// The device reported no pointer position.
    NoPointer,
    /// The gesture landed on an item; the host's item handling owns it.
    OnItem,
    /// A session is already open.
    AlreadyEditing,
    /// Close requested with no open session.
    NotEditing,
}

/// Result of feeding one event to the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Opened(EditSession),
    Closed {
        session: EditSession,
        outcome: SessionOutcome,
    },
    Ignored(IgnoreReason),
}

/// Interaction state of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Editing(EditSession),
}

impl InteractionState {
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    /// The open session, if any.
    pub fn session(&self) -> Option<&EditSession> {
        match self {
            Self::Idle => None,
            Self::Editing(session) => Some(session),
        }
    }

    /// Handle a double activation at a viewport-space point.
    pub fn double_activate(
        &mut self,
        view: &ViewTransform,
        pointer: Option<Point>,
        target: &GestureTarget,
    ) -> Transition {
        if self.is_editing() {
            return Transition::Ignored(IgnoreReason::AlreadyEditing);
        }
        if let GestureTarget::Item(_) = target {
            return Transition::Ignored(IgnoreReason::OnItem);
        }
        let Some(pointer) = pointer else {
            return Transition::Ignored(IgnoreReason::NoPointer);
        };

        let session = EditSession::capture(view, pointer);
        *self = Self::Editing(session);
        Transition::Opened(session)
    }

    /// Close the open session, after the host committed its result.
    pub fn commit(&mut self) -> Transition {
        self.close(SessionOutcome::Committed)
    }

    /// Close the open session without a result.
    pub fn cancel(&mut self) -> Transition {
        self.close(SessionOutcome::Cancelled)
    }

    /// Close the open session with `outcome`.
    pub fn close(&mut self, outcome: SessionOutcome) -> Transition {
        match std::mem::take(self) {
            Self::Idle => Transition::Ignored(IgnoreReason::NotEditing),
            Self::Editing(session) => Transition::Closed { session, outcome },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    fn view() -> ViewTransform {
        ViewTransform::new(2.0, Vec2::new(50.0, 50.0)).unwrap()
    }

    #[test]
    fn test_starts_idle() {
        let state = InteractionState::default();
        assert_eq!(state, InteractionState::Idle);
        assert!(state.session().is_none());
    }

    #[test]
    fn test_double_activation_on_canvas_opens_session() {
        let mut state = InteractionState::default();
        let transition =
            state.double_activate(&view(), Some(Point::new(120.0, 80.0)), &GestureTarget::Canvas);

        let Transition::Opened(session) = transition else {
            panic!("expected session to open, got {transition:?}");
        };
        assert_eq!(session.viewport_point(), Point::new(120.0, 80.0));
        assert!((session.world_point().x - 35.0).abs() < f64::EPSILON);
        assert!((session.world_point().y - 15.0).abs() < f64::EPSILON);
        assert_eq!(state.session(), Some(&session));
    }

    #[test]
    fn test_double_activation_on_item_is_ignored() {
        let mut state = InteractionState::default();
        let transition = state.double_activate(
            &view(),
            Some(Point::new(1.0, 1.0)),
            &GestureTarget::Item(ItemId::new("a")),
        );
        assert_eq!(transition, Transition::Ignored(IgnoreReason::OnItem));
        assert_eq!(state, InteractionState::Idle);
    }

    #[test]
    fn test_double_activation_without_pointer_is_ignored() {
        let mut state = InteractionState::default();
        let transition = state.double_activate(&view(), None, &GestureTarget::Canvas);
        assert_eq!(transition, Transition::Ignored(IgnoreReason::NoPointer));
        assert!(!state.is_editing());
    }

    #[test]
    fn test_no_nested_sessions() {
        let mut state = InteractionState::default();
        state.double_activate(&view(), Some(Point::new(10.0, 10.0)), &GestureTarget::Canvas);
        let first = *state.session().unwrap();

        let transition =
            state.double_activate(&view(), Some(Point::new(500.0, 500.0)), &GestureTarget::Canvas);
        assert_eq!(transition, Transition::Ignored(IgnoreReason::AlreadyEditing));
        assert_eq!(state.session(), Some(&first));
    }

    #[test]
    fn test_session_does_not_follow_view_changes() {
        let mut state = InteractionState::default();
        state.double_activate(&view(), Some(Point::new(120.0, 80.0)), &GestureTarget::Canvas);

        let panned = ViewTransform::new(0.5, Vec2::new(-300.0, 7.0)).unwrap();
        let under_pointer_now = world_from_screen(&panned, Point::new(120.0, 80.0));
        let session = state.session().unwrap();
        assert!((under_pointer_now.x - session.world_point().x).abs() > 1.0);
        assert!((session.world_point().x - 35.0).abs() < f64::EPSILON);
        assert_eq!(session.viewport_point(), Point::new(120.0, 80.0));
    }

    #[test]
    fn test_commit_and_cancel_return_to_idle() {
        let mut state = InteractionState::default();
        state.double_activate(&view(), Some(Point::new(50.0, 50.0)), &GestureTarget::Canvas);
        let transition = state.commit();
        assert!(matches!(
            transition,
            Transition::Closed {
                outcome: SessionOutcome::Committed,
                ..
            }
        ));
        assert_eq!(state, InteractionState::Idle);

        state.double_activate(&view(), Some(Point::new(50.0, 50.0)), &GestureTarget::Canvas);
        assert!(matches!(
            state.cancel(),
            Transition::Closed {
                outcome: SessionOutcome::Cancelled,
                ..
            }
        ));
        assert_eq!(state, InteractionState::Idle);
    }

    #[test]
    fn test_close_while_idle_is_ignored() {
        let mut state = InteractionState::default();
        assert_eq!(state.cancel(), Transition::Ignored(IgnoreReason::NotEditing));
        assert_eq!(state.commit(), Transition::Ignored(IgnoreReason::NotEditing));
        assert_eq!(state, InteractionState::Idle);
    }

    #[test]
    fn test_session_quadrant() {
        let session = EditSession::capture(&ViewTransform::IDENTITY, Point::new(-20.0, -30.0));
        assert_eq!(session.quadrant(), Some(Quadrant::Second));
    }
}
