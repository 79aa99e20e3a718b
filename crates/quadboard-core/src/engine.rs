//! Canvas engine: wires input to the view and session state and drives the
//! host's renderers over the current items.

use crate::axis::{AxisOverlay, AxisStyle};
use crate::config::{CanvasConfig, ConfigError};
use crate::input::{Gesture, InputState, PointerEvent};
use crate::interaction::{EditSession, GestureTarget, InteractionState, SessionOutcome, Transition};
use crate::item::{Extension, Item};
use crate::mapper::{ViewTransform, viewport_from_screen, world_from_screen};
use crate::store::{Dispatcher, ItemCollection, ItemCommand};
use crate::viewport::{ViewportController, WheelDirection};
use kurbo::{Point, Size};
use std::fmt;

/// Renders one item. Called once per item per render pass.
pub trait ItemRenderer<E: Extension> {
    type Output;

    fn render_item(&mut self, item: &Item<E>, dispatch: &mut Dispatcher<E>) -> Self::Output;
}

impl<E, F, R> ItemRenderer<E> for F
where
    E: Extension,
    F: FnMut(&Item<E>, &mut Dispatcher<E>) -> R,
{
    type Output = R;

    fn render_item(&mut self, item: &Item<E>, dispatch: &mut Dispatcher<E>) -> R {
        self(item, dispatch)
    }
}

/// Renders the edit form for the open session. Only called while editing.
pub trait EditSessionRenderer<E: Extension> {
    type Output;

    fn render_edit_session(
        &mut self,
        session: &EditSession,
        control: &mut SessionControl,
        dispatch: &mut Dispatcher<E>,
    ) -> Self::Output;
}

impl<E, F, R> EditSessionRenderer<E> for F
where
    E: Extension,
    F: FnMut(&EditSession, &mut SessionControl, &mut Dispatcher<E>) -> R,
{
    type Output = R;

    fn render_edit_session(
        &mut self,
        session: &EditSession,
        control: &mut SessionControl,
        dispatch: &mut Dispatcher<E>,
    ) -> R {
        self(session, control, dispatch)
    }
}

/// Lets the edit-session renderer close its own session.
///
/// The request takes effect after the render pass, once the commands
/// dispatched in the same pass have been applied.
#[derive(Debug, Default)]
pub struct SessionControl {
    request: Option<SessionOutcome>,
}

impl SessionControl {
    /// Close the session after committing its result.
    pub fn commit(&mut self) {
        self.request = Some(SessionOutcome::Committed);
    }

    /// Close the session without a result.
    pub fn cancel(&mut self) {
        self.request = Some(SessionOutcome::Cancelled);
    }

    /// The close requested during this pass, if any.
    pub fn requested(&self) -> Option<SessionOutcome> {
        self.request
    }
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<I, S> {
    pub axes: AxisOverlay,
    /// One entry per item, in collection order.
    pub items: Vec<I>,
    /// Present only while a session is open.
    pub edit_session: Option<S>,
}

/// Observer fired when a double activation opens a session.
pub type SessionObserver = Box<dyn FnMut(&EditSession)>;

/// The interactive canvas: view transform, session state and items.
pub struct CanvasEngine<E: Extension = ()> {
    viewport_size: Size,
    viewport_origin: Point,
    view: ViewTransform,
    controller: ViewportController,
    interaction: InteractionState,
    input: InputState,
    items: ItemCollection<E>,
    axis_style: AxisStyle,
    on_double_activation: Option<SessionObserver>,
}

impl<E: Extension> fmt::Debug for CanvasEngine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasEngine")
            .field("viewport_size", &self.viewport_size)
            .field("view", &self.view)
            .field("interaction", &self.interaction)
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}

impl<E: Extension> CanvasEngine<E> {
    /// Create an engine from a validated configuration.
    pub fn new(config: CanvasConfig<E>) -> Result<Self, ConfigError> {
        config.validate()?;
        let view = config.initial_view();
        let controller = config.controller()?;
        let input = InputState::new(config.click_settings());
        let items = ItemCollection::from_items(config.initial_items)?;
        log::debug!(
            "Canvas created: {}x{}, {} items",
            config.width,
            config.height,
            items.len()
        );
        Ok(Self {
            viewport_size: Size::new(config.width, config.height),
            viewport_origin: config.viewport_origin,
            view,
            controller,
            interaction: InteractionState::Idle,
            input,
            items,
            axis_style: config.axis,
            on_double_activation: None,
        })
    }

    /// Register the observer fired whenever a session opens.
    pub fn set_double_activation_observer(&mut self, observer: impl FnMut(&EditSession) + 'static) {
        self.on_double_activation = Some(Box::new(observer));
    }

    /// Current view transform.
    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// Change the viewport size. The view itself does not move.
    pub fn resize(&mut self, size: Size) {
        if size.width > 0.0 && size.height > 0.0 {
            self.viewport_size = size;
        } else {
            log::debug!("Ignoring resize to {:?}", size);
        }
    }

    /// Move the canvas on the host surface.
    pub fn set_viewport_origin(&mut self, origin: Point) {
        self.viewport_origin = origin;
    }

    /// Current item snapshot.
    pub fn items(&self) -> &ItemCollection<E> {
        &self.items
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// The open edit session, if any.
    pub fn session(&self) -> Option<&EditSession> {
        self.interaction.session()
    }

    pub fn axis_style(&self) -> &AxisStyle {
        &self.axis_style
    }

    /// World point under a screen-space position.
    pub fn world_at(&self, screen: Point) -> Point {
        world_from_screen(&self.view, viewport_from_screen(self.viewport_origin, screen))
    }

    /// Feed a raw pointer event, applying every gesture it completes.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        for gesture in self.input.handle_pointer_event(event) {
            self.apply_gesture(gesture);
        }
    }

    /// Apply an already recognized gesture. Positions are in screen space.
    pub fn apply_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Wheel { position, delta_y } => {
                let pointer = position.map(|p| viewport_from_screen(self.viewport_origin, p));
                self.controller
                    .zoom_at(&mut self.view, pointer, WheelDirection::from_delta_y(delta_y));
            }
            Gesture::Pan { delta } => {
                self.controller.pan_by(&mut self.view, delta);
            }
            Gesture::DoubleActivation { position, target } => {
                self.double_activate(position, &target);
            }
        }
    }

    /// Double activation at a screen-space position.
    pub fn double_activate(&mut self, position: Option<Point>, target: &GestureTarget) -> Transition {
        let pointer = position.map(|p| viewport_from_screen(self.viewport_origin, p));
        let transition = self.interaction.double_activate(&self.view, pointer, target);
        match &transition {
            Transition::Opened(session) => {
                log::debug!(
                    "Edit session opened at viewport {:?}, world {:?}",
                    session.viewport_point(),
                    session.world_point()
                );
                if let Some(observer) = self.on_double_activation.as_mut() {
                    observer(session);
                }
            }
            Transition::Ignored(reason) => {
                log::debug!("Double activation ignored: {:?}", reason);
            }
            Transition::Closed { .. } => {}
        }
        transition
    }

    /// Close the open session after the host committed its result.
    pub fn commit_session(&mut self) -> Transition {
        self.close_session(SessionOutcome::Committed)
    }

    /// Close the open session without a result.
    pub fn cancel_session(&mut self) -> Transition {
        self.close_session(SessionOutcome::Cancelled)
    }

    /// Close the open session with `outcome`.
    pub fn close_session(&mut self, outcome: SessionOutcome) -> Transition {
        let transition = self.interaction.close(outcome);
        if let Transition::Closed { session, outcome } = &transition {
            log::debug!("Edit session {:?} at world {:?}", outcome, session.world_point());
        }
        transition
    }

    /// Apply a command to the items immediately.
    pub fn dispatch(&mut self, command: ItemCommand<E>) {
        self.items = self.items.reduce(command);
    }

    /// Run one render pass.
    ///
    /// Renderers see the snapshot taken at the start of the pass. Commands they
    /// dispatch are applied in order when the pass ends, then any session close
    /// requested through [`SessionControl`].
    pub fn render<R, S>(
        &mut self,
        item_renderer: &mut R,
        session_renderer: &mut S,
    ) -> Frame<R::Output, S::Output>
    where
        R: ItemRenderer<E>,
        S: EditSessionRenderer<E>,
    {
        let snapshot = self.items.clone();
        let axes = AxisOverlay::new(&self.view, self.viewport_size);
        let mut dispatcher = Dispatcher::new();

        let items = snapshot
            .iter()
            .map(|item| item_renderer.render_item(item, &mut dispatcher))
            .collect();

        let mut control = SessionControl::default();
        let edit_session = self
            .interaction
            .session()
            .copied()
            .map(|session| session_renderer.render_edit_session(&session, &mut control, &mut dispatcher));

        if !dispatcher.is_empty() {
            log::trace!("Applying {} commands from render pass", dispatcher.len());
            self.items = dispatcher.flush(&self.items);
        }
        if let Some(outcome) = control.requested() {
            self.close_session(outcome);
        }

        Frame {
            axes,
            items,
            edit_session,
        }
    }
}
