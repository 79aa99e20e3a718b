//! Quadboard Core Library
//!
//! Headless engine for a zoomable, pannable quadrant canvas. Items are placed
//! by world coordinate and drawn by the host through [`ItemRenderer`] and
//! [`EditSessionRenderer`]; the engine owns the view transform, the edit
//! session state and the item collection.

pub mod axis;
pub mod config;
pub mod engine;
pub mod input;
pub mod interaction;
pub mod item;
pub mod mapper;
pub mod quadrant;
pub mod store;
pub mod viewport;

pub use axis::{AxisOverlay, AxisStyle};
pub use config::{CanvasConfig, ConfigError, OriginPlacement};
pub use engine::{CanvasEngine, EditSessionRenderer, Frame, ItemRenderer, SessionControl};
pub use input::{Gesture, InputState, MouseButton, PointerEvent};
pub use interaction::{EditSession, GestureTarget, IgnoreReason, InteractionState, SessionOutcome, Transition};
pub use item::{Extension, Item, ItemId, ItemPatch};
pub use mapper::{ViewError, ViewTransform, screen_from_world, world_from_screen};
pub use quadrant::Quadrant;
pub use store::{Dispatcher, ItemCollection, ItemCommand, StoreError};
pub use viewport::{ViewportController, WheelDirection, ZoomLimits};
