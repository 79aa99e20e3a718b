//! Construction-time configuration for the canvas engine.

use crate::axis::AxisStyle;
use crate::input::{ClickSettings, DOUBLE_CLICK_DISTANCE, DOUBLE_CLICK_TIME_MS};
use crate::item::{Extension, Item};
use crate::mapper::{ViewError, ViewTransform};
use crate::store::{ItemCollection, StoreError};
use crate::viewport::{DEFAULT_ZOOM_STEP, ViewportController, ZoomLimits};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Viewport size must be positive, got {0}x{1}")]
    InvalidSize(f64, f64),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where world `(0, 0)` sits when the canvas is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OriginPlacement {
    /// Center of the viewport.
    #[default]
    Centered,
    /// Top-left corner of the viewport.
    TopLeft,
}

/// Canvas configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "E: Deserialize<'de>", serialize = "E: Serialize"))]
pub struct CanvasConfig<E = ()> {
    /// Viewport width in pixels.
    pub width: f64,
    /// Viewport height in pixels.
    pub height: f64,
    /// Items present when the canvas is created.
    pub initial_items: Vec<Item<E>>,
    /// Where world `(0, 0)` starts.
    pub origin: OriginPlacement,
    /// Offset of the canvas on the host surface, in screen pixels.
    pub viewport_origin: Point,
    /// Scale multiplier per wheel notch.
    pub zoom_step: f64,
    /// Bounds on the zoom factor. Unbounded when `None`.
    pub zoom_limits: Option<ZoomLimits>,
    /// Maximum time between the presses of a double click.
    pub double_click_ms: u64,
    /// Maximum travel between the presses of a double click, in pixels.
    pub double_click_distance: f64,
    pub axis: AxisStyle,
}

impl<E> Default for CanvasConfig<E> {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            initial_items: Vec::new(),
            origin: OriginPlacement::default(),
            viewport_origin: Point::ZERO,
            zoom_step: DEFAULT_ZOOM_STEP,
            zoom_limits: None,
            double_click_ms: DOUBLE_CLICK_TIME_MS,
            double_click_distance: DOUBLE_CLICK_DISTANCE,
            axis: AxisStyle::default(),
        }
    }
}

impl<E> CanvasConfig<E> {
    /// Default configuration for a viewport of `width` x `height` pixels.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Seed the canvas with `items`.
    pub fn with_items(mut self, items: Vec<Item<E>>) -> Self {
        self.initial_items = items;
        self
    }

    /// Viewport size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl<E: Extension> CanvasConfig<E> {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError>
    where
        E: for<'de> Deserialize<'de>,
    {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::InvalidSize(self.width, self.height));
        }
        self.controller()?;
        ItemCollection::from_items(self.initial_items.clone())?;
        Ok(())
    }

    pub(crate) fn initial_view(&self) -> ViewTransform {
        match self.origin {
            OriginPlacement::Centered => ViewTransform::centered(self.size()),
            OriginPlacement::TopLeft => ViewTransform::IDENTITY,
        }
    }

    pub(crate) fn controller(&self) -> Result<ViewportController, ViewError> {
        ViewportController::new(self.zoom_step, self.zoom_limits)
    }

    pub(crate) fn click_settings(&self) -> ClickSettings {
        ClickSettings {
            double_click_time: Duration::from_millis(self.double_click_ms),
            double_click_distance: self.double_click_distance,
        }
    }
}
