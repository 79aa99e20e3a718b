//! Pointer-anchored zoom and drag pan over a [`ViewTransform`].

use crate::mapper::{ViewError, ViewTransform, world_from_screen};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Multiplicative scale change per wheel notch.
pub const DEFAULT_ZOOM_STEP: f64 = 1.2;

/// Direction of a single zoom notch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WheelDirection {
    In,
    Out,
}

impl WheelDirection {
    /// Wheel "up" (negative `delta_y`) zooms in, everything else zooms out.
    pub fn from_delta_y(delta_y: f64) -> Self {
        if delta_y < 0.0 { Self::In } else { Self::Out }
    }
}

/// Optional bounds on the zoom factor, chosen by the host.
///
/// Both bounds are finite, positive and ordered; [`ZoomLimits::new`] and
/// deserialization reject anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawZoomLimits")]
pub struct ZoomLimits {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct RawZoomLimits {
    min: f64,
    max: f64,
}

impl TryFrom<RawZoomLimits> for ZoomLimits {
    type Error = ViewError;

    fn try_from(raw: RawZoomLimits) -> Result<Self, ViewError> {
        Self::new(raw.min, raw.max)
    }
}

impl ZoomLimits {
    /// Create limits, rejecting non-finite, non-positive or inverted bounds.
    pub fn new(min: f64, max: f64) -> Result<Self, ViewError> {
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ViewError::InvalidZoomLimits { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamp a scale into `[min, max]`.
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}

/// Applies zoom and pan gestures to a view transform it does not own.
///
/// Without [`ZoomLimits`] the scale is unbounded in both directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportController {
    zoom_step: f64,
    limits: Option<ZoomLimits>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self {
            zoom_step: DEFAULT_ZOOM_STEP,
            limits: None,
        }
    }
}

impl ViewportController {
    /// Create a controller. `zoom_step` must be finite and greater than 1.
    pub fn new(zoom_step: f64, limits: Option<ZoomLimits>) -> Result<Self, ViewError> {
        if !zoom_step.is_finite() || zoom_step <= 1.0 {
            return Err(ViewError::InvalidZoomStep(zoom_step));
        }
        Ok(Self { zoom_step, limits })
    }

    /// Scale multiplier applied per notch.
    pub fn zoom_step(&self) -> f64 {
        self.zoom_step
    }

    pub fn limits(&self) -> Option<ZoomLimits> {
        self.limits
    }

    /// Zoom one notch, keeping the world point under `pointer` fixed.
    ///
    /// Returns `false` and leaves `view` untouched when no pointer position
    /// is available or the limits leave the scale unchanged. A scale already
    /// outside the limits is never pulled back against the notch direction.
    pub fn zoom_at(
        &self,
        view: &mut ViewTransform,
        pointer: Option<Point>,
        direction: WheelDirection,
    ) -> bool {
        let Some(pointer) = pointer else {
            return false;
        };

        let old_scale = view.scale();
        let mut new_scale = match direction {
            WheelDirection::In => old_scale * self.zoom_step,
            WheelDirection::Out => old_scale / self.zoom_step,
        };
        if let Some(limits) = self.limits {
            new_scale = limits.clamp(new_scale);
        }
        let moves_with_notch = match direction {
            WheelDirection::In => new_scale > old_scale,
            WheelDirection::Out => new_scale < old_scale,
        };
        if !new_scale.is_finite() || new_scale <= 0.0 || !moves_with_notch {
            return false;
        }

        let anchor = world_from_screen(view, pointer);
        let translate = pointer.to_vec2() - anchor.to_vec2() * new_scale;
        view.set(new_scale, translate);

        log::debug!("Zoom {:?} at {:?}: scale {} -> {}", direction, pointer, old_scale, new_scale);
        true
    }

    /// Pan the view by a delta in viewport pixels.
    pub fn pan_by(&self, view: &mut ViewTransform, delta: Vec2) {
        log::trace!("Pan by {:?}", delta);
        view.offset_by(delta);
    }
}
