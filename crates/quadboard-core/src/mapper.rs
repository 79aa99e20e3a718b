//! View transform and coordinate conversion between screen, viewport and world space.
//!
//! Screen space is raw pointer coordinates on the host surface. Viewport space
//! is relative to the canvas' top-left corner. World space is the unbounded
//! plane items live on, related to viewport space by a [`ViewTransform`].

use kurbo::{Affine, Point, Size, Vec2};
use serde::Serialize;
use thiserror::Error;

/// View transform errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error("Scale must be finite and positive, got {0}")]
    InvalidScale(f64),
    #[error("Translation must be finite, got ({0}, {1})")]
    InvalidTranslate(f64, f64),
    #[error("Zoom step must be finite and greater than 1, got {0}")]
    InvalidZoomStep(f64),
    #[error("Invalid zoom limits: min {min}, max {max}")]
    InvalidZoomLimits { min: f64, max: f64 },
}

/// Uniform scale plus translation mapping world space onto viewport space.
///
/// `scale` is always finite and strictly positive. Only the viewport
/// controller mutates a transform once it is owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    scale: f64,
    translate: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    /// Scale 1, no translation.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate: Vec2::ZERO,
    };

    /// Create a transform, rejecting a non-positive or non-finite scale.
    pub fn new(scale: f64, translate: Vec2) -> Result<Self, ViewError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ViewError::InvalidScale(scale));
        }
        if !translate.is_finite() {
            return Err(ViewError::InvalidTranslate(translate.x, translate.y));
        }
        Ok(Self { scale, translate })
    }

    /// Identity scale with world `(0, 0)` at the center of a viewport of `size`.
    pub fn centered(size: Size) -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::new(size.width / 2.0, size.height / 2.0),
        }
    }

    /// Current zoom factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current translation in viewport pixels.
    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    pub(crate) fn set(&mut self, scale: f64, translate: Vec2) {
        debug_assert!(scale > 0.0);
        self.scale = scale;
        self.translate = translate;
    }

    pub(crate) fn offset_by(&mut self, delta: Vec2) {
        self.translate += delta;
    }

    /// World to viewport transform, for renderers that draw in world units.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }

    /// Viewport to world transform.
    pub fn to_inverse_affine(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.translate)
    }
}

/// Convert a viewport-space point to world space: `(p - translate) / scale`.
pub fn world_from_screen(view: &ViewTransform, point: Point) -> Point {
    ((point.to_vec2() - view.translate) / view.scale).to_point()
}

/// Convert a world-space point to viewport space: `w * scale + translate`.
pub fn screen_from_world(view: &ViewTransform, point: Point) -> Point {
    (point.to_vec2() * view.scale + view.translate).to_point()
}

/// Convert a raw screen point into viewport space given where the canvas sits.
pub fn viewport_from_screen(viewport_origin: Point, point: Point) -> Point {
    (point - viewport_origin).to_point()
}

/// Inverse of [`viewport_from_screen`].
pub fn screen_from_viewport(viewport_origin: Point, point: Point) -> Point {
    point + viewport_origin.to_vec2()
}
