//! Axis pair through the world origin.

use crate::mapper::{ViewTransform, screen_from_world};
use kurbo::{Line, Point, Size};
use peniko::Color;
use peniko::color::Rgba8;
use serde::{Deserialize, Serialize};

/// Colors in config files are CSS color strings; they serialize back as
/// `#rrggbb`, or `#rrggbbaa` when translucent.
mod css_color {
    use peniko::Color;
    use peniko::color::{Rgba8, Srgb, parse_color};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Rgba8, serializer: S) -> Result<S::Ok, S::Error> {
        let hex = if color.a == u8::MAX {
            format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", color.r, color.g, color.b, color.a)
        };
        serializer.serialize_str(&hex)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgba8, D::Error> {
        let css = String::deserialize(deserializer)?;
        let color: Color = parse_color(&css)
            .map_err(|e| D::Error::custom(format!("invalid color {css:?}: {e}")))?
            .to_alpha_color::<Srgb>();
        Ok(color.to_rgba8())
    }
}

/// How the axis pair is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisStyle {
    #[serde(with = "css_color")]
    pub color: Rgba8,
    /// Stroke width in viewport pixels.
    pub width: f64,
    /// Caption for the horizontal axis.
    pub horizontal_label: Option<String>,
    /// Caption for the vertical axis.
    pub vertical_label: Option<String>,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            // #60a5fa
            color: Rgba8 {
                r: 0x60,
                g: 0xa5,
                b: 0xfa,
                a: 0xff,
            },
            width: 4.0,
            horizontal_label: Some("Urgent".to_string()),
            vertical_label: Some("Important".to_string()),
        }
    }
}

impl AxisStyle {
    /// Stroke color for renderers that draw with peniko.
    pub fn peniko_color(&self) -> Color {
        Color::from(self.color)
    }
}

/// The two axis lines for one frame, in viewport space.
///
/// Each line spans the whole viewport along its direction, so the axes read
/// as unbounded at any zoom or pan.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisOverlay {
    /// World origin in viewport space.
    pub origin: Point,
    pub horizontal: Line,
    pub vertical: Line,
    viewport: Size,
}

impl AxisOverlay {
    /// Axis lines for `view` over a viewport of `viewport` size.
    pub fn new(view: &ViewTransform, viewport: Size) -> Self {
        let origin = screen_from_world(view, Point::ZERO);
        Self {
            origin,
            horizontal: Line::new((0.0, origin.y), (viewport.width, origin.y)),
            vertical: Line::new((origin.x, 0.0), (origin.x, viewport.height)),
            viewport,
        }
    }

    /// Check if the horizontal axis crosses the viewport.
    pub fn horizontal_visible(&self) -> bool {
        (0.0..=self.viewport.height).contains(&self.origin.y)
    }

    /// Check if the vertical axis crosses the viewport.
    pub fn vertical_visible(&self) -> bool {
        (0.0..=self.viewport.width).contains(&self.origin.x)
    }
}
