//! Quadrant classification of world-space points.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// One of the four regions cut by the axis pair.
///
/// Classification treats "up" on screen as positive, so world `y` is negated:
/// the first quadrant is top-right, numbering runs counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Top-right.
    First,
    /// Top-left.
    Second,
    /// Bottom-left.
    Third,
    /// Bottom-right.
    Fourth,
}

impl Quadrant {
    /// Classify a world point. Points on either axis belong to no quadrant.
    pub fn of(world: Point) -> Option<Self> {
        let x = world.x;
        let y = -world.y;
        if x > 0.0 && y > 0.0 {
            Some(Self::First)
        } else if x < 0.0 && y > 0.0 {
            Some(Self::Second)
        } else if x < 0.0 && y < 0.0 {
            Some(Self::Third)
        } else if x > 0.0 && y < 0.0 {
            Some(Self::Fourth)
        } else {
            None
        }
    }

    /// Get display name for this quadrant.
    pub fn name(self) -> &'static str {
        match self {
            Quadrant::First => "I",
            Quadrant::Second => "II",
            Quadrant::Third => "III",
            Quadrant::Fourth => "IV",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrants_with_y_up() {
        assert_eq!(Quadrant::of(Point::new(10.0, -10.0)), Some(Quadrant::First));
        assert_eq!(Quadrant::of(Point::new(-10.0, -10.0)), Some(Quadrant::Second));
        assert_eq!(Quadrant::of(Point::new(-10.0, 10.0)), Some(Quadrant::Third));
        assert_eq!(Quadrant::of(Point::new(10.0, 10.0)), Some(Quadrant::Fourth));
    }

    #[test]
    fn test_axes_have_no_quadrant() {
        assert_eq!(Quadrant::of(Point::ZERO), None);
        assert_eq!(Quadrant::of(Point::new(5.0, 0.0)), None);
        assert_eq!(Quadrant::of(Point::new(0.0, -5.0)), None);
    }
}
