use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Rect::new(0.0, 0.0, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::Rect;

    #[test]
    fn from_size_is_anchored_at_origin() {
        assert_eq!(Rect::from_size(2.0, 1.0), Rect::new(0.0, 0.0, 2.0, 1.0));
        assert_eq!(Rect::default(), Rect::from_size(0.0, 0.0));
    }
}
