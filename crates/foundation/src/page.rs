use serde::{Deserialize, Serialize};

use crate::Position;
use crate::number::deserialize_pixels;

/// One scanned page at source resolution.
///
/// Sizes written as whole-number floats (`2480.0`) are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub position: Position,
    #[serde(deserialize_with = "deserialize_pixels")]
    pub width: u32,
    #[serde(deserialize_with = "deserialize_pixels")]
    pub height: u32,
}

impl Page {
    pub fn new(position: i64, width: u32, height: u32) -> Self {
        Self {
            position: Position(position),
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Page;
    use serde_json::json;

    #[test]
    fn float_sizes_are_accepted_when_whole() {
        let page: Page =
            serde_json::from_value(json!({"position": 2, "width": 2480.0, "height": 3508})).unwrap();
        assert_eq!(page, Page::new(2, 2480, 3508));
    }

    #[test]
    fn fractional_or_negative_sizes_are_rejected() {
        assert!(serde_json::from_value::<Page>(json!({"position": 1, "width": 10.5, "height": 1})).is_err());
        assert!(serde_json::from_value::<Page>(json!({"position": 1, "width": -3, "height": 1})).is_err());
    }

    #[test]
    fn negative_positions_are_kept() {
        let page: Page =
            serde_json::from_value(json!({"position": -1, "width": 10, "height": 10})).unwrap();
        assert_eq!(page.position.0, -1);
    }
}
