use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};

/// Accepts any JSON number without a fractional part (`7`, `-1`, `2480.0`).
pub(crate) struct WholeNumber;

impl<'de> Visitor<'de> for WholeNumber {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a whole number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
            Ok(v as i64)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }
}

/// Pixel size: a non-negative whole number that fits in `u32`.
pub(crate) fn deserialize_pixels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let v = deserializer.deserialize_any(WholeNumber)?;
    u32::try_from(v).map_err(|_| de::Error::invalid_value(Unexpected::Signed(v), &"a pixel size"))
}
