//! Deep-zoom pyramid addressing for page tiles.
//!
//! The rendering engine numbers levels from 0 (coarsest) up to `max_level`
//! (full resolution). Tiles in storage are named with the inverted level,
//! `max_level - level`, so storage level 0 is full resolution.

use foundation::{Page, ParticipantId, Position};
use serde::Serialize;

/// Edge length of every tile, in pixels.
pub const TILE_SIZE: u32 = 512;

pub const MIN_LEVEL: u32 = 0;

/// `ceil(log2(max(width, height) / tile_size))`, never below zero.
///
/// Pages that fit in a single tile get a one-level pyramid.
pub fn max_level(width: u32, height: u32, tile_size: u32) -> u32 {
    let longest = u64::from(width.max(height));
    let mut span = u64::from(tile_size.max(1));
    let mut level = 0;
    while span < longest {
        span <<= 1;
        level += 1;
    }
    level
}

/// Canonical tile file name, e.g. `TN03_07_level_2_tile_1_0.png`.
pub fn tile_name(
    participant: &ParticipantId,
    position: Position,
    storage_level: u32,
    x: u32,
    y: u32,
) -> String {
    format!(
        "TN{}_{}_level_{}_tile_{}_{}.png",
        participant.padded(),
        position.padded(),
        storage_level,
        x,
        y
    )
}

/// Components recovered from a canonical tile file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTileName {
    /// Participant id as padded in the name.
    pub participant: String,
    pub position: Position,
    pub storage_level: u32,
    pub x: u32,
    pub y: u32,
}

impl ParsedTileName {
    pub fn parse(name: &str) -> Option<Self> {
        let stem = name.strip_prefix("TN")?.strip_suffix(".png")?;
        let parts: Vec<&str> = stem.split('_').collect();
        let [participant, position, "level", level, "tile", x, y] = parts.as_slice() else {
            return None;
        };
        if participant.is_empty() || !participant.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            participant: participant.to_string(),
            position: Position(position.parse().ok()?),
            storage_level: level.parse().ok()?,
            x: x.parse().ok()?,
            y: y.parse().ok()?,
        })
    }
}

/// Address of one page's tile pyramid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileAddress {
    pub participant: ParticipantId,
    pub position: Position,
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub max_level: u32,
}

impl TileAddress {
    pub fn new(participant: ParticipantId, page: &Page) -> Self {
        Self {
            participant,
            position: page.position,
            width: page.width,
            height: page.height,
            tile_size: TILE_SIZE,
            max_level: max_level(page.width, page.height, TILE_SIZE),
        }
    }

    /// Storage level for an engine level, `None` above `max_level`.
    pub fn storage_level(&self, level: u32) -> Option<u32> {
        self.max_level.checked_sub(level)
    }

    /// Fraction of full resolution at engine `level`: `1 / 2^(max_level - level)`.
    pub fn level_scale(&self, level: u32) -> f64 {
        let exponent = i64::from(level) - i64::from(self.max_level);
        2f64.powi(exponent.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
    }

    pub fn tile_name(&self, level: u32, x: u32, y: u32) -> Option<String> {
        let storage_level = self.storage_level(level)?;
        Some(tile_name(&self.participant, self.position, storage_level, x, y))
    }

    /// `{tile_root}/{tile_name}`.
    pub fn tile_path(&self, tile_root: &str, level: u32, x: u32, y: u32) -> Option<String> {
        let name = self.tile_name(level, x, y)?;
        Some(format!("{}/{}", tile_root.trim_end_matches('/'), name))
    }

    /// Page size in pixels at engine `level`.
    pub fn dimensions_at_level(&self, level: u32) -> Option<(u32, u32)> {
        let shift = self.storage_level(level)?;
        let shrink = |v: u32| -> u32 {
            let divisor = 1u64 << shift.min(63);
            u64::from(v).div_ceil(divisor) as u32
        };
        Some((shrink(self.width), shrink(self.height)))
    }

    /// Number of tile columns and rows present at engine `level` (at least one each).
    pub fn grid_at_level(&self, level: u32) -> Option<(u32, u32)> {
        let (w, h) = self.dimensions_at_level(level)?;
        let t = self.tile_size.max(1);
        Some((w.div_ceil(t).max(1), h.div_ceil(t).max(1)))
    }

    /// Every tile name of the pyramid, coarsest engine level first.
    pub fn all_tile_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for level in MIN_LEVEL..=self.max_level {
            let Some((columns, rows)) = self.grid_at_level(level) else {
                continue;
            };
            for y in 0..rows {
                for x in 0..columns {
                    if let Some(name) = self.tile_name(level, x, y) {
                        names.push(name);
                    }
                }
            }
        }
        names
    }
}
