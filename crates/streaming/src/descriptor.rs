use serde::{Deserialize, Serialize};

/// Identifies a tile source handed to the rendering engine.
///
/// Ids are never reused within a registry, so a late request for a source
/// from a previous selection resolves to nothing instead of a wrong tile.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptorId(pub u64);

/// Immutable description of one page's tile source and its grid placement.
///
/// Carries no behaviour: tile URLs and level scales are looked up in the
/// [`TileUrlRegistry`](crate::TileUrlRegistry) by `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSourceDescriptor {
    pub id: DescriptorId,
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub min_level: u32,
    pub max_level: u32,
    /// Viewport placement of the page's top-left corner.
    pub x: f64,
    pub y: f64,
    /// Width the page is drawn at in viewport units.
    pub placed_width: f64,
}
