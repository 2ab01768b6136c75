use std::collections::BTreeMap;

use foundation::ParticipantId;
use layout::{Grid, Placement};
use tracing::debug;

use crate::address::{MIN_LEVEL, TileAddress};
use crate::descriptor::{DescriptorId, TileSourceDescriptor};
use crate::resolve::UrlResolver;

/// Tile-URL functions for the currently displayed tile sources.
///
/// Lookups take `&self` and have no side effects, so the rendering engine may
/// resolve tiles for any number of sources concurrently.
#[derive(Debug)]
pub struct TileUrlRegistry<R> {
    resolver: R,
    tile_root: String,
    next_id: u64,
    entries: BTreeMap<DescriptorId, TileAddress>,
}

impl<R: UrlResolver> TileUrlRegistry<R> {
    pub fn new(resolver: R, tile_root: impl Into<String>) -> Self {
        Self {
            resolver,
            tile_root: tile_root.into().trim_end_matches('/').to_string(),
            next_id: 1,
            entries: BTreeMap::new(),
        }
    }

    /// Drops every registered source. Ids keep counting up.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Registers one placed page and returns its descriptor.
    pub fn register(&mut self, participant: &ParticipantId, placement: &Placement) -> TileSourceDescriptor {
        let id = DescriptorId(self.next_id);
        self.next_id += 1;

        let address = TileAddress::new(participant.clone(), &placement.page);
        let descriptor = TileSourceDescriptor {
            id,
            width: address.width,
            height: address.height,
            tile_size: address.tile_size,
            min_level: MIN_LEVEL,
            max_level: address.max_level,
            x: placement.x,
            y: placement.y,
            placed_width: placement.width,
        };
        debug!(
            id = id.0,
            participant = %participant,
            position = %placement.page.position,
            max_level = address.max_level,
            "registered tile source"
        );
        self.entries.insert(id, address);
        descriptor
    }

    /// Clears the registry and registers every placement of `grid`.
    pub fn replace_with_grid(&mut self, participant: &ParticipantId, grid: &Grid) -> Vec<TileSourceDescriptor> {
        self.clear();
        grid.placements
            .iter()
            .map(|placement| self.register(participant, placement))
            .collect()
    }

    pub fn address(&self, id: DescriptorId) -> Option<&TileAddress> {
        self.entries.get(&id)
    }

    /// Storage path of a tile, `None` for unknown sources or levels.
    pub fn tile_path(&self, id: DescriptorId, level: u32, x: u32, y: u32) -> Option<String> {
        self.address(id)?.tile_path(&self.tile_root, level, x, y)
    }

    /// Public URL of a tile as handed to the rendering engine.
    pub fn tile_url(&self, id: DescriptorId, level: u32, x: u32, y: u32) -> Option<String> {
        let path = self.tile_path(id, level, x, y)?;
        Some(self.resolver.resolve_public_url(&path))
    }

    pub fn level_scale(&self, id: DescriptorId, level: u32) -> Option<f64> {
        Some(self.address(id)?.level_scale(level))
    }
}
