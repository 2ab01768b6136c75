use foundation::{ParticipantId, Rect};
use streaming::TileSourceDescriptor;

use crate::ViewerError;
use crate::navigation::NavEntry;

/// Everything the controller draws on: navigation chrome and the deep-zoom
/// rendering engine.
///
/// Tile URLs for added images are resolved through the controller's
/// registry by descriptor id.
pub trait Surface {
    fn show_project_title(&mut self, title: &str);
    fn show_navigation(&mut self, entries: &[NavEntry]);
    fn set_active_entry(&mut self, id: &ParticipantId);
    fn show_team_name(&mut self, name: &str);

    /// Removes every tiled image from the rendering engine.
    fn clear_tiles(&mut self);
    fn add_tiled_image(&mut self, descriptor: &TileSourceDescriptor);
    /// Sets the home rectangle and fits the view to it.
    fn fit_bounds(&mut self, bounds: Rect);

    fn show_error(&mut self, error: &ViewerError);
}

/// Surface that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn show_project_title(&mut self, _title: &str) {}
    fn show_navigation(&mut self, _entries: &[NavEntry]) {}
    fn set_active_entry(&mut self, _id: &ParticipantId) {}
    fn show_team_name(&mut self, _name: &str) {}
    fn clear_tiles(&mut self) {}
    fn add_tiled_image(&mut self, _descriptor: &TileSourceDescriptor) {}
    fn fit_bounds(&mut self, _bounds: Rect) {}
    fn show_error(&mut self, _error: &ViewerError) {}
}
