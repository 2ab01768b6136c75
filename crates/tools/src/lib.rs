//! Offline helpers behind the `docview` CLI.

use foundation::{ParticipantId, Rect};
use serde::Serialize;
use streaming::TileSourceDescriptor;
use viewer::{NavEntry, Surface, ViewerError};

/// What the controller drew, collected for printing.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport {
    pub project_title: String,
    pub navigation: Vec<String>,
    pub active: Option<ParticipantId>,
    pub team_name: String,
    pub tiled_images: Vec<TileSourceDescriptor>,
    pub home_bounds: Option<Rect>,
    pub errors: Vec<String>,
}

/// Surface that records into a [`LayoutReport`] instead of drawing.
#[derive(Debug, Default)]
pub struct ReportSurface {
    report: LayoutReport,
}

impl ReportSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> &LayoutReport {
        &self.report
    }
}

impl Surface for ReportSurface {
    fn show_project_title(&mut self, title: &str) {
        self.report.project_title = title.to_string();
    }

    fn show_navigation(&mut self, entries: &[NavEntry]) {
        self.report.navigation = entries.iter().map(NavEntry::display_text).collect();
    }

    fn set_active_entry(&mut self, id: &ParticipantId) {
        self.report.active = Some(id.clone());
    }

    fn show_team_name(&mut self, name: &str) {
        self.report.team_name = name.to_string();
    }

    fn clear_tiles(&mut self) {
        self.report.tiled_images.clear();
        self.report.home_bounds = None;
    }

    fn add_tiled_image(&mut self, descriptor: &TileSourceDescriptor) {
        self.report.tiled_images.push(descriptor.clone());
    }

    fn fit_bounds(&mut self, bounds: Rect) {
        self.report.home_bounds = Some(bounds);
    }

    fn show_error(&mut self, error: &ViewerError) {
        self.report.errors.push(error.to_string());
    }
}

/// Parses `"WIDTHxHEIGHT"`.
pub fn parse_size(raw: &str) -> Option<(u32, u32)> {
    let (w, h) = raw.split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}
