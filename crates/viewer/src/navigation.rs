use catalog::Catalog;
use foundation::ParticipantId;
use serde::Serialize;

/// One row of the participant menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub id: ParticipantId,
    /// `TN{id}`.
    pub label: String,
    /// Team short name, empty when the roster has none.
    pub shortname: String,
    pub active: bool,
}

impl NavEntry {
    /// `TN3 - Owls`, or just `TN3 - ` without a short name.
    pub fn display_text(&self) -> String {
        format!("{} - {}", self.label, self.shortname)
    }
}

/// Menu entries in numeric participant order.
pub fn navigation_entries(catalog: &Catalog, active: Option<&ParticipantId>) -> Vec<NavEntry> {
    catalog
        .metadata
        .participant_ids()
        .map(|id| NavEntry {
            id: id.clone(),
            label: id.label(),
            shortname: catalog.team(id).shortname,
            active: active == Some(id),
        })
        .collect()
}
