//! Project, participant and roster model loaded once per viewing session.

pub mod error;
pub mod metadata;
pub mod project;
pub mod roster;

pub use error::*;
pub use metadata::*;
pub use project::*;
pub use roster::*;

use foundation::ParticipantId;
use gateway::Gateway;
use tracing::info;

/// Everything the viewer needs about the current project.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub project: Project,
    pub metadata: MetadataDocument,
    pub roster: Roster,
}

impl Catalog {
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.metadata.participant(id)
    }

    /// Roster entry for `id`, or empty strings when the roster has none.
    pub fn team(&self, id: &ParticipantId) -> TeamInfo {
        self.roster.team(id)
    }
}

/// Fetches the metadata document and then the roster for `project`.
///
/// The two reads are sequential; either failing aborts the load.
pub async fn load_catalog(gateway: &dyn Gateway, project: &Project) -> Result<Catalog, CatalogError> {
    info!(project = %project.id, "loading project documents");

    let metadata_path = project.metadata_path();
    let raw = gateway
        .fetch_json(&metadata_path)
        .await
        .map_err(|source| CatalogError::Fetch {
            path: metadata_path.clone(),
            source,
        })?;
    let metadata = MetadataDocument::from_value(raw, &metadata_path)?;

    let roster_path = project.paths.teams_file.clone();
    let raw = gateway
        .fetch_json(&roster_path)
        .await
        .map_err(|source| CatalogError::Fetch {
            path: roster_path.clone(),
            source,
        })?;
    let roster = Roster::from_value(&raw, &roster_path)?;

    info!(
        project = %project.id,
        participants = metadata.participants.len(),
        teams = roster.teams.len(),
        "project documents loaded"
    );

    Ok(Catalog {
        project: project.clone(),
        metadata,
        roster,
    })
}
