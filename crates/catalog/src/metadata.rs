use std::collections::BTreeMap;

pub use foundation::Page;
use foundation::ParticipantId;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::CatalogError;

/// A participant and its pages in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub pages: Vec<Page>,
}

/// Parsed `metadata.json`.
///
/// Participants are kept sorted by numeric id so "first" is well defined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataDocument {
    pub participants: Vec<Participant>,
}

#[derive(Deserialize)]
struct RawMetadata {
    participants: BTreeMap<String, RawParticipant>,
}

#[derive(Deserialize)]
struct RawParticipant {
    #[serde(default)]
    id: Option<RawId>,
    #[serde(default)]
    pages: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Pages that fail to parse are skipped so one bad entry does not hide the participant.
fn parse_pages(participant: &str, raw: Vec<serde_json::Value>) -> Vec<Page> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Page>(value) {
            Ok(page) => Some(page),
            Err(err) => {
                warn!(participant, index, "skipping malformed page: {err}");
                None
            }
        })
        .collect()
}

impl MetadataDocument {
    pub fn new(mut participants: Vec<Participant>) -> Self {
        participants.sort_by(|a, b| a.id.cmp(&b.id));
        Self { participants }
    }

    pub fn from_value(value: serde_json::Value, path: &str) -> Result<Self, CatalogError> {
        let raw: RawMetadata = serde_json::from_value(value).map_err(|source| CatalogError::Parse {
            path: path.to_string(),
            source,
        })?;

        let participants = raw
            .participants
            .into_iter()
            .map(|(key, p)| {
                // The map key is what selections are looked up by.
                if let Some(inner) = p.id.map(RawId::into_string) {
                    if inner != key {
                        warn!(key = %key, id = %inner, "participant id differs from its key; using key");
                    }
                }
                let pages = parse_pages(&key, p.pages);
                Participant {
                    id: ParticipantId::new(key),
                    pages,
                }
            })
            .collect();

        Ok(Self::new(participants))
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// Lowest-numeric-id participant.
    pub fn first_participant(&self) -> Option<&Participant> {
        self.participants.first()
    }

    pub fn participant_ids(&self) -> impl Iterator<Item = &ParticipantId> {
        self.participants.iter().map(|p| &p.id)
    }
}
