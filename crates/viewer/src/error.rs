use catalog::CatalogError;
use foundation::ParticipantId;
use gateway::GatewayError;

/// Failures surfaced by the viewer.
#[derive(Debug)]
pub enum ViewerError {
    /// The projects configuration could not be read or parsed.
    ConfigLoad(CatalogError),
    /// The gateway was used before its initialization completed.
    GatewayNotReady,
    /// The metadata or roster document could not be fetched.
    DocumentFetch { path: String, source: GatewayError },
    /// The metadata or roster document is malformed.
    Parse(CatalogError),
    NoProjectFound { id: String },
    NoPagesForParticipant { id: ParticipantId },
    UnknownParticipant { id: ParticipantId },
}

impl ViewerError {
    /// Classifies a failure while loading the project documents.
    pub fn from_document(err: CatalogError) -> Self {
        match err {
            CatalogError::Fetch {
                source: GatewayError::NotReady,
                ..
            } => ViewerError::GatewayNotReady,
            CatalogError::Fetch {
                source: GatewayError::Parse { path, source },
                ..
            } => ViewerError::Parse(CatalogError::Parse { path, source }),
            CatalogError::Fetch { path, source } => ViewerError::DocumentFetch { path, source },
            CatalogError::NoProjectFound { id } => ViewerError::NoProjectFound { id },
            other => ViewerError::Parse(other),
        }
    }

    /// Classifies a failure while loading the projects configuration.
    pub fn from_config(err: CatalogError) -> Self {
        match err {
            CatalogError::Fetch {
                source: GatewayError::NotReady,
                ..
            } => ViewerError::GatewayNotReady,
            CatalogError::NoProjectFound { id } => ViewerError::NoProjectFound { id },
            other => ViewerError::ConfigLoad(other),
        }
    }
}

impl std::fmt::Display for ViewerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerError::ConfigLoad(e) => write!(f, "failed to load configuration: {e}"),
            ViewerError::GatewayNotReady => write!(f, "storage gateway is not ready"),
            ViewerError::DocumentFetch { path, source } => {
                write!(f, "failed to fetch {path}: {source}")
            }
            ViewerError::Parse(e) => write!(f, "malformed document: {e}"),
            ViewerError::NoProjectFound { id } => write!(f, "no project found for id {id:?}"),
            ViewerError::NoPagesForParticipant { id } => {
                write!(f, "participant {id} has no pages")
            }
            ViewerError::UnknownParticipant { id } => write!(f, "unknown participant {id}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::ConfigLoad(e) | ViewerError::Parse(e) => Some(e),
            ViewerError::DocumentFetch { source, .. } => Some(source),
            _ => None,
        }
    }
}
