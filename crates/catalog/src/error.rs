use gateway::GatewayError;

#[derive(Debug)]
pub enum CatalogError {
    /// A document could not be fetched from the gateway.
    Fetch { path: String, source: GatewayError },
    /// A document was fetched but does not match its schema.
    Parse {
        path: String,
        source: serde_json::Error,
    },
    /// A document has the wrong overall shape (e.g. not a JSON object).
    Malformed { path: String, reason: String },
    /// `defaultProject` names no configured project.
    NoProjectFound { id: String },
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Fetch { path, source } => write!(f, "failed to fetch {path}: {source}"),
            CatalogError::Parse { path, source } => write!(f, "failed to parse {path}: {source}"),
            CatalogError::Malformed { path, reason } => write!(f, "malformed {path}: {reason}"),
            CatalogError::NoProjectFound { id } => write!(f, "no project configured with id {id:?}"),
            CatalogError::Io { path, source } => write!(f, "failed to read {path}: {source}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Fetch { source, .. } => Some(source),
            CatalogError::Parse { source, .. } => Some(source),
            CatalogError::Io { source, .. } => Some(source),
            CatalogError::Malformed { .. } | CatalogError::NoProjectFound { .. } => None,
        }
    }
}
