/// Error type for gateway operations.
#[derive(Debug)]
pub enum GatewayError {
    /// The gateway was used before its initializer completed.
    NotReady,
    /// Gateway construction failed (bad storage URL, client build failure).
    Init(String),
    NotFound {
        path: String,
    },
    InvalidPath {
        path: String,
    },
    Io {
        path: String,
        source: std::io::Error,
    },
    Http {
        path: String,
        message: String,
        source: Option<reqwest::Error>,
    },
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound { .. })
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            GatewayError::NotReady | GatewayError::Init(_) => None,
            GatewayError::NotFound { path }
            | GatewayError::InvalidPath { path }
            | GatewayError::Io { path, .. }
            | GatewayError::Http { path, .. }
            | GatewayError::Parse { path, .. } => Some(path),
        }
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::NotReady => write!(f, "gateway used before initialization"),
            GatewayError::Init(msg) => write!(f, "gateway initialization failed: {msg}"),
            GatewayError::NotFound { path } => write!(f, "object not found: {path}"),
            GatewayError::InvalidPath { path } => write!(f, "invalid storage path: {path:?}"),
            GatewayError::Io { path, source } => write!(f, "failed to read {path}: {source}"),
            GatewayError::Http { path, message, .. } => {
                write!(f, "request for {path} failed: {message}")
            }
            GatewayError::Parse { path, source } => {
                write!(f, "malformed JSON in {path}: {source}")
            }
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::Io { source, .. } => Some(source),
            GatewayError::Http {
                source: Some(source),
                ..
            } => Some(source),
            GatewayError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}
