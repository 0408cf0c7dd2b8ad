//! Error types for the vision classifier client

/// Result type alias using the client's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for client operations.
///
/// Every variant renders as a plain message through `Display`, which is what
/// the view shows to the user.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Deployment is missing a required setting (e.g. no API base URL)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network failure, or a non-2xx status without a usable server message
    #[error("{message}")]
    Transport {
        /// HTTP status, when a response was received
        status: Option<u16>,
        message: String,
    },

    /// Non-2xx status carrying a server-supplied `detail` message
    #[error("{detail}")]
    Api { status: u16, detail: String },

    /// The request was aborted before it resolved
    #[error("request cancelled")]
    Cancelled,

    /// Caller supplied a value outside the accepted domain
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a transport error with no HTTP status (connection, DNS, TLS...)
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: msg.into(),
        }
    }

    /// Create a transport error for a received non-2xx status
    pub fn transport_status(status: u16, msg: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: msg.into(),
        }
    }

    /// Create an API error from a server `detail` message
    pub fn api(status: u16, detail: impl Into<String>) -> Self {
        Self::Api {
            status,
            detail: detail.into(),
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// HTTP status associated with this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this error only reports an aborted request
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Short stable name, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Transport { .. } => "transport",
            Self::Api { .. } => "api",
            Self::Cancelled => "cancelled",
            Self::InvalidInput(_) => "invalid_input",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}
