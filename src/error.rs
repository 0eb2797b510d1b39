use thiserror::Error;

#[derive(Error, Debug)]
pub enum RentalError {
    // Collaborator API errors
    #[error("network error: {0}")]
    Network(String),

    #[error("request failed with HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("record '{0}' not found")]
    NotFound(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("unexpected response: {0}")]
    Envelope(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Validation errors
    #[error("{0}")]
    Validation(String),

    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("invalid sort '{0}', expected one of: default, date-latest, date-oldest, price-low, price-high")]
    InvalidSort(String),

    #[error("invalid role '{0}', expected 'admin' or 'customer'")]
    InvalidRole(String),

    #[error("unknown view '{0}'")]
    UnknownView(String),

    // Configuration and I/O
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// How a list view recovers from an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport or collaborator failure: toast, state unchanged.
    Network,
    /// Rejected input: reported inline, blocks the action only.
    Validation,
    /// Mutation target vanished: toast, then refetch.
    NotFound,
    Other,
}

impl RentalError {
    pub fn invalid_sort(s: String) -> Self {
        RentalError::InvalidSort(s)
    }

    pub fn invalid_role(s: String) -> Self {
        RentalError::InvalidRole(s)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RentalError::Network(_)
            | RentalError::Status { .. }
            | RentalError::Api(_)
            | RentalError::Envelope(_)
            | RentalError::Http(_)
            | RentalError::Json(_) => ErrorKind::Network,
            RentalError::NotFound(_) => ErrorKind::NotFound,
            RentalError::Validation(_)
            | RentalError::MissingField(_)
            | RentalError::PermissionDenied(_)
            | RentalError::InvalidSort(_)
            | RentalError::InvalidRole(_)
            | RentalError::UnknownView(_)
            | RentalError::Config(_)
            | RentalError::Url(_) => ErrorKind::Validation,
            RentalError::Io(_) | RentalError::YamlParse(_) | RentalError::Other(_) => {
                ErrorKind::Other
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RentalError>;
