use std::fmt;
use std::path::PathBuf;

use crate::storage::lock::LockError;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ProjectNotFound,
    TaskNotFound,
    InvalidStatusValue,
    InvalidOrderTarget,
    EmptyField,
    HttpTransport,
    HttpStatus,
    DecodeFailed,
    SnapshotIo,
    SnapshotCorrupt,
    LockContention,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::ProjectNotFound => "E2001",
            Self::TaskNotFound => "E2002",
            Self::InvalidStatusValue => "E2003",
            Self::InvalidOrderTarget => "E2004",
            Self::EmptyField => "E2005",
            Self::HttpTransport => "E4001",
            Self::HttpStatus => "E4002",
            Self::DecodeFailed => "E4003",
            Self::SnapshotIo => "E5001",
            Self::SnapshotCorrupt => "E5002",
            Self::LockContention => "E5003",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in the plank config.toml and retry."),
            Self::ProjectNotFound => Some("Check the project id with `pk project list`."),
            Self::TaskNotFound => Some("Check the task id with `pk task list`."),
            Self::InvalidStatusValue => Some("Use one of: todo, in-progress, done."),
            Self::InvalidOrderTarget | Self::EmptyField => None,
            Self::HttpTransport => {
                Some("Check the API URL and network, or run with --local to work offline.")
            }
            Self::HttpStatus => Some("The server rejected the request; see the status code."),
            Self::DecodeFailed => Some("The server response did not match the expected shape."),
            Self::SnapshotIo => Some("Check disk space and permissions on the data directory."),
            Self::SnapshotCorrupt => {
                Some("Move the snapshot file aside to start from sample data.")
            }
            Self::LockContention => Some("Retry after the other pk process releases its lock."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// All failures the state layer can surface to callers.
#[derive(Debug, thiserror::Error)]
pub enum PlankError {
    /// Config file exists but does not parse.
    #[error("failed to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Config file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No project with the given id.
    #[error("project '{id}' not found")]
    ProjectNotFound { id: String },

    /// No task with the given id.
    #[error("task '{id}' not found")]
    TaskNotFound { id: String },

    /// A status string outside the fixed enumeration.
    #[error(transparent)]
    InvalidStatus(#[from] crate::model::ParseStatusError),

    /// A move targeting position 0 (positions are 1-based).
    #[error("invalid column position {position}; positions start at 1")]
    InvalidOrderTarget { position: u32 },

    /// A required text field was empty after trimming.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// The request never produced a response.
    #[error("request to {url} failed: {detail}")]
    Transport { url: String, detail: String },

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The response body did not decode into the expected shape.
    #[error("failed to decode response from {url}: {detail}")]
    Decode { url: String, detail: String },

    /// Reading or writing the snapshot file failed.
    #[error("snapshot I/O error at {}: {source}", path.display())]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot file exists but is not valid JSON for the model.
    #[error("corrupt snapshot at {}: {source}", path.display())]
    SnapshotCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot advisory lock could not be acquired.
    #[error(transparent)]
    Lock(#[from] LockError),
}

impl PlankError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ConfigParse { .. } | Self::ConfigIo { .. } => ErrorCode::ConfigParseError,
            Self::ProjectNotFound { .. } => ErrorCode::ProjectNotFound,
            Self::TaskNotFound { .. } => ErrorCode::TaskNotFound,
            Self::InvalidStatus(_) => ErrorCode::InvalidStatusValue,
            Self::InvalidOrderTarget { .. } => ErrorCode::InvalidOrderTarget,
            Self::EmptyField { .. } => ErrorCode::EmptyField,
            Self::Transport { .. } => ErrorCode::HttpTransport,
            Self::Status { .. } => ErrorCode::HttpStatus,
            Self::Decode { .. } => ErrorCode::DecodeFailed,
            Self::SnapshotIo { .. } => ErrorCode::SnapshotIo,
            Self::SnapshotCorrupt { .. } => ErrorCode::SnapshotCorrupt,
            Self::Lock(_) => ErrorCode::LockContention,
        }
    }

    /// Optional remediation hint for operators and agents.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }

    /// Returns `true` if the failure happened below the request/response
    /// contract (the remote never answered usefully), which is what
    /// triggers the fall-back to local state.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PlankError>;
