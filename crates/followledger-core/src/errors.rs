use thiserror::Error;

/// Result type alias using LedgerError
pub type Result<T> = std::result::Result<T, LedgerError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in FollowLedger. Each kind maps to a stable error code that can be used
/// for programmatic error handling, testing, and exit diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    InvalidConfig,
    NotFound,

    // Document / enrichment source
    /// Document bytes are not valid JSON or do not match the document shape
    InvalidDocument,
    /// A required structure (e.g. the first snapshot's user list) is absent
    MissingField,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            ExErrorKind::MissingField => "ERR_MISSING_FIELD",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (a username, a file path, a column header)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " ({})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for FollowLedger operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    // ===== Input Errors =====
    /// Input file does not exist or cannot be opened
    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    /// CSV export could not be parsed
    #[error("Invalid CSV in {path}: {reason}")]
    InvalidCsv { path: String, reason: String },

    /// Configuration file could not be parsed
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig { path: String, reason: String },

    // ===== Document Errors =====
    /// A document file does not have the expected JSON shape
    #[error("Invalid document {path}: {reason}")]
    InvalidDocument { path: String, reason: String },

    /// An enrichment source lacks a structure the step depends on
    #[error("{path} is missing expected structure: {structure}")]
    MissingStructure { path: String, structure: String },

    /// No enrichment source was given and none could be found
    #[error("No snapshot_*.json file found in {dir}")]
    NoSnapshotSource { dir: String },

    // ===== Generic Errors =====
    /// Filesystem failure outside of opening inputs
    #[error("IO error during {operation}: {message}")]
    Io { operation: String, message: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl LedgerError {
    /// Wrap a `std::io::Error` raised while performing `operation`
    pub fn io(operation: impl Into<String>, err: std::io::Error) -> Self {
        LedgerError::Io {
            operation: operation.into(),
            message: err.to_string(),
        }
    }
}

/// Conversion from LedgerError to ExError
impl From<LedgerError> for ExError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InputNotFound { path } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(path)
                .with_op("read_input")
                .with_message("Input file not found"),

            LedgerError::InvalidCsv { path, reason } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity_id(path)
                .with_op("load_csv")
                .with_message(reason),

            LedgerError::InvalidConfig { path, reason } => {
                ExError::new(ExErrorKind::InvalidConfig)
                    .with_entity_id(path)
                    .with_op("load_config")
                    .with_message(reason)
            }

            LedgerError::InvalidDocument { path, reason } => {
                ExError::new(ExErrorKind::InvalidDocument)
                    .with_entity_id(path)
                    .with_op("read_document")
                    .with_message(reason)
            }

            LedgerError::MissingStructure { path, structure } => {
                ExError::new(ExErrorKind::MissingField)
                    .with_entity_id(path)
                    .with_op("enrich")
                    .with_message(format!("missing {}", structure))
            }

            LedgerError::NoSnapshotSource { dir } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(dir)
                .with_op("find_snapshot_source")
                .with_message("No snapshot_*.json file found"),

            LedgerError::Io { operation, message } => ExError::new(ExErrorKind::Io)
                .with_op(operation)
                .with_message(message),

            LedgerError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to LedgerError
impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization {
            message: err.to_string(),
        }
    }
}
