//! Core error types for labsched-core.
//!
//! Every fallible operation in the library reports through this hierarchy.
//! Engine errors (validation, cardinality) are raised before or during
//! assembly and are never swallowed; collaborator errors (roster, store,
//! config, notify) wrap their underlying I/O or parse failure.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for labsched-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Partition invariant violations
    #[error("Cardinality error: {0}")]
    Cardinality(#[from] CardinalityError),

    /// Roster loading errors
    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    /// Schedule store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Notification errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors, raised before any planning happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Time string is not `hours:minutes:seconds`
    #[error("Malformed time '{input}': format should be 'hour:minute:second'")]
    MalformedTime { input: String },

    /// Session length of zero would never advance the planner
    #[error("Session length must be greater than zero")]
    NonPositiveLength,

    /// Time arithmetic left the representable range
    #[error("Time value out of range: {0}")]
    TimeOverflow(String),

    /// Sub-group size is not a positive integer
    #[error("Invalid group size '{input}': must be a positive integer")]
    InvalidGroupSize { input: String },

    /// Address does not look like `local@domain.tld`
    #[error("Invalid email address '{0}'")]
    InvalidEmail(String),

    /// Two parallel sequences disagree in length
    #[error("Length mismatch: {keys} {what} but {values} values")]
    LengthMismatch {
        what: String,
        keys: usize,
        values: usize,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Partition errors. These indicate an internal invariant violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardinalityError {
    /// Chunks cover a different number of indices than the slice holds
    #[error("Partition covers {actual} indices but the session holds {expected} participants")]
    CountMismatch { expected: usize, actual: usize },

    /// A chunk refers past the end of the slice
    #[error("Index {index} out of bounds for session of {len} participants")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Roster loading errors.
#[derive(Error, Debug)]
pub enum RosterError {
    /// Failed to open the roster file
    #[error("Failed to open roster at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited data
    #[error("Failed to parse roster: {0}")]
    Csv(#[from] csv::Error),

    /// Required column absent from the header
    #[error("Roster is missing the '{0}' column")]
    MissingColumn(String),
}

/// Schedule store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read or write the store file
    #[error("Failed to access store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file contents are not a valid store document
    #[error("Store at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize the store
    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The id counter cannot advance past its maximum
    #[error("No schedule ids left after {last}; supply an explicit id")]
    IdsExhausted { last: u64 },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Home/config directory could not be prepared
    #[error("Failed to prepare data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-separated key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Notification delivery errors, reported per recipient.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Participant has no contact address
    #[error("No contact address for '{0}'")]
    UnknownRecipient(String),

    /// Address failed validation
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Transport is missing required settings
    #[error("Notification transport is not configured: {0}")]
    Setup(String),

    /// Transport could not hand the message off
    #[error("Delivery to {recipient} failed: {message}")]
    DeliveryFailed { recipient: String, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
