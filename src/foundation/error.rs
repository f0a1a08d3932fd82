/// Convenience result type used across rawpipe.
pub type PipeResult<T> = Result<T, PipeError>;

/// Top-level error taxonomy used by catalog, session and pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum PipeError {
    /// A mandatory entry point could not be resolved from an operation unit.
    #[error("operation `{op}` is missing mandatory entry point `{entry}`")]
    MissingEntryPoint {
        /// Operation key of the unit being registered.
        op: String,
        /// Name of the unresolved entry point.
        entry: &'static str,
    },

    /// The operation unit was built against a different host version.
    #[error("operation `{op}` is compiled for host version {unit} (host is {host})")]
    VersionMismatch {
        /// Operation key of the unit being registered.
        op: String,
        /// Version tag reported by the unit.
        unit: i32,
        /// Version tag of the running host.
        host: i32,
    },

    /// The descriptor violates a registration invariant (zero priority,
    /// empty parameter block, oversized key, duplicate key).
    #[error("invalid descriptor for operation `{op}`: {reason}")]
    InvalidDescriptor {
        /// Operation key of the offending unit.
        op: String,
        /// Human-readable invariant that was violated.
        reason: String,
    },

    /// A persisted parameter blob cannot be brought to the running version.
    #[error(
        "cannot migrate `{op}` parameters from version {found} to {current}: no migration available"
    )]
    MigrationUnavailable {
        /// Operation key the blob belongs to.
        op: String,
        /// Version recorded in the blob.
        found: i32,
        /// Version implemented by the running operation.
        current: i32,
    },

    /// Invalid user-provided data (buffer sizes, ranges, indices).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PipeError {
    /// Build a [`PipeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PipeError::InvalidDescriptor`] value.
    pub fn invalid_descriptor(op: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            op: op.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
