//! Error types for the Velum engine.
//!
//! All crates return `VelumResult<T>` from fallible operations.
//! Constraint projection itself never fails; degenerate geometry is
//! skipped locally.

use thiserror::Error;

/// Unified error type for the Velum engine.
#[derive(Debug, Error)]
pub enum VelumError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A mesh description could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    Parse {
        line: usize,
        message: String,
    },

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A particle id does not refer to a live particle.
    #[error("Unknown particle {0}")]
    UnknownParticle(u32),

    /// A mesh id does not refer to a registered mesh.
    #[error("Unknown mesh {0}")]
    UnknownMesh(u32),

    /// The shared simulation lock was poisoned by a panicking holder.
    #[error("Simulation lock poisoned")]
    LockPoisoned,
}

/// Convenience alias for `Result<T, VelumError>`.
pub type VelumResult<T> = Result<T, VelumError>;
