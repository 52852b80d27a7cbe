//! Error types for scene construction and simulation runs.

use thiserror::Error;

/// Errors reported by the simulator.
///
/// Configuration and data errors are fatal for the run that triggered them;
/// numerical edge cases (pinned spring endpoints, zero-length springs) are
/// skipped by the solvers and never surface here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Solver name did not match any known solver.
    #[error("unknown solver: {0}")]
    UnknownSolver(String),

    /// A simulation parameter is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Shape input arrays disagree on the vertex count.
    #[error("invalid shape: {field} has {actual} entries, expected {expected}")]
    InvalidShape {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A topology or pinned index points past the vertex arrays.
    #[error("{field} index {index} out of bounds (vertex count: {count})")]
    IndexOutOfBounds {
        field: &'static str,
        index: usize,
        count: usize,
    },

    /// Collider geometry is unusable.
    #[error("invalid collider: {0}")]
    InvalidCollider(String),
}

/// Convenience alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;
