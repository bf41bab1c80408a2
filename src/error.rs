use thiserror::Error;

/// Result type for cartpole_dqn operations
pub type Result<T> = std::result::Result<T, DqnError>;

/// Main error type for the crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DqnError {
    /// Invalid dimensions for operations
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Action outside the environment's action space
    #[error("Invalid action {action}: must be less than {max_actions}")]
    InvalidAction {
        action: usize,
        max_actions: usize,
    },

    /// Empty buffer or container
    #[error("Empty buffer: {0}")]
    EmptyBuffer(String),

    /// Numerical computation errors
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Training or environment protocol error
    #[error("Training error: {0}")]
    TrainingError(String),

    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Frame encoding errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl From<bincode::Error> for DqnError {
    fn from(err: bincode::Error) -> Self {
        DqnError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DqnError {
    fn from(err: serde_json::Error) -> Self {
        DqnError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for DqnError {
    fn from(err: ndarray::ShapeError) -> Self {
        DqnError::dimension_mismatch("consistent array shape".to_string(), err.to_string())
    }
}

// Helper functions for common error patterns
impl DqnError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        DqnError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        DqnError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
