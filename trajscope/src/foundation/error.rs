use crate::guard::Rule;

/// Convenience result type used across trajscope.
pub type TrajResult<T> = Result<T, TrajError>;

/// Top-level error taxonomy used by core APIs.
///
/// Input-file problems are reported as [`crate::LoadFailure`] values and export outcomes as
/// [`crate::ExportResult`]; this type covers the remaining programmatic failures.
#[derive(thiserror::Error, Debug)]
pub enum TrajError {
    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// An `Error`-severity invariant check refused the operation.
    #[error("precondition failed ({rule}): {message}")]
    Precondition {
        /// Rule that rejected the input.
        rule: Rule,
        /// Human-readable description of the breach.
        message: String,
    },

    /// Errors while rasterizing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while encoding a frame into image bytes.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrajError {
    /// Build a [`TrajError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TrajError::Precondition`] value.
    pub fn precondition(rule: Rule, msg: impl Into<String>) -> Self {
        Self::Precondition {
            rule,
            message: msg.into(),
        }
    }

    /// Build a [`TrajError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TrajError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

impl From<std::io::Error> for TrajError {
    fn from(e: std::io::Error) -> Self {
        Self::Other(anyhow::Error::new(e))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
