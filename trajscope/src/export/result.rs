use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a successful export wrote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportOutput {
    /// One still image.
    Single(PathBuf),
    /// Sequence frames, in frame order.
    Sequence(Vec<PathBuf>),
}

impl ExportOutput {
    /// Every written path, in order.
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            Self::Single(p) => std::slice::from_ref(p),
            Self::Sequence(ps) => ps,
        }
    }
}

/// Outcome of one export call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportResult {
    /// Output was written.
    Succeeded {
        /// Written file(s).
        output: ExportOutput,
        /// Option-normalization note, e.g. a shortened duration.
        warning: Option<String>,
    },
    /// Cancelled by the caller; partial output was removed.
    Cancelled,
    /// The export could not complete; partial output was removed.
    Failed {
        /// Underlying cause.
        message: String,
    },
}

impl ExportResult {
    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Whether this is [`ExportResult::Succeeded`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Written paths; empty unless succeeded.
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            Self::Succeeded { output, .. } => output.paths(),
            _ => &[],
        }
    }

    /// The single written path of a still or comparison export.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Succeeded {
                output: ExportOutput::Single(p),
                ..
            } => Some(p),
            _ => None,
        }
    }

    /// Normalization warning of a successful export.
    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Succeeded { warning, .. } => warning.as_deref(),
            _ => None,
        }
    }
}

/// Export controller lifecycle, observable via [`crate::ExportController::state`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "frame", rename_all = "snake_case")]
pub enum ExportState {
    /// No export has run yet.
    #[default]
    Idle,
    /// Checking render preconditions.
    Validating,
    /// Rendering frame `i`.
    Rendering(u64),
    /// Writing frame `i`.
    Writing(u64),
    /// Last export succeeded.
    Succeeded,
    /// Last export was cancelled.
    Cancelled,
    /// Last export failed.
    Failed,
}

impl ExportState {
    /// Whether an export is in progress.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            Self::Validating | Self::Rendering(_) | Self::Writing(_)
        )
    }
}
