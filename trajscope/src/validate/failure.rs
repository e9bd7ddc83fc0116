use std::fmt;

/// Which validation stage rejected the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The path does not exist.
    NotFound,
    /// The file has zero bytes.
    EmptyFile,
    /// The file exceeds the size limit.
    TooLarge,
    /// The file does not carry the expected extension.
    WrongType,
    /// Reading failed.
    Unreadable,
    /// Reading was refused by the OS.
    AccessDenied,
    /// The content is only whitespace.
    EmptyContent,
    /// The content stops before its closing token.
    Truncated,
    /// The content is not valid JSON (or does not fit the run shape).
    InvalidFormat,
    /// The document parsed to `null`.
    ParseProducedNothing,
    /// The document violates the run schema.
    SchemaMismatch,
}

/// A diagnosed load failure, ready to show to a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadFailure {
    /// Failing stage.
    pub kind: FailureKind,
    /// Short headline.
    pub title: String,
    /// Explanation of what went wrong.
    pub message: String,
    /// Ordered, actionable next steps.
    pub suggestions: Vec<String>,
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl std::error::Error for LoadFailure {}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn mib(bytes: u64) -> String {
    format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
}

impl LoadFailure {
    pub(crate) fn new(
        kind: FailureKind,
        title: &str,
        message: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            kind,
            title: title.to_owned(),
            message: message.into(),
            suggestions,
        }
    }

    pub(crate) fn not_found(path: &str) -> Self {
        Self::new(
            FailureKind::NotFound,
            "File not found",
            format!("'{path}' does not exist."),
            owned(&[
                "Check the path for typos.",
                "Make sure the recording finished writing before opening it.",
            ]),
        )
    }

    pub(crate) fn empty_file(path: &str) -> Self {
        Self::new(
            FailureKind::EmptyFile,
            "Empty file",
            format!("'{path}' contains no data (0 bytes)."),
            owned(&[
                "Re-export the run from the training script.",
                "Check that the recorder flushed its output before exiting.",
            ]),
        )
    }

    pub(crate) fn too_large(size: u64, limit: u64) -> Self {
        Self::new(
            FailureKind::TooLarge,
            "File too large",
            format!(
                "The file is {} ({size} bytes); the limit is {} ({limit} bytes).",
                mib(size),
                mib(limit)
            ),
            owned(&[
                "Record fewer timesteps or subsample the trajectory.",
                "Split the run into several files.",
            ]),
        )
    }

    pub(crate) fn wrong_type(found: Option<&str>, expected: &str) -> Self {
        let found = found.map_or_else(|| "no extension".to_owned(), |e| format!("'.{e}'"));
        Self::new(
            FailureKind::WrongType,
            "Unsupported file type",
            format!("Expected a '.{expected}' file, found {found}."),
            vec![
                format!("Export the run as .{expected}."),
                "Rename the file if it already contains run JSON.".to_owned(),
            ],
        )
    }

    pub(crate) fn unreadable(detail: impl fmt::Display) -> Self {
        Self::new(
            FailureKind::Unreadable,
            "Could not read file",
            format!("Reading failed: {detail}."),
            owned(&[
                "Check that the file is not being written or moved.",
                "Make sure the file is UTF-8 encoded text.",
            ]),
        )
    }

    pub(crate) fn access_denied(path: &str) -> Self {
        Self::new(
            FailureKind::AccessDenied,
            "Access denied",
            format!("Permission to read '{path}' was refused."),
            owned(&[
                "Check the file permissions.",
                "Copy the file to a location you own.",
            ]),
        )
    }

    pub(crate) fn empty_content() -> Self {
        Self::new(
            FailureKind::EmptyContent,
            "No content",
            "The file contains only whitespace.",
            owned(&["Re-export the run from the training script."]),
        )
    }

    pub(crate) fn truncated(last: Option<char>) -> Self {
        let tail = last.map_or_else(String::new, |c| format!(" (last character '{c}')"));
        Self::new(
            FailureKind::Truncated,
            "File appears truncated",
            format!("The content does not end with '}}' or ']'{tail}."),
            owned(&[
                "The recorder may have stopped mid-write; re-export the run.",
                "Check the disk had free space while recording.",
            ]),
        )
    }

    pub(crate) fn parse_produced_nothing() -> Self {
        Self::new(
            FailureKind::ParseProducedNothing,
            "Nothing to load",
            "The document parsed to null.",
            owned(&["The file must contain a JSON object describing one run."]),
        )
    }

    pub(crate) fn schema_mismatch(errors: &[String]) -> Self {
        Self::new(
            FailureKind::SchemaMismatch,
            "Unexpected file structure",
            errors.join("\n"),
            owned(&[
                "Compare the file against the run schema (metadata, trajectory.timesteps, geometry, scalars, evaluators).",
                "Re-export the run with an up-to-date recorder.",
            ]),
        )
    }
}
