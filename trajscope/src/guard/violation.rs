use crate::foundation::error::{TrajError, TrajResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Every invariant the guard knows how to check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Rule {
    /// Normalized time lies in `[0, 1]`.
    TimeInRange,
    /// A derived sample index lies inside its series.
    IndexInBounds,
    /// The trajectory has at least one timestep.
    TrajectoryNonEmpty,
    /// The trajectory carries a usable 2D point.
    TrajectoryHas2D,
    /// Timestep `t` values are non-decreasing.
    TimestepsMonotonic,
    /// Trajectory coordinates are finite.
    FiniteCoordinates,
    /// Eigenvalues are sorted descending.
    EigenvaluesSorted,
    /// Eigenvalues are non-negative.
    EigenvaluesNonNegative,
    /// Effective dimension does not exceed the spectrum rank.
    EffectiveDimBounded,
    /// Independently sized series have comparable lengths.
    SeriesLengthsConsistent,
    /// Both comparison panels are driven by the same time.
    CompareTimeSynced,
    /// Both comparison runs are renderable.
    CompareRunsValid,
}

impl Rule {
    /// Stable identifier used in logs and UI.
    pub fn name(self) -> &'static str {
        match self {
            Self::TimeInRange => "TimeInRange",
            Self::IndexInBounds => "IndexInBounds",
            Self::TrajectoryNonEmpty => "TrajectoryNonEmpty",
            Self::TrajectoryHas2D => "TrajectoryHas2D",
            Self::TimestepsMonotonic => "TimestepsMonotonic",
            Self::FiniteCoordinates => "FiniteCoordinates",
            Self::EigenvaluesSorted => "EigenvaluesSorted",
            Self::EigenvaluesNonNegative => "EigenvaluesNonNegative",
            Self::EffectiveDimBounded => "EffectiveDimBounded",
            Self::SeriesLengthsConsistent => "SeriesLengthsConsistent",
            Self::CompareTimeSynced => "CompareTimeSynced",
            Self::CompareRunsValid => "CompareRunsValid",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a caller must react to a violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    /// Proceed with degraded output.
    Warning,
    /// Abort the current operation.
    Error,
}

/// A detected breach of a data or runtime invariant.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Violation {
    /// Rule that was breached.
    pub rule: Rule,
    /// Human-readable description.
    pub message: String,
    /// Where the check ran (e.g. `"render.eigen"`).
    pub context: String,
    /// Caller reaction policy.
    pub severity: Severity,
    /// Detection time.
    pub timestamp: DateTime<Utc>,
    /// Whether the guard substituted a corrected value.
    pub auto_corrected: bool,
    /// The substituted value, when `auto_corrected`.
    pub corrected_value: Option<f64>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.context, self.rule, self.message)?;
        if let Some(v) = self.corrected_value {
            write!(f, " (corrected to {v})")?;
        }
        Ok(())
    }
}

/// Outcome of a non-correcting check.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    /// The invariant holds.
    Pass,
    /// A `Warning` violation: continue with degraded output.
    Degraded(Violation),
    /// An `Error` violation: abort the current operation.
    Abort(Violation),
}

impl Verdict {
    /// `true` only for [`Verdict::Pass`].
    pub fn passed(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// `true` for [`Verdict::Abort`].
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Abort(_))
    }

    /// The recorded violation, if any.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Pass => None,
            Self::Degraded(v) | Self::Abort(v) => Some(v),
        }
    }

    /// Convert to a result: `Abort` becomes [`TrajError::Precondition`], the rest is `Ok`.
    pub fn into_result(self) -> TrajResult<()> {
        match self {
            Self::Pass | Self::Degraded(_) => Ok(()),
            Self::Abort(v) => Err(TrajError::precondition(v.rule, v.message)),
        }
    }
}
