use crate::guard::log::InvariantGuard;
use crate::guard::violation::{Rule, Severity, Verdict};
use crate::model::run::{Run, Timestep};
use crate::timeline::index;

/// Tolerance for the eigenvalue ordering and sign checks.
pub const EIGEN_EPSILON: f64 = 0.001;

const TIME_SYNC_EPSILON: f64 = 1e-9;

impl InvariantGuard {
    /// Clamp normalized time into `[0, 1]`, reporting a corrected `TimeInRange` warning when
    /// the input was outside.
    pub fn clamp_time(&self, t: f64, context: &str) -> f64 {
        let clamped = index::clamp_time(t);
        if clamped != t {
            self.report(
                Rule::TimeInRange,
                Severity::Warning,
                context,
                format!("time {t} outside [0, 1]"),
                Some(clamped),
            );
        }
        clamped
    }

    /// Clamp an index into `[0, len)`, reporting a corrected `IndexInBounds` warning.
    ///
    /// `len` must be non-zero; zero-length series are skipped before indexing.
    pub fn clamp_index(&self, idx: usize, len: usize, context: &str) -> usize {
        let last = len.saturating_sub(1);
        if idx <= last {
            return idx;
        }
        self.report(
            Rule::IndexInBounds,
            Severity::Warning,
            context,
            format!("index {idx} outside series of length {len}"),
            Some(last as f64),
        );
        last
    }

    /// `Error` when the run has no timesteps.
    pub fn check_trajectory_non_empty(&self, run: &Run, context: &str) -> Verdict {
        if !run.trajectory().is_empty() {
            return Verdict::Pass;
        }
        let name = run.metadata().display_name();
        self.verdict(
            Rule::TrajectoryNonEmpty,
            Severity::Error,
            context,
            format!("run '{name}' has an empty trajectory"),
        )
    }

    /// `Error` when the first timestep has no finite 2D point.
    pub fn check_trajectory_2d(&self, run: &Run, context: &str) -> Verdict {
        match run.trajectory().first() {
            Some(ts) if ts.point.is_finite() => Verdict::Pass,
            Some(_) => self.verdict(
                Rule::TrajectoryHas2D,
                Severity::Error,
                context,
                format!(
                    "run '{}' first timestep lacks finite 2D coordinates",
                    run.metadata().display_name()
                ),
            ),
            None => self.check_trajectory_non_empty(run, context),
        }
    }

    /// Run both rendering preconditions, stopping at the first failure.
    pub fn check_renderable(&self, run: &Run, context: &str) -> Verdict {
        let v = self.check_trajectory_non_empty(run, context);
        if !v.passed() {
            return v;
        }
        self.check_trajectory_2d(run, context)
    }

    /// `Warning` when `t` decreases anywhere; one violation summarizes all breaches.
    pub fn check_timesteps_monotonic(&self, trajectory: &[Timestep], context: &str) -> Verdict {
        let mut first = None;
        let mut count = 0usize;
        for (i, w) in trajectory.windows(2).enumerate() {
            if w[1].t < w[0].t {
                first.get_or_insert(i + 1);
                count += 1;
            }
        }
        let Some(at) = first else {
            return Verdict::Pass;
        };
        self.verdict(
            Rule::TimestepsMonotonic,
            Severity::Warning,
            context,
            format!("timestep t decreases at index {at} ({count} breach(es))"),
        )
    }

    /// `Warning` when any trajectory coordinate is NaN or infinite.
    pub fn check_finite_coordinates(&self, trajectory: &[Timestep], context: &str) -> Verdict {
        let bad = trajectory.iter().filter(|ts| !ts.point.is_finite()).count();
        if bad == 0 {
            return Verdict::Pass;
        }
        self.verdict(
            Rule::FiniteCoordinates,
            Severity::Warning,
            context,
            format!("{bad} timestep(s) carry NaN or infinite coordinates"),
        )
    }

    /// `Warning` when `values` is not sorted descending within [`EIGEN_EPSILON`].
    pub fn check_eigenvalues_sorted(&self, values: &[f64], context: &str) -> Verdict {
        let Some(at) = values
            .windows(2)
            .position(|w| w[1] > w[0] + EIGEN_EPSILON)
        else {
            return Verdict::Pass;
        };
        self.verdict(
            Rule::EigenvaluesSorted,
            Severity::Warning,
            context,
            format!(
                "eigenvalues not sorted descending: {} follows {} at index {}",
                values[at + 1],
                values[at],
                at + 1
            ),
        )
    }

    /// `Warning` when any value is below `-EIGEN_EPSILON`.
    pub fn check_eigenvalues_non_negative(&self, values: &[f64], context: &str) -> Verdict {
        let Some((i, v)) = values
            .iter()
            .copied()
            .enumerate()
            .find(|(_, v)| *v < -EIGEN_EPSILON)
        else {
            return Verdict::Pass;
        };
        self.verdict(
            Rule::EigenvaluesNonNegative,
            Severity::Warning,
            context,
            format!("negative eigenvalue {v} at index {i}"),
        )
    }

    /// `Warning` when `effective_dim` exceeds the number of eigenvalues.
    pub fn check_effective_dim(&self, effective_dim: f64, rank: usize, context: &str) -> Verdict {
        if rank == 0 || effective_dim <= rank as f64 + EIGEN_EPSILON {
            return Verdict::Pass;
        }
        self.verdict(
            Rule::EffectiveDimBounded,
            Severity::Warning,
            context,
            format!("effective dimension {effective_dim} exceeds spectrum rank {rank}"),
        )
    }

    /// `Warning` when, among the nonzero series lengths, the largest exceeds `tolerance` times
    /// the smallest. Needs at least two nonzero lengths to say anything.
    pub fn check_series_lengths(
        &self,
        trajectory: usize,
        scalars: usize,
        eigen: usize,
        tolerance: f64,
        context: &str,
    ) -> Verdict {
        let lens: Vec<usize> = [trajectory, scalars, eigen]
            .into_iter()
            .filter(|&n| n > 0)
            .collect();
        let (Some(&min), Some(&max)) = (lens.iter().min(), lens.iter().max()) else {
            return Verdict::Pass;
        };
        if lens.len() < 2 || (max as f64) <= (min as f64) * tolerance {
            return Verdict::Pass;
        }
        self.verdict(
            Rule::SeriesLengthsConsistent,
            Severity::Warning,
            context,
            format!(
                "series lengths diverge beyond {tolerance}x (trajectory {trajectory}, scalars {scalars}, eigenvalues {eigen})"
            ),
        )
    }

    /// `Error` when the two comparison panels would be driven by different times.
    pub fn check_compare_time_synced(&self, left: f64, right: f64, context: &str) -> Verdict {
        if (left - right).abs() <= TIME_SYNC_EPSILON {
            return Verdict::Pass;
        }
        self.verdict(
            Rule::CompareTimeSynced,
            Severity::Error,
            context,
            format!("comparison panels out of sync: left t={left}, right t={right}"),
        )
    }

    /// `Error` when either comparison run cannot be rendered.
    pub fn check_compare_runs_valid(&self, left: &Run, right: &Run, context: &str) -> Verdict {
        let missing: Vec<&str> = [("left", left), ("right", right)]
            .into_iter()
            .filter(|(_, r)| {
                r.trajectory()
                    .first()
                    .is_none_or(|ts| !ts.point.is_finite())
            })
            .map(|(side, _)| side)
            .collect();
        if missing.is_empty() {
            return Verdict::Pass;
        }
        let missing = missing.join(" and ");
        self.verdict(
            Rule::CompareRunsValid,
            Severity::Error,
            context,
            format!("comparison {missing} run lacks trajectory data"),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/guard/rules.rs"]
mod tests;
