//! Non-fatal data-quality pass run after a successful schema check.

use crate::config::ValidationLimits;
use crate::guard::{EIGEN_EPSILON, InvariantGuard, Verdict};
use crate::model::def::DefSummary;
use crate::model::run::Run;

const CONTEXT: &str = "validate.quality";

fn note(verdict: Verdict, warnings: &mut Vec<String>) {
    if let Some(v) = verdict.violation() {
        warnings.push(v.message.clone());
    }
}

/// Collect human-readable warnings for `run`, reporting numeric inconsistencies to `guard`.
///
/// Empty-series warnings only fire for sections the document declared; a run that simply
/// omits `geometry` or `scalars` is complete as far as this pass is concerned.
pub(crate) fn quality_warnings(
    run: &Run,
    declared: DefSummary,
    file_size: u64,
    limits: &ValidationLimits,
    guard: &InvariantGuard,
) -> Vec<String> {
    let mut warnings = Vec::new();
    let traj = run.trajectory();

    let non_finite = declared.non_finite_timesteps;
    if non_finite > 0 {
        let _ = guard.check_finite_coordinates(traj, CONTEXT);
        warnings.push(format!(
            "{non_finite} timestep(s) contain NaN or Infinity coordinates; they will be skipped when drawing"
        ));
    }
    let monotonic = guard.check_timesteps_monotonic(traj, CONTEXT);
    note(monotonic, &mut warnings);

    let geometry = run.geometry();
    if declared.eigenvalues && (geometry.is_empty() || geometry.iter().any(|s| s.values.is_empty()))
    {
        let empty = geometry.iter().filter(|s| s.values.is_empty()).count();
        warnings.push(if geometry.is_empty() {
            "eigenvalue series is empty; the spectrum overlay will not be drawn".to_owned()
        } else {
            format!("{empty} eigenvalue snapshot(s) are empty")
        });
    }
    // One warning per rule is enough for a load summary; the guard log keeps the detail.
    if let Some((i, s)) = geometry
        .iter()
        .enumerate()
        .find(|(_, s)| s.values.windows(2).any(|w| w[1] > w[0] + EIGEN_EPSILON))
    {
        let ctx = format!("{CONTEXT}.geometry[{i}]");
        let sorted = guard.check_eigenvalues_sorted(&s.values, &ctx);
        note(sorted, &mut warnings);
    }
    if let Some((i, s)) = geometry
        .iter()
        .enumerate()
        .find(|(_, s)| s.values.iter().any(|v| *v < -EIGEN_EPSILON))
    {
        let ctx = format!("{CONTEXT}.geometry[{i}]");
        let non_negative = guard.check_eigenvalues_non_negative(&s.values, &ctx);
        note(non_negative, &mut warnings);
    }
    let max_rank = geometry.iter().map(|s| s.values.len()).max().unwrap_or(0);
    if let Some(ts) = traj
        .iter()
        .find(|ts| max_rank > 0 && ts.effective_dim > max_rank as f64 + EIGEN_EPSILON)
    {
        note(
            guard.check_effective_dim(ts.effective_dim, max_rank, CONTEXT),
            &mut warnings,
        );
    }

    if declared.scalars {
        if run.scalars().is_empty() {
            warnings.push("scalar series map is empty".to_owned());
        }
        for (name, _) in run.scalars().iter().filter(|(_, v)| v.is_empty()) {
            warnings.push(format!("scalar series '{name}' is empty"));
        }
    }

    if declared.evaluators && run.evaluators().is_empty() {
        warnings.push("evaluator set is empty; no evaluator vectors will be drawn".to_owned());
    }
    let short = run
        .evaluators()
        .iter()
        .filter(|p| p.projection().is_none())
        .count();
    if short > 0 {
        warnings.push(format!(
            "{short} evaluator(s) have fewer than 2 components and will not be drawn"
        ));
    }

    note(
        guard.check_series_lengths(
            traj.len(),
            run.scalars_len(),
            geometry.len(),
            limits.length_tolerance,
            CONTEXT,
        ),
        &mut warnings,
    );

    if file_size > limits.large_file_bytes {
        warnings.push(format!(
            "large file ({:.1} MiB); loading and export may be slow",
            file_size as f64 / (1024.0 * 1024.0)
        ));
    }
    if traj.len() > limits.max_timesteps {
        warnings.push(format!(
            "{} timesteps exceeds the recommended maximum of {}; consider subsampling",
            traj.len(),
            limits.max_timesteps
        ));
    }

    warnings
}

#[cfg(test)]
#[path = "../../tests/unit/validate/quality.rs"]
mod tests;
