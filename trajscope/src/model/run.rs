use crate::foundation::core::Point;
use crate::model::def::RunDef;
use std::collections::BTreeMap;

/// Identification of a recorded run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMetadata {
    /// Recorder-assigned run identifier.
    pub run_id: Option<String>,
    /// Experimental condition label.
    pub condition: Option<String>,
    /// Schema version string the file declared, if any.
    pub schema_version: Option<String>,
}

impl RunMetadata {
    /// Best human-facing name: condition, then run id, then `"unnamed run"`.
    pub fn display_name(&self) -> &str {
        self.condition
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.run_id.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("unnamed run")
    }
}

/// One trajectory sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timestep {
    /// Training time of the sample (non-decreasing across a trajectory).
    pub t: f64,
    /// 2D projection of the model state.
    pub point: Point,
    /// Participation-ratio style dimensionality estimate.
    pub effective_dim: f64,
    /// Local trajectory curvature.
    pub curvature: f64,
}

/// Eigenvalue spectrum captured at one point in training.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EigenSnapshot {
    /// Eigenvalues, expected sorted descending and non-negative.
    pub values: Vec<f64>,
}

impl EigenSnapshot {
    /// Sum of all values.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// A fixed evaluation direction in the projected space.
#[derive(Debug, Clone, PartialEq)]
pub struct Professor {
    /// Optional display name.
    pub name: Option<String>,
    /// Direction vector; the first two components are its 2D projection.
    pub vector: Vec<f64>,
    /// Excluded from training feedback.
    pub holdout: bool,
}

impl Professor {
    /// 2D projection, or `None` when the vector has fewer than 2 components.
    pub fn projection(&self) -> Option<Point> {
        match self.vector.as_slice() {
            [x, y, ..] => Some(Point::new(*x, *y)),
            _ => None,
        }
    }
}

/// A loaded recording: immutable after validation.
///
/// Nothing in the type prevents an out-of-order trajectory or an unsorted spectrum; those are
/// data-quality properties checked by [`crate::InvariantGuard`] at load and render time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    metadata: RunMetadata,
    trajectory: Vec<Timestep>,
    geometry: Vec<EigenSnapshot>,
    scalars: BTreeMap<String, Vec<f64>>,
    evaluators: Vec<Professor>,
}

impl Run {
    /// Assemble a run from its parts.
    pub fn new(
        metadata: RunMetadata,
        trajectory: Vec<Timestep>,
        geometry: Vec<EigenSnapshot>,
        scalars: BTreeMap<String, Vec<f64>>,
        evaluators: Vec<Professor>,
    ) -> Self {
        Self {
            metadata,
            trajectory,
            geometry,
            scalars,
            evaluators,
        }
    }

    /// Run identification.
    pub fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    /// Trajectory samples in recording order.
    pub fn trajectory(&self) -> &[Timestep] {
        &self.trajectory
    }

    /// Eigen snapshots in recording order.
    pub fn geometry(&self) -> &[EigenSnapshot] {
        &self.geometry
    }

    /// Named scalar series, alphabetically ordered.
    pub fn scalars(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.scalars
    }

    /// Evaluator vectors.
    pub fn evaluators(&self) -> &[Professor] {
        &self.evaluators
    }

    /// Length of the longest scalar series (0 when there are none).
    pub fn scalars_len(&self) -> usize {
        self.scalars.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Lower a schema-checked definition into the runtime model.
    ///
    /// Missing `t` values become the sample's normalized position; missing coordinates become
    /// NaN and are reported by the data-quality pass.
    pub(crate) fn from_def(def: RunDef) -> Self {
        let schema_version = def.schema_version().map(str::to_owned);
        let n = def.trajectory.timesteps.len();
        let trajectory = def
            .trajectory
            .timesteps
            .into_iter()
            .enumerate()
            .map(|(i, ts)| {
                let coord = |k: usize| ts.point_2d.get(k).map(|c| c.0).unwrap_or(f64::NAN);
                Timestep {
                    t: ts
                        .t
                        .unwrap_or_else(|| crate::timeline::index::frame_time(i as u64, n as u64)),
                    point: Point::new(coord(0), coord(1)),
                    effective_dim: ts.effective_dim,
                    curvature: ts.curvature,
                }
            })
            .collect();

        Self {
            metadata: RunMetadata {
                run_id: def.metadata.run_id,
                condition: def.metadata.condition,
                schema_version,
            },
            trajectory,
            geometry: def
                .geometry
                .eigenvalues
                .unwrap_or_default()
                .into_iter()
                .map(|s| EigenSnapshot {
                    values: s.into_values(),
                })
                .collect(),
            scalars: def.scalars.values.unwrap_or_default(),
            evaluators: def
                .evaluators
                .professors
                .unwrap_or_default()
                .into_iter()
                .map(|p| Professor {
                    name: p.name,
                    vector: p.vector,
                    holdout: p.holdout,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/run.rs"]
mod tests;
