//! JSON boundary model for recorded runs.
//!
//! Every section is optional at this layer so that missing data surfaces as a schema error
//! with a useful message rather than a serde "missing field".

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RunDef {
    pub(crate) schema_version: Option<String>,
    pub(crate) metadata: MetadataDef,
    pub(crate) trajectory: TrajectoryDef,
    pub(crate) geometry: GeometryDef,
    pub(crate) scalars: ScalarsDef,
    pub(crate) evaluators: EvaluatorsDef,
}

/// Facts about the raw document that lowering into [`crate::Run`] does not keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DefSummary {
    /// Optional sections the document spelled out, even if empty.
    pub(crate) eigenvalues: bool,
    pub(crate) scalars: bool,
    pub(crate) evaluators: bool,
    /// Timesteps with a missing or non-finite coordinate anywhere in `point_2d`, including
    /// components past the 2D projection.
    pub(crate) non_finite_timesteps: usize,
}

impl RunDef {
    pub(crate) fn summary(&self) -> DefSummary {
        let non_finite_timesteps = self
            .trajectory
            .timesteps
            .iter()
            .filter(|ts| ts.point_2d.len() < 2 || ts.point_2d.iter().any(|c| !c.0.is_finite()))
            .count();
        DefSummary {
            eigenvalues: self.geometry.eigenvalues.is_some(),
            scalars: self.scalars.values.is_some(),
            evaluators: self.evaluators.professors.is_some(),
            non_finite_timesteps,
        }
    }

    /// Top-level `schema_version` wins over the one nested in `metadata`.
    pub(crate) fn schema_version(&self) -> Option<&str> {
        self.schema_version
            .as_deref()
            .or(self.metadata.schema_version.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MetadataDef {
    #[serde(alias = "id")]
    pub(crate) run_id: Option<String>,
    pub(crate) condition: Option<String>,
    pub(crate) schema_version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TrajectoryDef {
    pub(crate) timesteps: Vec<TimestepDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TimestepDef {
    pub(crate) t: Option<f64>,
    #[serde(alias = "point2d", alias = "point")]
    pub(crate) point_2d: Vec<LenientF64>,
    pub(crate) effective_dim: f64,
    pub(crate) curvature: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GeometryDef {
    pub(crate) eigenvalues: Option<Vec<EigenSnapshotDef>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum EigenSnapshotDef {
    Bare(Vec<f64>),
    Object { values: Vec<f64> },
}

impl EigenSnapshotDef {
    pub(crate) fn into_values(self) -> Vec<f64> {
        match self {
            Self::Bare(v) | Self::Object { values: v } => v,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ScalarsDef {
    pub(crate) values: Option<BTreeMap<String, Vec<f64>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct EvaluatorsDef {
    pub(crate) professors: Option<Vec<ProfessorDef>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ProfessorDef {
    pub(crate) name: Option<String>,
    pub(crate) vector: Vec<f64>,
    pub(crate) holdout: bool,
}

/// A coordinate that also accepts `null`, `"NaN"`, `"Infinity"` and `"-Infinity"`.
///
/// JSON has no literal for non-finite floats; recorders emit these spellings instead and the
/// data-quality pass reports them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LenientF64(pub(crate) f64);

impl<'de> Deserialize<'de> for LenientF64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Text(String),
            Null(()),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(v) => Ok(Self(v)),
            Repr::Null(_) => Ok(Self(f64::NAN)),
            Repr::Text(s) => match s.trim() {
                "NaN" | "nan" => Ok(Self(f64::NAN)),
                "Infinity" | "inf" | "+Infinity" => Ok(Self(f64::INFINITY)),
                "-Infinity" | "-inf" => Ok(Self(f64::NEG_INFINITY)),
                other => other
                    .parse::<f64>()
                    .map(Self)
                    .map_err(|_| serde::de::Error::custom(format!("invalid coordinate \"{s}\""))),
            },
        }
    }
}
