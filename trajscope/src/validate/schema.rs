use crate::model::def::RunDef;

/// Outcome of the schema stage.
#[derive(Debug, Default)]
pub(crate) struct SchemaReport {
    /// Structural errors; any entry fails the load.
    pub(crate) errors: Vec<String>,
    /// Compatibility notes; attached to the failure when there are errors, else warnings.
    pub(crate) compatibility: Vec<String>,
}

pub(crate) fn check_schema(def: &RunDef, supported_major: u64) -> SchemaReport {
    let mut report = SchemaReport::default();

    match def.trajectory.timesteps.first() {
        None => report
            .errors
            .push("$.trajectory.timesteps: must contain at least one timestep".to_owned()),
        Some(first) if first.point_2d.len() < 2 => report.errors.push(format!(
            "$.trajectory.timesteps[0].point_2d: needs at least 2 coordinates, found {}",
            first.point_2d.len()
        )),
        Some(_) => {}
    }

    let has = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.trim().is_empty());
    if !has(&def.metadata.run_id) && !has(&def.metadata.condition) {
        report
            .errors
            .push("$.metadata: must provide run_id or condition".to_owned());
    }

    if let Some(version) = def.schema_version() {
        match parse_major(version) {
            Some(major) if major == supported_major => {}
            Some(major) => report.compatibility.push(format!(
                "schema_version {version} (major {major}) may be incompatible; supported major version is {supported_major}"
            )),
            None => report.compatibility.push(format!(
                "schema_version \"{version}\" is not a recognizable version; supported major version is {supported_major}"
            )),
        }
    }

    report
}

/// Major component of `"1"`, `"1.2"`, `"v1.2.3"`.
pub(crate) fn parse_major(version: &str) -> Option<u64> {
    let v = version.trim();
    let v = v.strip_prefix(['v', 'V']).unwrap_or(v);
    v.split('.').next()?.trim().parse().ok()
}

#[cfg(test)]
#[path = "../../tests/unit/validate/schema.rs"]
mod tests;
