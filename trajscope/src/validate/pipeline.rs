use crate::config::ValidationLimits;
use crate::guard::InvariantGuard;
use crate::model::def::RunDef;
use crate::model::run::Run;
use crate::validate::failure::LoadFailure;
use crate::validate::quality::quality_warnings;
use crate::validate::schema::check_schema;
use crate::validate::syntax::invalid_format;
use std::io::ErrorKind;
use std::path::Path;

/// A successfully validated run and its non-fatal data warnings.
#[derive(Debug, Clone)]
pub struct LoadedRun {
    /// The validated run.
    pub run: Run,
    /// Human-readable data-quality warnings, in detection order.
    pub warnings: Vec<String>,
}

/// Staged loader turning run files into a [`Run`] or a diagnosed [`LoadFailure`].
///
/// Stages short-circuit in order: existence, size, extension, read, content shape, syntax,
/// null document, schema. The final data-quality pass never fails; it only adds warnings.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: ValidationLimits,
}

impl Validator {
    /// Validator with custom limits.
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    /// Active limits.
    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Run every stage against a file on disk.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn validate_path(
        &self,
        path: impl AsRef<Path>,
        guard: &InvariantGuard,
    ) -> Result<LoadedRun, LoadFailure> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let meta = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(LoadFailure::not_found(&shown)),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Err(LoadFailure::access_denied(&shown));
            }
            Err(e) => return Err(LoadFailure::unreadable(e)),
        };
        if meta.is_dir() {
            return Err(LoadFailure::unreadable(format!("'{shown}' is a directory")));
        }

        let size = meta.len();
        if size == 0 {
            return Err(LoadFailure::empty_file(&shown));
        }
        if size > self.limits.max_file_bytes {
            return Err(LoadFailure::too_large(size, self.limits.max_file_bytes));
        }

        let ext = path.extension().and_then(|e| e.to_str());
        if !ext.is_some_and(|e| e.eq_ignore_ascii_case(&self.limits.extension)) {
            return Err(LoadFailure::wrong_type(ext, &self.limits.extension));
        }
        tracing::debug!(size, "file checks passed");

        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Err(LoadFailure::access_denied(&shown));
            }
            Err(e) => return Err(LoadFailure::unreadable(e)),
        };
        let text = String::from_utf8(bytes)
            .map_err(|e| LoadFailure::unreadable(format!("content is not valid UTF-8 ({e})")))?;

        self.validate_text(&text, size, guard)
    }

    /// Run the content stages (blank check onwards) against already-read text.
    ///
    /// `file_size` feeds the large-file warning.
    pub fn validate_text(
        &self,
        text: &str,
        file_size: u64,
        guard: &InvariantGuard,
    ) -> Result<LoadedRun, LoadFailure> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(LoadFailure::empty_content());
        }
        let last = trimmed.chars().next_back();
        // A bare `null` is complete JSON; it is rejected below as producing nothing.
        if trimmed != "null" && !matches!(last, Some('}' | ']')) {
            return Err(LoadFailure::truncated(last));
        }

        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| invalid_format(text, &e))?;
        if value.is_null() {
            return Err(LoadFailure::parse_produced_nothing());
        }
        if !value.is_object() {
            return Err(LoadFailure::schema_mismatch(&[
                "$: top level must be a JSON object".to_owned(),
            ]));
        }
        let def: RunDef = serde_json::from_str(text).map_err(|e| invalid_format(text, &e))?;
        tracing::debug!("syntax checks passed");

        let report = check_schema(&def, self.limits.schema_major);
        if !report.errors.is_empty() {
            let mut all = report.errors;
            all.extend(report.compatibility);
            return Err(LoadFailure::schema_mismatch(&all));
        }

        let declared = def.summary();
        let run = Run::from_def(def);
        let mut warnings = report.compatibility;
        warnings.extend(quality_warnings(
            &run,
            declared,
            file_size,
            &self.limits,
            guard,
        ));

        tracing::info!(
            run = run.metadata().display_name(),
            timesteps = run.trajectory().len(),
            warnings = warnings.len(),
            "run validated"
        );
        Ok(LoadedRun { run, warnings })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/validate/pipeline.rs"]
mod tests;
