//! Batch processing over the selected files.
//!
//! The processor probes, plans, and executes one operation across a
//! selection, sequentially. Failures are recorded per item and never
//! abort the batch; the report carries every outcome. Successful outputs
//! are registered so the session can chain operations.

use std::path::{Path, PathBuf};

use crate::config::{CollisionPolicy, Settings};
use crate::engine::MediaEngine;
use crate::models::{AudioInfo, OperationParams};
use crate::ops::{PlanOutcome, PlanRequest, PlanScope, Planner};
use crate::registry::{FileDescriptor, FileRegistry, RegistryError};

/// Outcome of one batch item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    /// The primary input (first input for whole-selection operations).
    pub input: PathBuf,
    /// Whether the item completed.
    pub success: bool,
    /// Written (or passed-through) output on success.
    pub output: Option<PathBuf>,
    /// Failure description on error.
    pub error: Option<String>,
}

impl ItemResult {
    fn ok(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            success: true,
            output: Some(output),
            error: None,
        }
    }

    fn failed(input: PathBuf, error: impl ToString) -> Self {
        Self {
            input,
            success: false,
            output: None,
            error: Some(error.to_string()),
        }
    }
}

/// Results of one batch run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub items: Vec<ItemResult>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.success).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

/// Called before each item with (index, total, primary input path).
pub type ProgressFn<'a> = dyn FnMut(usize, usize, &Path) + 'a;

/// Sequential batch runner binding planners to a media engine.
pub struct BatchProcessor<'a, E: MediaEngine> {
    engine: &'a E,
    settings: &'a Settings,
}

impl<'a, E: MediaEngine> BatchProcessor<'a, E> {
    pub fn new(engine: &'a E, settings: &'a Settings) -> Self {
        Self { engine, settings }
    }

    /// Run one operation across the selection.
    ///
    /// `output_prefix` names the operation in output files (for example
    /// `trimmed_`). Successful outputs are added to `registry`, which
    /// makes the newest output active.
    pub fn run(
        &self,
        planner: &dyn Planner,
        output_prefix: &str,
        inputs: &[FileDescriptor],
        params: &OperationParams,
        registry: &mut FileRegistry,
        progress: Option<&mut ProgressFn<'_>>,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        if inputs.is_empty() {
            return report;
        }

        let mut progress = progress;
        let mut notify = |index: usize, total: usize, path: &Path| {
            if let Some(cb) = progress.as_deref_mut() {
                cb(index, total, path);
            }
        };

        match planner.scope() {
            PlanScope::WholeSelection => {
                notify(0, 1, &inputs[0].path);
                let item = self.process_group(planner, output_prefix, inputs, params, registry);
                report.items.push(item);
            }
            PlanScope::PerFile => {
                let total = inputs.len();
                for (index, input) in inputs.iter().enumerate() {
                    notify(index, total, &input.path);
                    let group = std::slice::from_ref(input);
                    let item = self.process_group(planner, output_prefix, group, params, registry);
                    report.items.push(item);
                }
            }
        }
        report
    }

    /// Probe, plan, and execute one planning group (one file, or the
    /// whole selection for concatenating operations).
    fn process_group(
        &self,
        planner: &dyn Planner,
        output_prefix: &str,
        group: &[FileDescriptor],
        params: &OperationParams,
        registry: &mut FileRegistry,
    ) -> ItemResult {
        let primary = group[0].path.clone();

        let mut infos: Vec<AudioInfo> = Vec::with_capacity(group.len());
        for input in group {
            match self.engine.probe(&input.path) {
                Ok(info) => infos.push(info),
                Err(e) => {
                    tracing::warn!("Probe failed for {}: {}", input.path.display(), e);
                    return ItemResult::failed(primary, e);
                }
            }
        }

        let request = PlanRequest {
            inputs: group,
            infos: &infos,
            params,
        };
        let plan = match planner.plan(&request) {
            Ok(PlanOutcome::Plan(plan)) => plan,
            Ok(PlanOutcome::Identity(path)) => {
                // Nothing for the engine to do; surface the input itself.
                tracing::debug!("Identity outcome for {}", path.display());
                self.register_output(registry, &path);
                return ItemResult::ok(primary, path);
            }
            Err(e) => return ItemResult::failed(primary, e),
        };

        let output_path =
            match self.resolve_output_path(&primary, output_prefix, &plan.output.extension) {
                Ok(path) => path,
                Err(e) => return ItemResult::failed(primary, e),
            };

        match self.engine.execute(&plan, &output_path) {
            Ok(written) => {
                tracing::info!(
                    "Wrote {} from {} input(s)",
                    written.display(),
                    group.len()
                );
                self.register_output(registry, &written);
                ItemResult::ok(primary, written)
            }
            Err(e) => {
                tracing::error!("Engine failed for {}: {}", primary.display(), e);
                ItemResult::failed(primary, e)
            }
        }
    }

    /// Compose the output path and apply the collision policy.
    fn resolve_output_path(
        &self,
        primary: &Path,
        prefix: &str,
        extension: &str,
    ) -> Result<PathBuf, String> {
        let stem = primary
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());

        let folder = Path::new(&self.settings.paths.output_folder);
        let candidate = folder.join(format!("{prefix}{stem}.{extension}"));

        if !candidate.exists() {
            return Ok(candidate);
        }
        match self.settings.output.collision_policy {
            CollisionPolicy::Overwrite => Ok(candidate),
            CollisionPolicy::Reject => Err(format!(
                "output already exists: {}",
                candidate.display()
            )),
            CollisionPolicy::AutoRename => {
                let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
                Ok(folder.join(format!("{prefix}{stem}_{stamp}.{extension}")))
            }
        }
    }

    /// Track a produced file in the registry and make it active. An
    /// already-registered path (identity outcomes, overwrites) is just
    /// re-activated.
    fn register_output(&self, registry: &mut FileRegistry, path: &Path) {
        match registry.add(FileDescriptor::from_path(path)) {
            Ok(()) => {}
            Err(RegistryError::DuplicatePath(_)) => {
                if let Err(e) = registry.set_active(path) {
                    tracing::warn!("Failed to activate {}: {}", path.display(), e);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to register {}: {}", path.display(), e);
            }
        }
    }
}
