//! The generate pipeline: tool installation, RAML merge, code generation and
//! the ordered patch passes over the generated sources.

mod progress;
mod summary;

use anyhow::{bail, Result};
use camino::{Utf8Path, Utf8PathBuf};
use forge_install::Installer;
use forge_patch::{GeneratedLayout, PatchPass};
use forge_raml_driver::{GeneratorDriver, MergeDriver};
use tracing::info;

pub use progress::StageProgress;
pub use summary::{PipelineSummary, StageReport, StageResult};

const INSTALL: &str = "install";
const MERGE: &str = "merge";
const GENERATE: &str = "generate";
const PATCH: &str = "patch";

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub source_dir: Utf8PathBuf,
    pub project_package: String,
    pub api_definition: Utf8PathBuf,
    pub schema_root: Utf8PathBuf,
    pub merged_output: Utf8PathBuf,
    pub merge_binary: Utf8PathBuf,
    pub merge_excluded: Vec<String>,
    pub generator_jar: Utf8PathBuf,
    pub generator_args: Vec<String>,
    pub passes: Vec<PatchPass>,
}

impl PipelineOptions {
    pub fn layout(&self) -> GeneratedLayout {
        GeneratedLayout::new(&self.source_dir, &self.project_package)
    }
}

/// Every pass in run order, leaving out stream generation when disabled.
pub fn default_passes(generate_streams: bool) -> Vec<PatchPass> {
    PatchPass::ALL
        .into_iter()
        .filter(|pass| generate_streams || *pass != PatchPass::Streams)
        .collect()
}

/// Installs the tools, merges the RAML, regenerates the sources and patches
/// them. The first failing stage aborts the run; nothing after it runs.
pub fn run_pipeline(opts: &PipelineOptions, installers: &[&dyn Installer]) -> Result<PipelineSummary> {
    let mut summary = PipelineSummary::default();
    let progress = StageProgress::new(&[INSTALL, MERGE, GENERATE, PATCH]);
    let result = run_stages(opts, installers, &mut summary, &progress);
    progress.clear();
    result?;

    summary.finish();
    info!(
        stages = summary.stages.len(),
        changed = summary.changed_files(),
        "pipeline complete"
    );
    Ok(summary)
}

fn run_stages(
    opts: &PipelineOptions,
    installers: &[&dyn Installer],
    summary: &mut PipelineSummary,
    progress: &StageProgress,
) -> Result<()> {
    install_tools(installers, summary, progress)?;
    progress.done(INSTALL, format!("{} tools ready", installers.len()));

    progress.step(MERGE, opts.schema_root.as_str());
    MergeDriver::new(&opts.merge_binary, &opts.merge_excluded)
        .run(&opts.schema_root, &opts.merged_output)?;
    summary.record("merge-raml", StageResult::Completed);
    progress.done(MERGE, opts.merged_output.as_str());

    let layout = opts.layout();
    progress.step(GENERATE, "raml-to-jaxrs");
    GeneratorDriver::new(&opts.generator_jar, opts.generator_args.clone()).run(
        &opts.api_definition,
        &opts.source_dir,
        &layout,
    )?;
    summary.record("generate", StageResult::Completed);
    progress.done(GENERATE, layout.root().as_str());

    apply_patches(&layout, &opts.passes, summary, progress)?;
    progress.done(PATCH, format!("{} passes", opts.passes.len()));
    Ok(())
}

/// Brings every tool to its configured version, in order.
pub fn run_installs(installers: &[&dyn Installer]) -> Result<PipelineSummary> {
    let mut summary = PipelineSummary::default();
    let progress = StageProgress::new(&[INSTALL]);
    let result = install_tools(installers, &mut summary, &progress);
    progress.clear();
    result?;
    summary.finish();
    Ok(summary)
}

/// Runs `passes` over an already generated tree.
pub fn run_patches(layout: &GeneratedLayout, passes: &[PatchPass]) -> Result<PipelineSummary> {
    let mut summary = PipelineSummary::default();
    let progress = StageProgress::new(&[PATCH]);
    let result = apply_patches(layout, passes, &mut summary, &progress);
    progress.clear();
    result?;
    summary.finish();
    Ok(summary)
}

fn install_tools(
    installers: &[&dyn Installer],
    summary: &mut PipelineSummary,
    progress: &StageProgress,
) -> Result<()> {
    for installer in installers {
        let name = &installer.descriptor().name;
        progress.step(INSTALL, name.as_str());
        let outcome = forge_install::install(*installer)?;
        summary.record(format!("install:{name}"), outcome.into());
    }
    Ok(())
}

fn apply_patches(
    layout: &GeneratedLayout,
    passes: &[PatchPass],
    summary: &mut PipelineSummary,
    progress: &StageProgress,
) -> Result<()> {
    let root = layout.root();
    if !root.is_dir() {
        bail!("no generated sources under {root}");
    }
    for pass in passes {
        progress.step(PATCH, pass.name());
        let changed = pass.run(layout)?;
        let result = if changed.is_empty() {
            StageResult::Skipped {
                reason: Some("nothing to change".into()),
            }
        } else {
            StageResult::Applied {
                changed_files: changed.len() as u64,
                files: changed.iter().map(|f| display_path(root, f)).collect(),
            }
        };
        summary.record(pass.name(), result);
    }
    Ok(())
}

fn display_path(root: &Utf8Path, file: &Utf8Path) -> String {
    file.strip_prefix(root)
        .map(|p| p.to_string())
        .unwrap_or_else(|_| file.to_string())
}

/// Resolves the generated tree for `source_dir` and checks it exists.
pub fn existing_layout(source_dir: &Utf8Path, project_package: &str) -> Result<GeneratedLayout> {
    let layout = GeneratedLayout::new(source_dir, project_package);
    if !layout.root().is_dir() {
        bail!(
            "no generated sources under {}; run `container-forge generate` first",
            layout.root()
        );
    }
    Ok(layout)
}
