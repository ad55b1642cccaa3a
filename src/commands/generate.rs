use anyhow::Result;
use forge_core::{default_passes, run_pipeline, PipelineOptions};
use forge_install::tools::merge_raml::BINARY_NAME;
use forge_install::{Installer, Remote};

use super::{generator_installer, merge_installer, print_summary};
use crate::config::ForgeConfig;

pub fn run(cfg: &ForgeConfig, json: bool) -> Result<()> {
    let generator = generator_installer(cfg);
    let merge = merge_installer(cfg, Remote::new()?);
    let opts = PipelineOptions {
        source_dir: cfg.source_dir.clone(),
        project_package: cfg.project_package.clone(),
        api_definition: cfg.root_api_definition.clone(),
        schema_root: cfg.schema_root_dir.clone(),
        merged_output: cfg.merged_output_file.clone(),
        merge_binary: cfg.bin_dir.join(BINARY_NAME),
        merge_excluded: cfg.merge_excluded_files.clone(),
        generator_jar: generator.jar(),
        generator_args: cfg.generator_args.clone(),
        passes: default_passes(cfg.generate_model_streams),
    };
    let installers: [&dyn Installer; 2] = [&generator, &merge];
    let summary = run_pipeline(&opts, &installers)?;
    print_summary(&summary, json)
}
