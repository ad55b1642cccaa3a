use anyhow::Result;
use forge_install::tools::merge_raml::BINARY_NAME;
use forge_raml_driver::MergeDriver;

use crate::config::ForgeConfig;

pub fn run(cfg: &ForgeConfig) -> Result<()> {
    MergeDriver::new(cfg.bin_dir.join(BINARY_NAME), &cfg.merge_excluded_files)
        .run(&cfg.schema_root_dir, &cfg.merged_output_file)?;
    println!("merged {} -> {}", cfg.schema_root_dir, cfg.merged_output_file);
    Ok(())
}
