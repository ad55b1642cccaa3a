use anyhow::Result;
use forge_install::{Installer, Remote};

use super::{fgputil_installer, generator_installer, merge_installer, print_summary};
use crate::config::ForgeConfig;

/// Installs the generator and the merge tool into the bin directory.
pub fn run(cfg: &ForgeConfig, json: bool) -> Result<()> {
    let generator = generator_installer(cfg);
    let merge = merge_installer(cfg, Remote::new()?);
    let installers: [&dyn Installer; 2] = [&generator, &merge];
    let summary = forge_core::run_installs(&installers)?;
    print_summary(&summary, json)
}

/// Downloads the vendored FgpUtil jars.
pub fn vendor(cfg: &ForgeConfig, json: bool) -> Result<()> {
    let fgputil = fgputil_installer(cfg, Remote::new()?);
    let installers: [&dyn Installer; 1] = [&fgputil];
    let summary = forge_core::run_installs(&installers)?;
    print_summary(&summary, json)
}
