use anyhow::Result;
use forge_install::{clean, Remote};
use tracing::info;

use super::{fgputil_installer, generator_installer, merge_installer, Tool};
use crate::config::ForgeConfig;

pub fn run(cfg: &ForgeConfig, tool: Tool) -> Result<()> {
    match tool {
        Tool::Raml4jaxrs => clean(&generator_installer(cfg))?,
        Tool::MergeRaml => clean(&merge_installer(cfg, Remote::new()?))?,
        Tool::Fgputil => clean(&fgputil_installer(cfg, Remote::new()?))?,
    }
    info!(?tool, "uninstalled");
    Ok(())
}
