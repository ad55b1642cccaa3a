pub mod docker;
pub mod docs;
pub mod doctor;
pub mod generate;
pub mod install;
pub mod merge;
pub mod patch;
pub mod uninstall;

use anyhow::Result;
use clap::ValueEnum;
use forge_core::{PipelineSummary, StageResult};
use forge_install::tools::fgputil::{self, FgpUtilInstaller};
use forge_install::tools::merge_raml::{self, MergeRamlInstaller};
use forge_install::tools::raml4jaxrs::Raml4JaxRsInstaller;
use forge_install::Remote;

use crate::config::ForgeConfig;

/// Tools `uninstall` knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tool {
    Raml4jaxrs,
    MergeRaml,
    Fgputil,
}

pub(crate) fn generator_installer(cfg: &ForgeConfig) -> Raml4JaxRsInstaller {
    Raml4JaxRsInstaller::new(&cfg.bin_dir, &cfg.raml4jaxrs_url, &cfg.raml4jaxrs_version)
}

pub(crate) fn merge_installer(cfg: &ForgeConfig, remote: Remote) -> MergeRamlInstaller {
    MergeRamlInstaller::new(
        &cfg.bin_dir,
        merge_raml::DEFAULT_RELEASES_API,
        &cfg.merge_tool_version,
        remote,
    )
}

pub(crate) fn fgputil_installer(cfg: &ForgeConfig, remote: Remote) -> FgpUtilInstaller {
    FgpUtilInstaller::new(
        &cfg.vendor_dir,
        fgputil::DEFAULT_RELEASES_URL,
        &cfg.fgputil_version,
        cfg.fgputil_targets.clone(),
        remote,
    )
}

pub(crate) fn print_summary(summary: &PipelineSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }
    for report in &summary.stages {
        let line = match &report.result {
            StageResult::Installed {
                version,
                previous: Some(previous),
            } => format!("updated {previous} -> {version}"),
            StageResult::Installed { version, .. } => format!("installed {version}"),
            StageResult::Completed => "done".to_string(),
            StageResult::Applied { changed_files, .. } => format!("{changed_files} file(s) patched"),
            StageResult::Skipped { reason } => {
                format!("skipped ({})", reason.as_deref().unwrap_or("-"))
            }
        };
        println!("{:<24} {line}", report.stage);
    }
    Ok(())
}
