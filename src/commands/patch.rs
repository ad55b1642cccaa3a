use anyhow::Result;
use forge_core::{default_passes, existing_layout, run_patches};
use forge_patch::PatchPass;

use super::print_summary;
use crate::config::ForgeConfig;

/// Patches the current generated tree. Requested passes still run in
/// pipeline order since each expects the output of the ones before it.
pub fn run(cfg: &ForgeConfig, requested: &[PatchPass], json: bool) -> Result<()> {
    let layout = existing_layout(&cfg.source_dir, &cfg.project_package)?;
    let passes = select_passes(requested, cfg.generate_model_streams);
    let summary = run_patches(&layout, &passes)?;
    print_summary(&summary, json)
}

fn select_passes(requested: &[PatchPass], generate_streams: bool) -> Vec<PatchPass> {
    if requested.is_empty() {
        return default_passes(generate_streams);
    }
    PatchPass::ALL
        .into_iter()
        .filter(|pass| requested.contains(pass))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_passes_keep_pipeline_order() {
        let passes = select_passes(
            &[PatchPass::UrlConstants, PatchPass::Discriminators, PatchPass::UrlConstants],
            true,
        );
        assert_eq!(passes, [PatchPass::Discriminators, PatchPass::UrlConstants]);
    }

    #[test]
    fn no_request_means_every_enabled_pass() {
        assert_eq!(select_passes(&[], false), default_passes(false));
        assert!(select_passes(&[PatchPass::Streams], false).contains(&PatchPass::Streams));
    }
}
