use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};

use crate::ExecCommand;

#[derive(Debug, Clone, Default)]
pub struct CloneOptions {
    /// `Some(1)` for a shallow clone.
    pub depth: Option<u32>,
    /// Branch or tag to check out.
    pub branch: Option<String>,
}

impl CloneOptions {
    pub fn shallow(branch: impl Into<String>) -> Self {
        Self {
            depth: Some(1),
            branch: Some(branch.into()),
        }
    }
}

/// Directory name git picks for a clone of `url`.
pub fn repo_dir_name(url: &str) -> &str {
    let last = url.trim_end_matches('/').rsplit('/').next().unwrap_or(url);
    last.strip_suffix(".git").unwrap_or(last)
}

/// Clones `url` inside `parent`, returning the new checkout.
pub fn clone(url: &str, parent: &Utf8Path, options: &CloneOptions) -> Result<Utf8PathBuf> {
    let mut cmd = ExecCommand::new("git")
        .args(["clone", "--quiet"])
        .current_dir(parent);
    if let Some(depth) = options.depth {
        cmd = cmd.arg("--depth").arg(depth.to_string());
    }
    if let Some(branch) = &options.branch {
        cmd = cmd.arg("--branch").arg(branch.as_str());
    }
    cmd.arg(url).run()?;
    Ok(parent.join(repo_dir_name(url)))
}
