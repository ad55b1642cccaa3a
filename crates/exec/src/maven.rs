use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

use crate::ExecCommand;

pub fn clean_install(project: &Utf8Path) -> Result<()> {
    ExecCommand::new("mvn")
        .args(["clean", "install", "--quiet"])
        .current_dir(project)
        .run()?;
    Ok(())
}

/// Files ending in `suffix` inside any `output_dir_name` directory under
/// `root`, sorted.
pub fn find_artifacts(root: &Utf8Path, output_dir_name: &str, suffix: &str) -> Result<Vec<Utf8PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {root}"))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let in_output_dir = entry
            .path()
            .parent()
            .and_then(|p| p.file_name())
            .is_some_and(|name| name == output_dir_name);
        if !in_output_dir {
            continue;
        }
        let path = Utf8PathBuf::from_path_buf(entry.into_path())
            .map_err(|p| anyhow!("non utf-8 path {}", p.display()))?;
        if path.as_str().ends_with(suffix) {
            found.push(path);
        }
    }
    Ok(found)
}
