pub mod fgputil;
pub mod merge_raml;
pub mod raml4jaxrs;

use std::io;

use anyhow::{Context, Result};
use camino::Utf8Path;
use fs_err as fs;

/// Deletes files directly inside `dir` whose name matches `predicate`.
pub(crate) fn remove_matching<P>(dir: &Utf8Path, predicate: P) -> Result<Vec<String>>
where
    P: Fn(&str) -> bool,
{
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err).with_context(|| format!("listing {dir}")),
    };
    let mut removed = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_file() && predicate(&name) {
            fs::remove_file(entry.path())?;
            removed.push(name);
        }
    }
    removed.sort();
    Ok(removed)
}

/// Moves `from` to `to`, replacing any existing file.
pub(crate) fn move_file(from: &Utf8Path, to: &Utf8Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(from, to).with_context(|| format!("moving {from} to {to}"))
}
