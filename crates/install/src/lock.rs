//! Single-line version records left next to installed artifacts.

use std::io;

use anyhow::{Context, Result};
use camino::Utf8Path;
use fs_err as fs;

/// Installed version, trimmed. `None` when the lock does not exist.
pub fn read(path: &Utf8Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents.trim().to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("reading lock file {path}")),
    }
}

pub fn write(path: &Utf8Path, version: &str) -> Result<()> {
    forge_patch::rewrite::write_atomic(path, version.trim())
        .with_context(|| format!("writing lock file {path}"))
}

pub fn remove(path: &Utf8Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("removing lock file {path}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn write_read_remove() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("tool.lock")).unwrap();

        assert_eq!(read(&path).unwrap(), None);
        write(&path, "3.0.7").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "3.0.7");
        assert_eq!(read(&path).unwrap().as_deref(), Some("3.0.7"));
        remove(&path).unwrap();
        remove(&path).unwrap();
        assert_eq!(read(&path).unwrap(), None);
    }
}
