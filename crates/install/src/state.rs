use std::fmt;

use anyhow::Result;
use camino::Utf8Path;

use crate::lock;

/// What an installer has to do to reach its target version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    /// Nothing installed yet (no dependency root or no lock).
    New,
    /// A different version is installed.
    Update,
    /// The target version is installed.
    Skip,
}

impl InstallState {
    pub fn determine(root: &Utf8Path, lock_file: &Utf8Path, target_version: &str) -> Result<Self> {
        if !root.exists() {
            return Ok(InstallState::New);
        }
        match lock::read(lock_file)? {
            None => Ok(InstallState::New),
            Some(installed) if installed == target_version => Ok(InstallState::Skip),
            Some(_) => Ok(InstallState::Update),
        }
    }
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InstallState::New => "new",
            InstallState::Update => "update",
            InstallState::Skip => "skip",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn root(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn missing_root_is_new_even_if_versions_match() {
        let dir = TempDir::new().unwrap();
        let missing = root(&dir).join("bin");
        let state = InstallState::determine(&missing, &missing.join("x.lock"), "1.0").unwrap();
        assert_eq!(state, InstallState::New);
    }

    #[test]
    fn missing_lock_is_new() {
        let dir = TempDir::new().unwrap();
        let root = root(&dir);
        let state = InstallState::determine(&root, &root.join("x.lock"), "1.0").unwrap();
        assert_eq!(state, InstallState::New);
    }

    #[test]
    fn matching_lock_is_skip() {
        let dir = TempDir::new().unwrap();
        let root = root(&dir);
        std::fs::write(root.join("x.lock"), "1.0\n").unwrap();
        let state = InstallState::determine(&root, &root.join("x.lock"), "1.0").unwrap();
        assert_eq!(state, InstallState::Skip);
    }

    #[test]
    fn other_version_is_update() {
        let dir = TempDir::new().unwrap();
        let root = root(&dir);
        let lock = root.join("x.lock");
        for (installed, target) in [("1.0", "1.1"), ("v2.0.3", "2.0.3"), ("", "1.0")] {
            std::fs::write(&lock, installed).unwrap();
            assert_eq!(
                InstallState::determine(&root, &lock, target).unwrap(),
                InstallState::Update,
                "{installed} -> {target}"
            );
        }
    }
}
