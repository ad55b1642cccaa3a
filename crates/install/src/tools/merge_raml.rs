//! The RAML merge tool, installed from prebuilt GitHub release archives.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use super::{move_file, remove_matching};
use crate::installer::{DependencyDescriptor, Installer};
use crate::remote::{current_platform, Remote};
use crate::InstallError;

pub const DEFAULT_RELEASES_API: &str =
    "https://api.github.com/repos/VEuPathDB/script-raml-merge/releases";
pub const DEFAULT_VERSION: &str = "v2.0.3";
pub const BINARY_NAME: &str = "merge-raml";
const LOCK_NAME: &str = "merge-raml.lock";
const DOWNLOAD_NAME: &str = "merge-raml-download.tar.gz";

#[derive(Debug, Clone)]
pub struct MergeRamlInstaller {
    descriptor: DependencyDescriptor,
    bin_dir: Utf8PathBuf,
    remote: Remote,
}

impl MergeRamlInstaller {
    pub fn new(bin_dir: impl Into<Utf8PathBuf>, releases_api: &str, version: &str, remote: Remote) -> Self {
        Self {
            descriptor: DependencyDescriptor::new(BINARY_NAME, releases_api, version),
            bin_dir: bin_dir.into(),
            remote,
        }
    }

    pub fn binary(&self) -> Utf8PathBuf {
        self.bin_dir.join(BINARY_NAME)
    }
}

impl Installer for MergeRamlInstaller {
    fn descriptor(&self) -> &DependencyDescriptor {
        &self.descriptor
    }

    fn root(&self) -> &Utf8Path {
        &self.bin_dir
    }

    fn lock_file(&self) -> Utf8PathBuf {
        self.bin_dir.join(LOCK_NAME)
    }

    fn resolve_version(&self) -> Result<String> {
        if !self.descriptor.wants_latest() {
            return Ok(self.descriptor.target_version.clone());
        }
        let release = self
            .remote
            .release(&self.descriptor.source_url, &self.descriptor.target_version)?;
        debug!(tag = %release.tag_name, "resolved latest merge-raml release");
        Ok(release.tag_name)
    }

    fn artifacts_present(&self) -> bool {
        self.binary().is_file()
    }

    fn remove_artifacts(&self) -> Result<()> {
        remove_matching(&self.bin_dir, |name| {
            name.starts_with(BINARY_NAME) && name != LOCK_NAME
        })?;
        Ok(())
    }

    fn download(&self, version: &str, work_dir: &Utf8Path) -> Result<()> {
        let platform = current_platform()?;
        let release = self.remote.release(&self.descriptor.source_url, version)?;
        let asset = release.asset_for(platform)?;
        self.remote
            .download(&asset.browser_download_url, &work_dir.join(DOWNLOAD_NAME))
    }

    fn build_and_install(&self, _version: &str, work_dir: &Utf8Path) -> Result<()> {
        let unpacked = work_dir.join("unpacked");
        let files = forge_pkg::unpack_tar_gz(&work_dir.join(DOWNLOAD_NAME), &unpacked)?;
        let binary = files
            .into_iter()
            .find(|f| f.file_name() == Some(BINARY_NAME))
            .ok_or_else(|| InstallError::MissingArtifact {
                name: self.descriptor.name.clone(),
                suffix: BINARY_NAME.to_string(),
            })?;
        move_file(&binary, &self.binary())
            .with_context(|| format!("installing {BINARY_NAME}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn pinned_version_resolves_without_network() {
        let installer = MergeRamlInstaller::new(
            "/tmp/p/.bin",
            DEFAULT_RELEASES_API,
            DEFAULT_VERSION,
            Remote::new().unwrap(),
        );
        assert_eq!(installer.resolve_version().unwrap(), "v2.0.3");
        assert_eq!(installer.lock_file(), Utf8PathBuf::from("/tmp/p/.bin/merge-raml.lock"));
    }

    #[test]
    fn removes_binary_but_not_other_tools() {
        let dir = TempDir::new().unwrap();
        let bin = Utf8Path::from_path(dir.path()).unwrap();
        for name in ["merge-raml", "raml-to-jaxrs.jar", "merge-raml.lock"] {
            std::fs::write(bin.join(name), "").unwrap();
        }
        let installer = MergeRamlInstaller::new(bin, DEFAULT_RELEASES_API, DEFAULT_VERSION, Remote::new().unwrap());

        installer.remove_artifacts().unwrap();

        assert!(!bin.join("merge-raml").exists());
        assert!(bin.join("raml-to-jaxrs.jar").exists());
        assert!(bin.join("merge-raml.lock").exists());
    }
}
