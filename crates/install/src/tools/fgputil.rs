//! Prebuilt FgpUtil library jars, vendored into the project.

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use super::{move_file, remove_matching};
use crate::installer::{DependencyDescriptor, Installer};
use crate::remote::Remote;

pub const DEFAULT_RELEASES_URL: &str = "https://github.com/VEuPathDB/FgpUtil/releases";
pub const DEFAULT_VERSION: &str = "latest";
pub const DEFAULT_JARS: [&str; 14] = [
    "fgputil-accountdb-1.0.0.jar",
    "fgputil-cache-1.0.0.jar",
    "fgputil-cli-1.0.0.jar",
    "fgputil-client-1.0.0.jar",
    "fgputil-core-1.0.0.jar",
    "fgputil-db-1.0.0.jar",
    "fgputil-events-1.0.0.jar",
    "fgputil-json-1.0.0.jar",
    "fgputil-server-1.0.0.jar",
    "fgputil-servlet-1.0.0.jar",
    "fgputil-solr-1.0.0.jar",
    "fgputil-test-1.0.0.jar",
    "fgputil-web-1.0.0.jar",
    "fgputil-xml-1.0.0.jar",
];
const LOCK_NAME: &str = "fgputil.lock";
const JAR_PREFIX: &str = "fgputil";

#[derive(Debug, Clone)]
pub struct FgpUtilInstaller {
    descriptor: DependencyDescriptor,
    vendor_dir: Utf8PathBuf,
    jars: Vec<String>,
    remote: Remote,
}

impl FgpUtilInstaller {
    pub fn new(
        vendor_dir: impl Into<Utf8PathBuf>,
        releases_url: &str,
        version: &str,
        jars: Vec<String>,
        remote: Remote,
    ) -> Self {
        Self {
            descriptor: DependencyDescriptor::new("fgputil", releases_url, version),
            vendor_dir: vendor_dir.into(),
            jars,
            remote,
        }
    }

    fn releases_url(&self) -> &str {
        self.descriptor.source_url.trim_end_matches('/')
    }

    pub fn jar_url(&self, tag: &str, jar: &str) -> String {
        format!("{}/download/{tag}/{jar}", self.releases_url())
    }
}

impl Installer for FgpUtilInstaller {
    fn descriptor(&self) -> &DependencyDescriptor {
        &self.descriptor
    }

    fn root(&self) -> &Utf8Path {
        &self.vendor_dir
    }

    fn lock_file(&self) -> Utf8PathBuf {
        self.vendor_dir.join(LOCK_NAME)
    }

    fn resolve_version(&self) -> Result<String> {
        if !self.descriptor.wants_latest() {
            return Ok(self.descriptor.target_version.clone());
        }
        let tag = self
            .remote
            .latest_tag(&format!("{}/latest", self.releases_url()))?;
        debug!(%tag, "resolved latest FgpUtil release");
        Ok(tag)
    }

    fn artifacts_present(&self) -> bool {
        self.jars.iter().all(|jar| self.vendor_dir.join(jar).is_file())
    }

    fn remove_artifacts(&self) -> Result<()> {
        remove_matching(&self.vendor_dir, |name| {
            name.starts_with(JAR_PREFIX) && name.ends_with(".jar")
        })?;
        Ok(())
    }

    fn download(&self, version: &str, work_dir: &Utf8Path) -> Result<()> {
        for jar in &self.jars {
            self.remote
                .download(&self.jar_url(version, jar), &work_dir.join(jar))?;
        }
        Ok(())
    }

    fn build_and_install(&self, _version: &str, work_dir: &Utf8Path) -> Result<()> {
        for jar in &self.jars {
            move_file(&work_dir.join(jar), &self.vendor_dir.join(jar))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installer(version: &str) -> FgpUtilInstaller {
        FgpUtilInstaller::new(
            "/tmp/p/vendor",
            DEFAULT_RELEASES_URL,
            version,
            vec!["fgputil-core-1.0.0.jar".into()],
            Remote::new().unwrap(),
        )
    }

    #[test]
    fn jar_urls_use_release_tag() {
        assert_eq!(
            installer("v2.10.0").jar_url("v2.10.0", "fgputil-core-1.0.0.jar"),
            "https://github.com/VEuPathDB/FgpUtil/releases/download/v2.10.0/fgputil-core-1.0.0.jar"
        );
    }

    #[test]
    fn pinned_version_is_used_as_is() {
        assert_eq!(installer("v2.10.0").resolve_version().unwrap(), "v2.10.0");
        assert!(installer("latest").descriptor().wants_latest());
    }
}
