//! The RAML to JAX-RS generator, built from source with Maven.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use forge_exec::git::{self, CloneOptions};
use forge_exec::maven;
use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use super::{move_file, remove_matching};
use crate::installer::{DependencyDescriptor, Installer};
use crate::InstallError;

pub const DEFAULT_URL: &str = "https://github.com/mulesoft-labs/raml-for-jax-rs.git";
pub const DEFAULT_VERSION: &str = "3.0.7";
pub const JAR_NAME: &str = "raml-to-jaxrs.jar";
const LOCK_NAME: &str = "raml4jaxrs.lock";
const CLI_MODULE: &str = "raml-to-jaxrs/raml-to-jaxrs-cli";
const ARTIFACT_SUFFIX: &str = "dependencies.jar";

fn snapshot_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.\d+\.\d+-SNAPSHOT").expect("invalid snapshot regex"))
}

#[derive(Debug, Clone)]
pub struct Raml4JaxRsInstaller {
    descriptor: DependencyDescriptor,
    bin_dir: Utf8PathBuf,
}

impl Raml4JaxRsInstaller {
    pub fn new(bin_dir: impl Into<Utf8PathBuf>, url: &str, version: &str) -> Self {
        Self {
            descriptor: DependencyDescriptor::new("raml4jaxrs", url, version),
            bin_dir: bin_dir.into(),
        }
    }

    pub fn jar(&self) -> Utf8PathBuf {
        self.bin_dir.join(JAR_NAME)
    }
}

impl Installer for Raml4JaxRsInstaller {
    fn descriptor(&self) -> &DependencyDescriptor {
        &self.descriptor
    }

    fn root(&self) -> &Utf8Path {
        &self.bin_dir
    }

    fn lock_file(&self) -> Utf8PathBuf {
        self.bin_dir.join(LOCK_NAME)
    }

    fn artifacts_present(&self) -> bool {
        self.jar().is_file()
    }

    fn remove_artifacts(&self) -> Result<()> {
        remove_matching(&self.bin_dir, |name| name == JAR_NAME)?;
        Ok(())
    }

    fn download(&self, version: &str, work_dir: &Utf8Path) -> Result<()> {
        git::clone(
            &self.descriptor.source_url,
            work_dir,
            &CloneOptions::shallow(version),
        )?;
        Ok(())
    }

    fn build_and_install(&self, version: &str, work_dir: &Utf8Path) -> Result<()> {
        let repo = work_dir.join(git::repo_dir_name(&self.descriptor.source_url));
        let patched = correct_pom_versions(&repo, version)?;
        debug!(poms = patched.len(), "pinned snapshot versions");

        maven::clean_install(&repo.join(CLI_MODULE))?;

        let artifact = maven::find_artifacts(&repo, "target", ARTIFACT_SUFFIX)?
            .into_iter()
            .next()
            .ok_or_else(|| InstallError::MissingArtifact {
                name: self.descriptor.name.clone(),
                suffix: ARTIFACT_SUFFIX.to_string(),
            })?;
        move_file(&artifact, &self.jar())
    }
}

/// Pins every `x.y.z-SNAPSHOT` version in the checkout's `pom.xml` files to
/// `version` so the modules resolve against each other. Hidden and `src`
/// directories are not searched.
pub fn correct_pom_versions(repo: &Utf8Path, version: &str) -> Result<Vec<Utf8PathBuf>> {
    let mut patched = Vec::new();
    let walker = WalkDir::new(repo).into_iter().filter_entry(|entry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        !name.starts_with('.') && name != "src"
    });
    for entry in walker {
        let entry = entry.with_context(|| format!("walking {repo}"))?;
        if !entry.file_type().is_file() || entry.file_name() != "pom.xml" {
            continue;
        }
        let Some(pom) = Utf8Path::from_path(entry.path()) else {
            continue;
        };
        let changed = forge_patch::rewrite::rewrite(pom, |input| {
            Ok(snapshot_pattern()
                .replace_all(input, regex::NoExpand(version))
                .into_owned())
        })?;
        if changed {
            patched.push(pom.to_path_buf());
        }
    }
    Ok(patched)
}
