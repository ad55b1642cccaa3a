use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tracing::{debug, info};

use crate::lock;
use crate::state::InstallState;
use crate::InstallError;

pub const LATEST: &str = "latest";

/// An external tool or library and the version wanted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDescriptor {
    pub name: String,
    pub source_url: String,
    /// A concrete version, or [`LATEST`].
    pub target_version: String,
}

impl DependencyDescriptor {
    pub fn new(
        name: impl Into<String>,
        source_url: impl Into<String>,
        target_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source_url: source_url.into(),
            target_version: target_version.into(),
        }
    }

    pub fn wants_latest(&self) -> bool {
        self.target_version.eq_ignore_ascii_case(LATEST)
    }
}

/// The tool specific steps of an install. [`install`] drives them.
pub trait Installer {
    fn descriptor(&self) -> &DependencyDescriptor;

    /// Directory holding the installed artifacts and the lock file.
    fn root(&self) -> &Utf8Path;

    fn lock_file(&self) -> Utf8PathBuf;

    /// Concrete version to install. Installers that accept [`LATEST`] look
    /// it up here.
    fn resolve_version(&self) -> Result<String> {
        Ok(self.descriptor().target_version.clone())
    }

    /// Whether the installed artifacts are all present.
    fn artifacts_present(&self) -> bool;

    /// Removes installed artifacts. The lock file is handled by the caller.
    fn remove_artifacts(&self) -> Result<()>;

    /// Fetches sources or prebuilt artifacts into `work_dir`.
    fn download(&self, version: &str, work_dir: &Utf8Path) -> Result<()>;

    /// Builds if needed and moves the final artifacts into [`Installer::root`].
    fn build_and_install(&self, version: &str, work_dir: &Utf8Path) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed { version: String },
    Updated { from: Option<String>, to: String },
    Skipped { version: String },
}

/// Removes the artifacts and the lock file.
pub fn clean(installer: &dyn Installer) -> Result<()> {
    let name = &installer.descriptor().name;
    installer
        .remove_artifacts()
        .with_context(|| format!("removing installed {name}"))?;
    lock::remove(&installer.lock_file())?;
    debug!(tool = %name, "cleaned");
    Ok(())
}

/// Brings the dependency to its target version. Running it again without a
/// config change does nothing.
///
/// The lock file is only written once every step succeeded, so a failed run
/// is retried from scratch next time.
pub fn install(installer: &dyn Installer) -> Result<InstallOutcome> {
    let descriptor = installer.descriptor();
    let version = installer
        .resolve_version()
        .with_context(|| format!("resolving {} version", descriptor.name))?;
    if version.eq_ignore_ascii_case(LATEST) {
        return Err(InstallError::UnresolvedVersion {
            name: descriptor.name.clone(),
        }
        .into());
    }

    let root = installer.root();
    let lock_file = installer.lock_file();
    let mut state = InstallState::determine(root, &lock_file, &version)?;
    if state == InstallState::Skip && !installer.artifacts_present() {
        debug!(tool = %descriptor.name, "lock present but artifacts missing, reinstalling");
        state = InstallState::Update;
    }
    info!(tool = %descriptor.name, %version, %state, "install state");

    let previous = match state {
        InstallState::Skip => return Ok(InstallOutcome::Skipped { version }),
        InstallState::Update => {
            let previous = lock::read(&lock_file)?;
            clean(installer)?;
            Some(previous)
        }
        InstallState::New => None,
    };

    fs::create_dir_all(root)?;
    let work_dir = tempfile::Builder::new()
        .prefix(&format!(".{}-build-", descriptor.name))
        .tempdir_in(root)
        .with_context(|| format!("creating build directory in {root}"))?;
    let work_path = Utf8Path::from_path(work_dir.path())
        .with_context(|| format!("non utf-8 build directory {}", work_dir.path().display()))?
        .to_path_buf();

    installer
        .download(&version, &work_path)
        .with_context(|| format!("downloading {} {version}", descriptor.name))?;
    installer
        .build_and_install(&version, &work_path)
        .with_context(|| format!("installing {} {version}", descriptor.name))?;
    lock::write(&lock_file, &version)?;
    work_dir
        .close()
        .with_context(|| format!("removing build directory {work_path}"))?;

    info!(tool = %descriptor.name, %version, "installed");
    Ok(match previous {
        Some(from) => InstallOutcome::Updated { from, to: version },
        None => InstallOutcome::Installed { version },
    })
}
