//! Versioned installation of the external tools and vendored libraries a
//! service build depends on.
//!
//! Each dependency is an [`Installer`]; [`install`] drives it through the
//! new/update/skip lifecycle recorded in a per-tool lock file.

mod error;
pub mod installer;
pub mod lock;
pub mod remote;
pub mod state;
pub mod tools;

pub use error::InstallError;
pub use installer::{clean, install, DependencyDescriptor, InstallOutcome, Installer, LATEST};
pub use remote::Remote;
pub use state::InstallState;
