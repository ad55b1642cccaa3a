//! Text patches applied to the Java sources emitted by the RAML to JAX-RS
//! generator.
//!
//! Passes rewrite the generator's files in place and are meant to run in
//! [`PatchPass::ALL`] order: later passes match on the text left behind by
//! earlier ones. Each pass rescans whole files and leaves already patched
//! sources alone, so rerunning the sequence is harmless.

pub mod const_name;
pub mod constants;
pub mod discriminator;
pub mod enums;
mod error;
pub mod layout;
pub mod responses;
pub mod rewrite;
pub mod streams;
pub mod substitution;

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use tracing::info;

pub use const_name::{compute_const_name, ConstantTable};
pub use error::PatchError;
pub use layout::GeneratedLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchPass {
    Discriminators,
    EnumValues,
    Streams,
    JakartaImports,
    BoxedTypes,
    FileResponses,
    Dates,
    ResponseDelegate,
    ResponseTypes,
    FieldConstants,
    UrlConstants,
}

impl PatchPass {
    pub const ALL: [PatchPass; 11] = [
        PatchPass::Discriminators,
        PatchPass::EnumValues,
        PatchPass::Streams,
        PatchPass::JakartaImports,
        PatchPass::BoxedTypes,
        PatchPass::FileResponses,
        PatchPass::Dates,
        PatchPass::ResponseDelegate,
        PatchPass::ResponseTypes,
        PatchPass::FieldConstants,
        PatchPass::UrlConstants,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PatchPass::Discriminators => "discriminators",
            PatchPass::EnumValues => "enum-values",
            PatchPass::Streams => "streams",
            PatchPass::JakartaImports => "jakarta-imports",
            PatchPass::BoxedTypes => "boxed-types",
            PatchPass::FileResponses => "file-responses",
            PatchPass::Dates => "dates",
            PatchPass::ResponseDelegate => "response-delegate",
            PatchPass::ResponseTypes => "response-types",
            PatchPass::FieldConstants => "field-constants",
            PatchPass::UrlConstants => "url-constants",
        }
    }

    /// Runs the pass over `layout`, returning every file written.
    pub fn run(self, layout: &GeneratedLayout) -> Result<Vec<Utf8PathBuf>> {
        let touched = match self {
            PatchPass::Discriminators => discriminator::run(layout),
            PatchPass::EnumValues => enums::run(layout),
            PatchPass::Streams => streams::run(layout),
            PatchPass::JakartaImports => substitution::run_jakarta_imports(layout),
            PatchPass::BoxedTypes => substitution::run_boxed_types(layout),
            PatchPass::FileResponses => substitution::run_file_responses(layout),
            PatchPass::Dates => substitution::run_dates(layout),
            PatchPass::ResponseDelegate => responses::run_response_delegate(layout),
            PatchPass::ResponseTypes => responses::run_response_types(layout),
            PatchPass::FieldConstants => constants::run_field_constants(layout),
            PatchPass::UrlConstants => constants::run_url_constants(layout),
        }
        .with_context(|| format!("{} pass failed", self.name()))?;
        info!(pass = self.name(), files = touched.len(), "patch pass complete");
        Ok(touched)
    }
}

impl fmt::Display for PatchPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PatchPass {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        PatchPass::ALL
            .into_iter()
            .find(|pass| pass.name() == s)
            .with_context(|| format!("unknown patch pass {s}"))
    }
}
