//! Command-line contracts of the RAML tools: the merge tool, the
//! RAML to JAX-RS generator and the HTML documentation renderer.

use anyhow::{bail, Context, Result};
use camino::{FromPathBufError, Utf8Path, Utf8PathBuf};
use forge_exec::{ExecCommand, Redirect};
use forge_patch::GeneratedLayout;
use fs_err as fs;
use tracing::{debug, info};
use which::which;

pub const DOCS_THEME: &str = "raml2html-modern-theme";

fn fallback_utf8_path(err: FromPathBufError) -> Utf8PathBuf {
    let path = err.into_path_buf();
    Utf8PathBuf::from(path.to_string_lossy().to_string())
}

/// Runs the installed `raml-to-jaxrs.jar` through `java -jar`.
#[derive(Debug, Clone)]
pub struct GeneratorDriver {
    java: String,
    jar: Utf8PathBuf,
    extra_args: Vec<String>,
}

impl GeneratorDriver {
    pub fn new(jar: impl Into<Utf8PathBuf>, extra_args: Vec<String>) -> Self {
        Self {
            java: "java".to_string(),
            jar: jar.into(),
            extra_args,
        }
    }

    pub fn command(
        &self,
        api_definition: &Utf8Path,
        source_dir: &Utf8Path,
        layout: &GeneratedLayout,
    ) -> ExecCommand {
        ExecCommand::new(&self.java)
            .arg("-jar")
            .arg(self.jar.as_str())
            .arg(api_definition.as_str())
            .args(["--directory", source_dir.as_str()])
            .args(["--generate-types-with", "jackson"])
            .args(["--model-package".to_string(), layout.model_package()])
            .args(["--resource-package".to_string(), layout.resource_package()])
            .args(["--support-package".to_string(), layout.support_package()])
            .args(self.extra_args.iter().cloned())
    }

    /// Regenerates the sources from scratch. The previous `generated`
    /// package is removed first so files for deleted types do not linger.
    pub fn run(
        &self,
        api_definition: &Utf8Path,
        source_dir: &Utf8Path,
        layout: &GeneratedLayout,
    ) -> Result<()> {
        if !self.jar.is_file() {
            bail!("generator {} is not installed", self.jar);
        }
        if !api_definition.is_file() {
            bail!("api definition {api_definition} does not exist");
        }
        let root = layout.root();
        if root.exists() {
            debug!(%root, "removing previously generated sources");
            fs::remove_dir_all(root).with_context(|| format!("removing {root}"))?;
        }
        info!(%api_definition, "generating jax-rs sources");
        self.command(api_definition, source_dir, layout)
            .run()
            .context("raml-to-jaxrs generation failed")?;
        if !root.is_dir() {
            bail!("generator finished but produced no sources under {root}");
        }
        Ok(())
    }
}

/// Runs the `merge-raml` binary over a schema directory.
#[derive(Debug, Clone)]
pub struct MergeDriver {
    binary: Utf8PathBuf,
    excluded: Vec<String>,
}

impl MergeDriver {
    /// `excluded` entries are matched by file name only.
    pub fn new(binary: impl Into<Utf8PathBuf>, excluded: &[String]) -> Self {
        let excluded = excluded
            .iter()
            .map(|entry| {
                Utf8Path::new(entry)
                    .file_name()
                    .unwrap_or(entry.as_str())
                    .to_string()
            })
            .collect();
        Self {
            binary: binary.into(),
            excluded,
        }
    }

    /// The merged file itself lives in the schema tree, so its name is
    /// always excluded.
    pub fn command(&self, schema_root: &Utf8Path, output: &Utf8Path) -> ExecCommand {
        let mut excluded = self.excluded.clone();
        if let Some(name) = output.file_name() {
            if !excluded.iter().any(|e| e == name) {
                excluded.push(name.to_string());
            }
        }
        let mut cmd = ExecCommand::new(self.binary.as_str());
        for name in excluded {
            cmd = cmd.arg("-x").arg(name);
        }
        cmd.arg(schema_root.as_str())
            .stdout(Redirect::File(output.to_path_buf()))
    }

    pub fn run(&self, schema_root: &Utf8Path, output: &Utf8Path) -> Result<()> {
        if !self.binary.is_file() {
            bail!("merge tool {} is not installed", self.binary);
        }
        if !schema_root.is_dir() {
            bail!("schema directory {schema_root} does not exist");
        }
        if output.exists() {
            fs::remove_file(output)?;
        }
        info!(%schema_root, %output, "merging raml");
        let result = self
            .command(schema_root, output)
            .run()
            .context("merge-raml failed")?;
        if !result.stderr.trim().is_empty() {
            debug!(stderr = %result.stderr.trim(), "merge-raml diagnostics");
        }
        Ok(())
    }
}

/// Renders HTML API documentation with `raml2html`.
#[derive(Debug, Clone)]
pub struct DocsDriver {
    binary: Utf8PathBuf,
}

impl DocsDriver {
    pub fn detect() -> Option<Self> {
        which("raml2html").ok().map(|path| Self {
            binary: Utf8PathBuf::try_from(path).unwrap_or_else(fallback_utf8_path),
        })
    }

    pub fn with_binary(binary: impl Into<Utf8PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn command(&self, api_definition: &Utf8Path, output: &Utf8Path) -> ExecCommand {
        ExecCommand::new(self.binary.as_str())
            .arg(api_definition.as_str())
            .args(["--theme", DOCS_THEME])
            .stdout(Redirect::File(output.to_path_buf()))
    }

    /// Writes the docs to `output` and copies them into each of `copy_dirs`
    /// under the same file name.
    pub fn run(
        &self,
        api_definition: &Utf8Path,
        output: &Utf8Path,
        copy_dirs: &[Utf8PathBuf],
    ) -> Result<Vec<Utf8PathBuf>> {
        if !api_definition.is_file() {
            bail!("api definition {api_definition} does not exist");
        }
        self.command(api_definition, output)
            .run()
            .context("raml2html failed")?;
        let name = output
            .file_name()
            .with_context(|| format!("{output} has no file name"))?;
        let mut written = vec![output.to_path_buf()];
        for dir in copy_dirs {
            fs::create_dir_all(dir)?;
            let target = dir.join(name);
            if target != output {
                fs::copy(output, &target)
                    .with_context(|| format!("copying {output} to {target}"))?;
                written.push(target);
            }
        }
        info!(docs = %output, copies = written.len() - 1, "api docs rendered");
        Ok(written)
    }
}
