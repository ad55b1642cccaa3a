use anyhow::{Context, Result};
use camino::Utf8PathBuf;

use crate::{ExecCommand, Redirect};

#[derive(Debug, Clone)]
pub struct DockerBuild {
    pub context: Utf8PathBuf,
    pub dockerfile: String,
    pub image: String,
    pub build_args: Vec<(String, String)>,
    pub extra_args: Vec<String>,
}

impl DockerBuild {
    pub fn command(&self) -> ExecCommand {
        let mut cmd = ExecCommand::new("docker")
            .args(["build", "--no-cache", "--file"])
            .arg(self.context.join(&self.dockerfile).as_str())
            .arg("--tag")
            .arg(self.image.as_str());
        for (key, value) in &self.build_args {
            cmd = cmd.arg(format!("--build-arg={key}={value}"));
        }
        cmd.args(self.extra_args.iter().cloned())
            .arg(self.context.as_str())
            .stderr(Redirect::Inherit)
    }

    pub fn run(&self) -> Result<()> {
        self.command()
            .run()
            .with_context(|| format!("building image {}", self.image))?;
        Ok(())
    }
}

/// Fails unless the docker daemon answers for the current user.
pub fn check_access() -> Result<()> {
    ExecCommand::new("docker")
        .arg("ps")
        .stdout(Redirect::Null)
        .run()
        .context("docker is not reachable; is the daemon running and is this user allowed to use it?")?;
    Ok(())
}
