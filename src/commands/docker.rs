use std::env;

use anyhow::{bail, Result};
use forge_exec::docker::{self, DockerBuild};
use tracing::info;

use crate::config::ForgeConfig;

const CREDENTIAL_VARS: [&str; 2] = ["GITHUB_USERNAME", "GITHUB_TOKEN"];

pub fn run(cfg: &ForgeConfig) -> Result<()> {
    let build_args = credentials(|name| env::var(name).ok())?;
    docker::check_access()?;
    let build = DockerBuild {
        context: cfg.docker_context.clone(),
        dockerfile: cfg.dockerfile.clone(),
        image: cfg.docker_image.clone(),
        build_args,
        extra_args: cfg.docker_args.clone(),
    };
    info!(image = %build.image, context = %build.context, "building image");
    build.run()?;
    println!("built {}", build.image);
    Ok(())
}

/// Build arguments for the GitHub package credentials, all of which must be
/// set and non-empty.
fn credentials<F>(lookup: F) -> Result<Vec<(String, String)>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut args = Vec::new();
    let mut missing = Vec::new();
    for name in CREDENTIAL_VARS {
        match lookup(name).filter(|value| !value.trim().is_empty()) {
            Some(value) => args.push((name.to_string(), value)),
            None => missing.push(name),
        }
    }
    if !missing.is_empty() {
        bail!(
            "missing credentials for the container build: set {}",
            missing.join(" and ")
        );
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_become_build_args() {
        let args = credentials(|name| Some(format!("{}-value", name.to_lowercase()))).unwrap();
        assert_eq!(
            args,
            [
                ("GITHUB_USERNAME".to_string(), "github_username-value".to_string()),
                ("GITHUB_TOKEN".to_string(), "github_token-value".to_string()),
            ]
        );
    }

    #[test]
    fn missing_or_blank_credentials_are_reported() {
        let err = credentials(|name| (name == "GITHUB_USERNAME").then(|| " ".to_string()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing credentials for the container build: set GITHUB_USERNAME and GITHUB_TOKEN"
        );
    }
}
