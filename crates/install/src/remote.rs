//! GitHub release lookups and artifact downloads.

use std::io;

use anyhow::{Context, Result};
use camino::Utf8Path;
use fs_err as fs;
use reqwest::blocking::Client;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use serde::Deserialize;
use tracing::debug;

use crate::InstallError;

const USER_AGENT: &str = concat!("container-forge/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

impl Release {
    /// The asset built for `platform` (`linux` or `darwin`).
    pub fn asset_for(&self, platform: &str) -> Result<&Asset> {
        self.assets
            .iter()
            .find(|a| a.browser_download_url.contains(platform))
            .ok_or_else(|| {
                InstallError::MissingAsset {
                    tag: self.tag_name.clone(),
                    platform: platform.to_string(),
                }
                .into()
            })
    }
}

/// Release asset naming for the running OS.
pub fn current_platform() -> Result<&'static str> {
    match std::env::consts::OS {
        "linux" => Ok("linux"),
        "macos" => Ok("darwin"),
        other => Err(InstallError::UnsupportedPlatform(other.to_string()).into()),
    }
}

#[derive(Debug, Clone)]
pub struct Remote {
    client: Client,
    no_redirect: Client,
}

impl Remote {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("building http client")?;
        let no_redirect = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            no_redirect,
        })
    }

    /// Release metadata from `<api_url>/latest` or `<api_url>/tags/<version>`.
    pub fn release(&self, api_url: &str, version: &str) -> Result<Release> {
        let url = release_url(api_url, version);
        debug!(%url, "fetching release metadata");
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .with_context(|| format!("requesting {url}"))?;
        if !response.status().is_success() {
            return Err(InstallError::HttpStatus {
                url,
                status: response.status().as_u16(),
            }
            .into());
        }
        response
            .json::<Release>()
            .with_context(|| format!("parsing release metadata from {url}"))
    }

    /// Tag a `.../releases/latest` page redirects to, read from the
    /// `Location` header without following it.
    pub fn latest_tag(&self, latest_url: &str) -> Result<String> {
        let response = self
            .no_redirect
            .get(latest_url)
            .send()
            .with_context(|| format!("requesting {latest_url}"))?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| InstallError::MissingLocation(latest_url.to_string()))?;
        tag_from_location(location)
            .map(str::to_string)
            .ok_or_else(|| InstallError::MissingLocation(latest_url.to_string()).into())
    }

    /// Downloads `url` to `dest`, following redirects.
    pub fn download(&self, url: &str, dest: &Utf8Path) -> Result<()> {
        debug!(%url, %dest, "downloading");
        let mut response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("requesting {url}"))?;
        if !response.status().is_success() {
            return Err(InstallError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            }
            .into());
        }
        let mut file = fs::File::create(dest)?;
        io::copy(&mut response, &mut file).with_context(|| format!("writing {dest}"))?;
        Ok(())
    }
}

pub fn release_url(api_url: &str, version: &str) -> String {
    let base = api_url.trim_end_matches('/');
    if version.eq_ignore_ascii_case(crate::LATEST) {
        format!("{base}/latest")
    } else {
        format!("{base}/tags/{version}")
    }
}

pub fn tag_from_location(location: &str) -> Option<&str> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|tag| !tag.is_empty() && *tag != "latest")
}
