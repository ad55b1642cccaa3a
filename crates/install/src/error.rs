#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("no prebuilt release for platform {0}")]
    UnsupportedPlatform(String),
    #[error("release {tag} has no {platform} asset")]
    MissingAsset { tag: String, platform: String },
    #[error("{0} did not redirect to a concrete release")]
    MissingLocation(String),
    #[error("GET {url} returned {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("{name} still targets \"latest\" after version resolution")]
    UnresolvedVersion { name: String },
    #[error("build of {name} produced no artifact ending in {suffix}")]
    MissingArtifact { name: String, suffix: String },
}
