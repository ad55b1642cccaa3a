use anyhow::{bail, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use forge_install::tools::{fgputil, merge_raml, raml4jaxrs};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "container-forge.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServiceSection {
    name: Option<String>,
    project_package: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RamlSection {
    schema_root_dir: Option<String>,
    root_api_definition: Option<String>,
    merged_output_file: Option<String>,
    merge_excluded_files: Option<Vec<String>>,
    merge_tool_version: Option<String>,
    generator_args: Option<Vec<String>>,
    generate_model_streams: Option<bool>,
    source_dir: Option<String>,
    api_doc_output_file: Option<String>,
    resource_docs_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ToolsSection {
    bin_dir: Option<String>,
    vendor_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Raml4JaxRsSection {
    url: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FgpUtilSection {
    version: Option<String>,
    targets: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DockerSection {
    image_name: Option<String>,
    context: Option<String>,
    dockerfile: Option<String>,
    arguments: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    service: Option<ServiceSection>,
    raml: Option<RamlSection>,
    tools: Option<ToolsSection>,
    raml4jaxrs: Option<Raml4JaxRsSection>,
    fgputil: Option<FgpUtilSection>,
    docker: Option<DockerSection>,
}

/// Project settings with defaults applied and paths made absolute against
/// the directory holding the config file.
#[derive(Debug, Clone)]
pub struct ForgeConfig {
    pub project_root: Utf8PathBuf,
    pub service_name: String,
    pub project_package: String,

    pub schema_root_dir: Utf8PathBuf,
    pub root_api_definition: Utf8PathBuf,
    pub merged_output_file: Utf8PathBuf,
    pub merge_excluded_files: Vec<String>,
    pub merge_tool_version: String,
    pub generator_args: Vec<String>,
    pub generate_model_streams: bool,
    pub source_dir: Utf8PathBuf,
    pub api_doc_output_file: Utf8PathBuf,
    pub resource_docs_dir: Utf8PathBuf,

    pub bin_dir: Utf8PathBuf,
    pub vendor_dir: Utf8PathBuf,

    pub raml4jaxrs_url: String,
    pub raml4jaxrs_version: String,

    pub fgputil_version: String,
    pub fgputil_targets: Vec<String>,

    pub docker_image: String,
    pub docker_context: Utf8PathBuf,
    pub dockerfile: String,
    pub docker_args: Vec<String>,
}

impl ForgeConfig {
    /// Loads `path`, or `container-forge.toml` in the working directory when
    /// no path is given. Only an explicitly named file has to exist.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Utf8PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !path.is_file() {
            if required {
                bail!("config file {path} does not exist");
            }
            return Self::from_toml("", Utf8Path::new("."));
        }
        let data =
            fs_err::read_to_string(&path).with_context(|| format!("reading config {path}"))?;
        let base = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };
        Self::from_toml(&data, &base).with_context(|| format!("parsing {path}"))
    }

    pub fn from_toml(data: &str, base: &Utf8Path) -> Result<Self> {
        let raw: RawConfig = toml::from_str(data)?;
        let project_root = base.to_path_buf();

        let service = raw.service.unwrap_or_default();
        let raml = raw.raml.unwrap_or_default();
        let tools = raw.tools.unwrap_or_default();
        let generator = raw.raml4jaxrs.unwrap_or_default();
        let vendored = raw.fgputil.unwrap_or_default();
        let docker = raw.docker.unwrap_or_default();

        let service_name = service
            .name
            .unwrap_or_else(|| "demo-service".to_string());
        let project_package = service
            .project_package
            .unwrap_or_else(|| "org.veupathdb.service.demo".to_string());
        if project_package.split('.').any(|part| part.trim().is_empty()) {
            bail!("service.project_package {project_package:?} is not a java package name");
        }

        let schema_root_dir = resolve_path(
            &project_root,
            raml.schema_root_dir
                .unwrap_or_else(|| "schema".to_string()),
        );
        let merged_output_file = match raml.merged_output_file {
            Some(file) => resolve_path(&project_root, file),
            None => schema_root_dir.join("library.raml"),
        };

        Ok(Self {
            root_api_definition: resolve_path(
                &project_root,
                raml.root_api_definition
                    .unwrap_or_else(|| "api.raml".to_string()),
            ),
            merged_output_file,
            schema_root_dir,
            merge_excluded_files: raml.merge_excluded_files.unwrap_or_default(),
            merge_tool_version: raml
                .merge_tool_version
                .unwrap_or_else(|| merge_raml::DEFAULT_VERSION.to_string()),
            generator_args: raml.generator_args.unwrap_or_default(),
            generate_model_streams: raml.generate_model_streams.unwrap_or(true),
            source_dir: resolve_path(
                &project_root,
                raml.source_dir
                    .unwrap_or_else(|| "src/main/java".to_string()),
            ),
            api_doc_output_file: resolve_path(
                &project_root,
                raml.api_doc_output_file
                    .unwrap_or_else(|| "docs/api.html".to_string()),
            ),
            resource_docs_dir: resolve_path(
                &project_root,
                raml.resource_docs_dir
                    .unwrap_or_else(|| "src/main/resources".to_string()),
            ),
            bin_dir: resolve_path(
                &project_root,
                tools.bin_dir.unwrap_or_else(|| ".bin".to_string()),
            ),
            vendor_dir: resolve_path(
                &project_root,
                tools.vendor_dir.unwrap_or_else(|| "vendor".to_string()),
            ),
            raml4jaxrs_url: generator
                .url
                .unwrap_or_else(|| raml4jaxrs::DEFAULT_URL.to_string()),
            raml4jaxrs_version: generator
                .version
                .unwrap_or_else(|| raml4jaxrs::DEFAULT_VERSION.to_string()),
            fgputil_version: vendored
                .version
                .unwrap_or_else(|| fgputil::DEFAULT_VERSION.to_string()),
            fgputil_targets: vendored.targets.unwrap_or_else(|| {
                fgputil::DEFAULT_JARS.iter().map(|jar| jar.to_string()).collect()
            }),
            docker_image: docker.image_name.unwrap_or_else(|| service_name.clone()),
            docker_context: resolve_path(
                &project_root,
                docker.context.unwrap_or_else(|| ".".to_string()),
            ),
            dockerfile: docker
                .dockerfile
                .unwrap_or_else(|| "Dockerfile".to_string()),
            docker_args: docker.arguments.unwrap_or_default(),
            project_root,
            service_name,
            project_package,
        })
    }
}

fn resolve_path(base: &Utf8Path, value: impl Into<Utf8PathBuf>) -> Utf8PathBuf {
    let candidate = value.into();
    if candidate.is_absolute() {
        candidate
    } else {
        base.join(candidate)
    }
}
