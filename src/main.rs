mod commands;
mod config;

use anyhow::Result;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use config::ForgeConfig;

#[derive(Parser, Debug)]
#[command(
    name = "container-forge",
    version,
    about = "Builds RAML driven JAX-RS services: installs the tooling, generates sources and patches them"
)]
struct Cli {
    /// Project config file (default: ./container-forge.toml)
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON summaries
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install the RAML to JAX-RS generator and the RAML merge tool
    Install,
    /// Download the vendored FgpUtil jars
    Vendor,
    /// Remove an installed tool and its lock file
    Uninstall(UninstallArgs),
    /// Merge the schema directory into a single RAML library
    MergeRaml,
    /// Render HTML API documentation from the root RAML definition
    Docs,
    /// Install, merge, generate and patch in one go
    Generate,
    /// Re-run patch passes over already generated sources
    Patch(PatchArgs),
    /// Build the service container image
    DockerBuild,
    /// Check that the external tools are available
    Doctor,
}

#[derive(Args, Debug)]
struct UninstallArgs {
    #[arg(value_enum)]
    tool: commands::Tool,
}

#[derive(Args, Debug)]
struct PatchArgs {
    /// Only run these passes, in pipeline order (repeatable)
    #[arg(long = "pass", value_name = "NAME")]
    passes: Vec<forge_patch::PatchPass>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let cfg = ForgeConfig::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Install => commands::install::run(&cfg, cli.json),
        Commands::Vendor => commands::install::vendor(&cfg, cli.json),
        Commands::Uninstall(args) => commands::uninstall::run(&cfg, args.tool),
        Commands::MergeRaml => commands::merge::run(&cfg),
        Commands::Docs => commands::docs::run(&cfg),
        Commands::Generate => commands::generate::run(&cfg, cli.json),
        Commands::Patch(args) => commands::patch::run(&cfg, &args.passes, cli.json),
        Commands::DockerBuild => commands::docker::run(&cfg),
        Commands::Doctor => commands::doctor::run(cli.json),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
