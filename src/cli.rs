//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (init, validate, features, check, migrate), and their
//! associated argument structs. Every flag has an environment variable
//! equivalent for container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "patchbay",
    version,
    about = "Feature-suite driven capability wiring for server applications",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        patchbay init                        Create a starter config\n  \
        patchbay check                       Resolve backends with ./patchbay.yaml\n  \
        patchbay check -F LocalOSS,MySQL     Resolve a specific suite\n\n  \
        Docs: https://github.com/julienandreu/patchbay"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a starter config file
    Init(InitArgs),

    /// Validate a config file and suite without constructing backends
    Validate(ValidateArgs),

    /// List declared features and the resolved suite
    Features(FeaturesArgs),

    /// Construct every active capability backend and report identities
    Check(CheckArgs),

    /// Run schema migrations with the selected SQL driver
    Migrate(MigrateArgs),
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Config file path (.yaml, .json, .toml); auto-detected when omitted
    #[arg(short, long, env = "PATCHBAY_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct SuiteArgs {
    /// Features to activate (comma separated or repeated)
    #[arg(
        short = 'F',
        long = "features",
        value_delimiter = ',',
        env = "PATCHBAY_FEATURES"
    )]
    pub features: Vec<String>,

    /// Do not union default-on features into the suite
    #[arg(long, env = "PATCHBAY_NO_DEFAULT")]
    pub no_default: bool,
}

#[derive(Args)]
pub struct LogArgs {
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        patchbay init                          Quick start config (yaml)\n  \
        patchbay init -i                       Interactive wizard\n  \
        patchbay init -f toml -o config.toml   Non-interactive, TOML format")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Launch interactive wizard to build the config step by step
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "patchbay.yaml")]
    pub config: PathBuf,

    #[command(flatten)]
    pub suite: SuiteArgs,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct FeaturesArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub suite: SuiteArgs,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        patchbay check                          Resolve with config defaults\n  \
        patchbay check -F LocalOSS --no-default Resolve an explicit suite")]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub suite: SuiteArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Args)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(flatten)]
    pub suite: SuiteArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
