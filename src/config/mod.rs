pub mod cli;
pub mod provider;
pub mod toml_config;

use crate::config::provider::ProviderConfig;
use crate::core::session::Credentials;
use crate::utils::error::Result;
use crate::utils::validation::{validate_mobile_number, validate_non_empty_string, Validate};
#[cfg(feature = "cli")]
use crate::{config::toml_config::TomlConfig, utils::validation::validate_required_field};
#[cfg(all(test, feature = "cli"))]
use crate::utils::error::UsageError;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::fmt;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "telkom-bytes")]
#[command(about = "Report remaining Telkom Mobile data bundles")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "compact", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Clone, Subcommand)]
pub enum Command {
    /// Query the on-net portal (must be connected through the mobile network)
    Onnet {
        #[arg(long, env = "TELKOM_MOBILE_NUMBER")]
        mobile_number: Option<String>,
    },
    /// Log in to the self-service portal and query every associated line
    Portal {
        #[arg(long, env = "TELKOM_USERNAME")]
        username: Option<String>,

        #[arg(long, env = "TELKOM_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

#[cfg(feature = "cli")]
impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Onnet { mobile_number } => f
                .debug_struct("Onnet")
                .field("mobile_number", mobile_number)
                .finish(),
            Command::Portal { username, password } => f
                .debug_struct("Portal")
                .field("username", username)
                .field("password", &password.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

/// Which retrieval path to run, with its inputs.
#[derive(Debug, Clone)]
pub enum Retrieval {
    OnNet { mobile_number: String },
    Portal { credentials: Credentials },
}

/// Command line merged over the config file; flags win.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider: ProviderConfig,
    pub retrieval: Retrieval,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let file = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                file
            }
            None => TomlConfig::default(),
        };
        resolve_with_file(&self.command, file)
    }
}

#[cfg(feature = "cli")]
fn resolve_with_file(command: &Command, file: TomlConfig) -> Result<ResolvedConfig> {
    let retrieval = match command {
        Command::Onnet { mobile_number } => {
            let mobile_number = mobile_number.clone().or_else(|| file.mobile_number.clone());
            Retrieval::OnNet {
                mobile_number: validate_required_field("mobile_number", &mobile_number)?.clone(),
            }
        }
        Command::Portal { username, password } => {
            let username = username
                .clone()
                .or_else(|| file.username().map(str::to_string));
            let password = password
                .clone()
                .or_else(|| file.password().map(str::to_string));
            Retrieval::Portal {
                credentials: Credentials::new(
                    validate_required_field("username", &username)?.clone(),
                    validate_required_field("password", &password)?.clone(),
                ),
            }
        }
    };

    Ok(ResolvedConfig {
        provider: file.provider,
        retrieval,
    })
}

impl Validate for ResolvedConfig {
    fn validate(&self) -> Result<()> {
        self.provider.validate()?;
        match &self.retrieval {
            Retrieval::OnNet { mobile_number } => {
                validate_mobile_number("mobile_number", mobile_number)
            }
            Retrieval::Portal { credentials } => {
                validate_non_empty_string("username", &credentials.username)?;
                validate_non_empty_string("password", &credentials.password)
            }
        }
    }
}
