//! CLI command definitions and dispatch.
//!
//! Each group of subcommands lives in its own submodule:
//! - `tools`: list and call catalog tools
//! - `mapping`: resolve ids and warm the name caches
//! - `settings`: show and save the configuration

mod mapping;
mod settings;
mod tools;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::config::{self, Config, Credentials};
use crate::error::{Result, ResultExt};
use crate::mapping::{CacheDomain, MappingConfig, MappingRegistry};
use crate::records::{AutotaskClient, RecordsApi};

pub use mapping::{cmd_resolve, cmd_warm};
pub use settings::cmd_config;
pub use tools::{cmd_call, cmd_tools};

/// Autotask Mapper CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// API credentials; each falls back to an environment variable, then the config file
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// API user name
    #[arg(long, env = "AUTOTASK_USERNAME", global = true)]
    pub username: Option<String>,
    /// API user secret
    #[arg(long, env = "AUTOTASK_SECRET", global = true, hide_env_values = true)]
    pub secret: Option<String>,
    /// API integration code
    #[arg(long, env = "AUTOTASK_INTEGRATION_CODE", global = true, hide_env_values = true)]
    pub integration_code: Option<String>,
    /// Zone API base URL
    #[arg(long, env = "AUTOTASK_API_URL", global = true)]
    pub api_url: Option<String>,
}

impl From<&CredentialArgs> for Credentials {
    fn from(args: &CredentialArgs) -> Self {
        Credentials {
            username: args.username.clone(),
            secret: args.secret.clone(),
            integration_code: args.integration_code.clone(),
            api_url: args.api_url.clone(),
        }
    }
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List available tools
    Tools,
    /// Call a tool and print its JSON result
    Call {
        /// Tool name (see `tools`)
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
        /// Skip company/resource name enrichment
        #[arg(long)]
        raw: bool,
    },
    /// Resolve a company or resource id to its name
    Resolve {
        /// Which names to look in: company or resource
        domain: CacheDomain,
        /// Record id
        id: i64,
    },
    /// Fill both name caches and print cache statistics
    Warm,
    /// Show the config file path and effective configuration
    Config {
        /// Write the effective configuration (including credentials) to the config file
        #[arg(long)]
        save: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let config = effective_config(&cli.credentials);

    match &cli.command {
        Commands::Tools => cmd_tools(),
        Commands::Call { tool, args, raw } => cmd_call(&rt, &config, tool, args, *raw),
        Commands::Resolve { domain, id } => cmd_resolve(&rt, &config, *domain, *id),
        Commands::Warm => cmd_warm(&rt, &config),
        Commands::Config { save } => cmd_config(&config, *save),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Config file overlaid with credentials from flags and environment.
pub(crate) fn effective_config(args: &CredentialArgs) -> Config {
    let mut config = config::load();
    config.credentials.merge(args.into());
    config
}

/// Records API client for the configured credentials.
pub(crate) fn connect(config: &Config) -> Result<Arc<dyn RecordsApi>> {
    let client = AutotaskClient::new(&config.credentials)
        .with_context("connecting to the records API")?;
    tracing::debug!("Records API at {}", client.base_url());
    Ok(Arc::new(client))
}

/// Registry sharing `api`, configured from the `[mapping]` section.
pub(crate) fn registry(api: Arc<dyn RecordsApi>, config: &Config) -> Arc<MappingRegistry> {
    Arc::new(MappingRegistry::new(api, MappingConfig::from(&config.mapping)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::traits::mocks::MockRecords;
    use clap::CommandFactory;
    use std::time::Duration;

    async fn searches_after_acquire(warm_up: bool) -> usize {
        let mock = Arc::new(
            MockRecords::new()
                .with_companies(&[(100, "Acme Co")])
                .with_resources(&[(7, "Ada Lovelace")]),
        );
        let mut config = Config::default();
        config.mapping.warm_up = warm_up;

        registry(mock.clone(), &config).acquire();
        tokio::time::sleep(Duration::from_millis(50)).await;

        mock.calls().mapping_calls()
    }

    #[tokio::test]
    async fn test_registry_warms_up_when_configured() {
        assert_eq!(searches_after_acquire(true).await, 2);
    }

    #[tokio::test]
    async fn test_registry_skips_warm_up_when_disabled() {
        assert_eq!(searches_after_acquire(false).await, 0);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_call() {
        let cli = Cli::try_parse_from([
            "autotask-mapper",
            "call",
            "search_tickets",
            "--args",
            r#"{"companyID": 100}"#,
            "--raw",
        ])
        .unwrap();
        match cli.command {
            Commands::Call { tool, args, raw } => {
                assert_eq!(tool, "search_tickets");
                assert!(args.contains("companyID"));
                assert!(raw);
            }
            _ => panic!("expected call"),
        }
    }

    #[test]
    fn test_parse_resolve_domain() {
        let cli = Cli::try_parse_from(["autotask-mapper", "resolve", "resource", "7"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Resolve { domain: CacheDomain::Resource, id: 7 }
        ));
        assert!(Cli::try_parse_from(["autotask-mapper", "resolve", "planet", "7"]).is_err());
    }

    #[test]
    fn test_credential_flags_override() {
        let cli = Cli::try_parse_from([
            "autotask-mapper",
            "--username",
            "api@example.com",
            "warm",
        ])
        .unwrap();
        let mut credentials = Credentials {
            username: Some("file@example.com".into()),
            secret: Some("s3cret".into()),
            ..Default::default()
        };
        credentials.merge((&cli.credentials).into());
        assert_eq!(credentials.username.as_deref(), Some("api@example.com"));
        assert_eq!(credentials.secret.as_deref(), Some("s3cret"));
    }
}
