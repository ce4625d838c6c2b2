//! Neo4j connection options shared by every subcommand.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use neotax_graph::GraphConfig;

/// Connection flags. Each one falls back to its environment variable, then to the config file,
/// then to the built-in default.
#[derive(Args, Default)]
pub struct ConnectionArgs {
    /// Neo4j host name or bolt:// URI
    #[arg(long, global = true, env = "NEO4J_HOST")]
    pub host: Option<String>,

    /// Neo4j user
    #[arg(long, global = true, env = "NEO4J_USER")]
    pub user: Option<String>,

    /// Neo4j password
    #[arg(long, global = true, env = "NEO4J_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Bolt port
    #[arg(long = "bolt_port", alias = "bolt-port", global = true, env = "NEO4J_BOLT_PORT")]
    pub bolt_port: Option<u16>,

    /// Database name
    #[arg(long, global = true, env = "NEO4J_DATABASE")]
    pub database: Option<String>,
}

impl std::fmt::Debug for ConnectionArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionArgs")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("bolt_port", &self.bolt_port)
            .field("database", &self.database)
            .finish()
    }
}

impl ConnectionArgs {
    /// Build the connection settings: defaults, then `config_file`, then flags/environment.
    pub fn resolve(&self, config_file: Option<&Path>) -> Result<GraphConfig> {
        let base = match config_file {
            Some(path) => GraphConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => GraphConfig::default(),
        };
        Ok(self.apply(base))
    }

    fn apply(&self, base: GraphConfig) -> GraphConfig {
        GraphConfig {
            host: self.host.clone().unwrap_or(base.host),
            user: self.user.clone().unwrap_or(base.user),
            password: self.password.clone().unwrap_or(base.password),
            bolt_port: self.bolt_port.unwrap_or(base.bolt_port),
            database: self.database.clone().unwrap_or(base.database),
            ..base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_keeps_defaults() {
        let config = ConnectionArgs::default().resolve(None).unwrap();
        assert_eq!(config, GraphConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let file = GraphConfig::from_toml_str(
            "[neo4j]\nhost = \"from-file\"\nuser = \"reader\"\nmax_retries = 1\n",
        )
        .unwrap();
        let args = ConnectionArgs {
            host: Some("from-flag".to_string()),
            bolt_port: Some(7999),
            ..Default::default()
        };

        let config = args.apply(file);
        assert_eq!(config.host, "from-flag");
        assert_eq!(config.bolt_port, 7999);
        assert_eq!(config.user, "reader");
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn test_debug_hides_password() {
        let args = ConnectionArgs {
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let printed = format!("{args:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("***"));
    }

    #[test]
    fn test_missing_config_file() {
        let err = ConnectionArgs::default()
            .resolve(Some(Path::new("/nonexistent/neotax.toml")))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
    }
}
