//! Layered server configuration: defaults, then a YAML file, then
//! `CRUDKIT__`-prefixed environment variables (`__` separates levels).

use std::path::Path;

use crudkit_auth::AuthConfig;
use crudkit_db::ConnectOpts;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "CRUDKIT__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Path of the query/mutation endpoint.
    pub graph_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_owned(),
            graph_path: "/graphql".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub dsn: String,
    pub pool: ConnectOpts,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite::memory:".to_owned(),
            pool: ConnectOpts::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Load and merge all layers. A missing file is an error only when a
    /// path was given explicitly.
    ///
    /// # Errors
    /// Unreadable or ill-typed configuration, including unknown keys.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut fig = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(format!("config file '{}' not found", path.display()).into());
            }
            fig = fig.merge(Yaml::file(path));
        }
        fig.merge(Env::prefixed(ENV_PREFIX).split("__")).extract()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crudkit_auth::AuthMode;

    #[test]
    fn defaults_without_file() {
        figment::Jail::expect_with(|_| {
            let cfg = AppConfig::load(None)?;
            assert_eq!(cfg.server.bind_addr, "127.0.0.1:8087");
            assert_eq!(cfg.database.dsn, "sqlite::memory:");
            assert_eq!(cfg.logging.format, LogFormat::Text);
            assert_eq!(cfg.auth.mode, AuthMode::StaticTokens);
            Ok(())
        });
    }

    #[test]
    fn file_then_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "crudkit.yaml",
                r"
server:
  bind_addr: 0.0.0.0:9000
logging:
  format: json
auth:
  mode: static_tokens
  tokens:
    - token: t1
      identity: { subject: alice, scope: ADMIN }
",
            )?;
            jail.set_env("CRUDKIT__SERVER__BIND_ADDR", "0.0.0.0:9100");
            jail.set_env("CRUDKIT__DATABASE__POOL__MAX_CONNS", "4");
            let cfg = AppConfig::load(Some(Path::new("crudkit.yaml")))?;
            assert_eq!(cfg.server.bind_addr, "0.0.0.0:9100");
            assert_eq!(cfg.logging.format, LogFormat::Json);
            assert_eq!(cfg.database.pool.max_conns, Some(4));
            assert_eq!(cfg.auth.tokens[0].identity.subject, "alice");
            Ok(())
        });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("crudkit.yaml", "server:\n  bind: 1.2.3.4:1\n")?;
            assert!(AppConfig::load(Some(Path::new("crudkit.yaml"))).is_err());
            Ok(())
        });
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        figment::Jail::expect_with(|_| {
            assert!(AppConfig::load(Some(Path::new("nope.yaml"))).is_err());
            Ok(())
        });
    }
}
