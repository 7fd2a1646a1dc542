use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Pool settings applied on top of a DSN.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectOpts {
    pub max_conns: Option<u32>,
    pub min_conns: Option<u32>,
    /// Human-readable duration, e.g. `"5s"` or `"250ms"`.
    pub acquire_timeout: Option<String>,
    /// Log every statement at `debug` level.
    pub sqlx_logging: bool,
}

impl ConnectOpts {
    fn acquire_timeout(&self) -> Result<Option<Duration>, StoreError> {
        self.acquire_timeout
            .as_deref()
            .map(humantime::parse_duration)
            .transpose()
            .map_err(|e| StoreError::Config(format!("acquire_timeout: {e}")))
    }
}

/// Open a pooled connection.
///
/// # Errors
/// Returns [`StoreError::Config`] for unparsable options and
/// [`StoreError::Db`] when the backend refuses the connection.
pub async fn connect_db(dsn: &str, opts: &ConnectOpts) -> Result<DatabaseConnection, StoreError> {
    let mut co = ConnectOptions::new(dsn.to_owned());
    if let Some(n) = opts.max_conns {
        co.max_connections(n);
    }
    if let Some(n) = opts.min_conns {
        co.min_connections(n);
    }
    if let Some(t) = opts.acquire_timeout()? {
        co.acquire_timeout(t);
    }
    co.sqlx_logging(opts.sqlx_logging);

    tracing::info!(
        backend = dsn.split(':').next().unwrap_or_default(),
        max_conns = ?opts.max_conns,
        "connecting to database"
    );
    Ok(Database::connect(co).await?)
}
