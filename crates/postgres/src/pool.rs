use crate::{Error, Result};
use bb8::Pool;
use bb8_postgres::PostgresConnectionManager;
use ogcfeat::ProviderConfig;
use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::Mutex;
use tokio_postgres::NoTls;
use tracing::debug;

pub(crate) type PgPool = Pool<PostgresConnectionManager<NoTls>>;

/// A hashable connection descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct PoolKey {
    data: String,
    search_path: Vec<String>,
}

static POOLS: OnceLock<Mutex<HashMap<PoolKey, PgPool>>> = OnceLock::new();

/// Returns the pool for a connection descriptor, creating it on first use.
///
/// Pools are memoized process-wide and never invalidated; a provider that
/// outlives its database's schema requires a restart to observe changes.
pub(crate) async fn pool_for(config: &ProviderConfig) -> Result<PgPool> {
    let key = PoolKey {
        data: config.data.clone(),
        search_path: config.search_path.clone(),
    };
    let pools = POOLS.get_or_init(|| Mutex::new(HashMap::new()));
    let mut pools = pools.lock().await;
    if let Some(pool) = pools.get(&key) {
        return Ok(pool.clone());
    }
    debug!("building connection pool for {}", config.redacted_data());
    let manager = PostgresConnectionManager::new_from_stringlike(&config.data, NoTls)
        .map_err(|err| {
            Error::Connection(format!(
                "could not configure {}: {err}",
                config.redacted_data()
            ))
        })?;
    let pool = Pool::builder().build(manager).await.map_err(|err| {
        Error::Connection(format!(
            "could not connect to {}: {err}",
            config.redacted_data()
        ))
    })?;
    let _ = pools.insert(key, pool.clone());
    Ok(pool)
}
