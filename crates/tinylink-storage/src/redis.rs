use async_trait::async_trait;
use redis::aio::{ConnectionLike, MultiplexedConnection};
use redis::cluster::ClusterClientBuilder;
use redis::cluster_async::ClusterConnection;
use tinylink_core::repository::Repository;
use tinylink_core::{Redirect, ShortCode, StorageError};
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;
use url::Url;

use crate::Result;

pub const DEFAULT_KEY_PREFIX: &str = "tinylink:redirect:";

/// Topology of the Redis deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RedisMode {
    #[default]
    Single,
    Cluster,
}

/// Connection settings for [`RedisRepository`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct RedisSettings {
    #[builder(default)]
    mode: RedisMode,
    /// `host:port` pairs. Single mode uses the first one.
    hosts: Vec<String>,
    #[builder(default)]
    password: Option<String>,
    /// Logical database; ignored in cluster mode.
    #[builder(default = 0)]
    db: i64,
    #[builder(default = DEFAULT_KEY_PREFIX.to_string(), setter(into))]
    key_prefix: String,
}

impl RedisSettings {
    pub fn mode(&self) -> RedisMode {
        self.mode
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// Builds a `redis://` URL for `host`, with the password percent-encoded.
    fn node_url(&self, host: &str, with_db: bool) -> Result<String> {
        let base = if with_db {
            format!("redis://{host}/{}", self.db)
        } else {
            format!("redis://{host}")
        };
        let mut url = Url::parse(&base)
            .map_err(|e| StorageError::Operation(format!("invalid redis host '{host}': {e}")))?;

        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            url.set_password(Some(password)).map_err(|()| {
                StorageError::Operation(format!("cannot set password on redis host '{host}'"))
            })?;
        }

        Ok(url.into())
    }
}

/// Key-value implementation of the Repository trait on top of Redis.
///
/// Each redirect is stored as a JSON string under `<prefix><code>`. Inserts
/// use `SET ... NX`, so the existence check and the write are one command;
/// an expiry hint becomes `PXAT` and Redis drops the key on its own.
#[derive(Debug, Clone)]
pub struct RedisRepository<C = MultiplexedConnection> {
    conn: C,
    key_prefix: String,
}

pub(crate) fn map_redis_error(operation: &str, err: redis::RedisError) -> StorageError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() || message.to_ascii_lowercase().contains("timed out") {
        StorageError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Operation(message)
    }
}

impl RedisRepository<MultiplexedConnection> {
    /// Opens a multiplexed connection to a single Redis node.
    pub async fn connect(settings: &RedisSettings) -> Result<Self> {
        let host = settings
            .hosts
            .first()
            .ok_or_else(|| StorageError::Operation("no redis host configured".to_string()))?;
        let client = redis::Client::open(settings.node_url(host, true)?)
            .map_err(|e| map_redis_error("failed to create redis client", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to redis", e))?;

        debug!(host = %host, "connected to redis");
        Ok(Self::with_prefix(conn, settings.key_prefix.clone()))
    }
}

impl RedisRepository<ClusterConnection> {
    /// Opens a connection to a Redis cluster seeded with every configured host.
    pub async fn connect_cluster(settings: &RedisSettings) -> Result<Self> {
        let nodes = settings
            .hosts
            .iter()
            .map(|host| settings.node_url(host, false))
            .collect::<Result<Vec<_>>>()?;
        if nodes.is_empty() {
            return Err(StorageError::Operation(
                "no redis host configured".to_string(),
            ));
        }

        let client = ClusterClientBuilder::new(nodes)
            .build()
            .map_err(|e| map_redis_error("failed to create redis cluster client", e))?;
        let conn = client
            .get_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to redis cluster", e))?;

        debug!(nodes = settings.hosts.len(), "connected to redis cluster");
        Ok(Self::with_prefix(conn, settings.key_prefix.clone()))
    }
}

impl<C> RedisRepository<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    /// Wraps an existing connection with a custom key prefix.
    ///
    /// The prefix acts as the storage namespace: codes are unique per prefix.
    pub fn with_prefix(conn: C, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Consumes the repository and returns its connection.
    pub fn into_connection(self) -> C {
        self.conn
    }

    /// Generates the storage key for a short code.
    fn key(&self, code: &ShortCode) -> String {
        format!("{}{}", self.key_prefix, code.as_str())
    }
}

#[async_trait]
impl<C> Repository for RedisRepository<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    async fn create(&self, redirect: &Redirect) -> Result<()> {
        let key = self.key(&redirect.code);
        trace!(code = %redirect.code, "storing redirect in redis");

        let payload = serde_json::to_string(redirect).map_err(|e| {
            StorageError::InvalidData(format!("failed to serialize redirect: {e}"))
        })?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(&key).arg(payload).arg("NX");
        if let Some(expires_at) = redirect.expires_at {
            cmd.arg("PXAT").arg(expires_at.as_millisecond());
        }

        let mut conn = self.conn.clone();
        let reply: Option<String> = cmd
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to write value to redis", e))?;

        match reply {
            Some(_) => Ok(()),
            None => {
                trace!(code = %redirect.code, "short code already taken");
                Err(StorageError::DuplicateCode(redirect.code.to_string()))
            }
        }
    }

    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Redirect>> {
        let key = self.key(code);
        trace!(code = %code, "fetching redirect from redis");

        let mut conn = self.conn.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to fetch value from redis", e))?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        serde_json::from_str::<Redirect>(&raw).map(Some).map_err(|e| {
            warn!(code = %code, error = %e, "failed to deserialize stored redirect");
            StorageError::InvalidData(format!("invalid value for key '{key}': {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(password: Option<&str>) -> RedisSettings {
        RedisSettings::builder()
            .hosts(vec!["cache.internal:6379".to_string()])
            .password(password.map(str::to_string))
            .db(2)
            .build()
    }

    #[test]
    fn node_url_without_password() {
        let url = settings(None)
            .node_url("cache.internal:6379", true)
            .unwrap();
        assert_eq!(url, "redis://cache.internal:6379/2");
    }

    #[test]
    fn node_url_encodes_password() {
        let url = settings(Some("p@ss word"))
            .node_url("cache.internal:6379", true)
            .unwrap();
        assert_eq!(url, "redis://:p%40ss%20word@cache.internal:6379/2");
    }

    #[test]
    fn cluster_node_url_has_no_database() {
        let url = settings(None)
            .node_url("cache.internal:7000", false)
            .unwrap();
        assert_eq!(url, "redis://cache.internal:7000");
    }

    #[test]
    fn empty_password_is_ignored() {
        let url = settings(Some("")).node_url("cache.internal:6379", true).unwrap();
        assert_eq!(url, "redis://cache.internal:6379/2");
    }

    #[test]
    fn default_key_prefix() {
        assert_eq!(settings(None).key_prefix(), DEFAULT_KEY_PREFIX);
    }
}
