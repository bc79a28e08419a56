use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;
use tinylink_core::settings::DEFAULT_MAX_ATTEMPTS;
use tinylink_core::ServiceSettings;
use tinylink_generator::GeneratorStrategy;
use tinylink_middleware::RateLimitSettings;
use tinylink_storage::redis::DEFAULT_KEY_PREFIX;
use tinylink_storage::{MongoSettings, RedisMode, RedisSettings, StorageBackend};

pub const HTTP_ADDR_ENV: &str = "TINYLINK_HTTP_ADDR";
pub const GRPC_ADDR_ENV: &str = "TINYLINK_GRPC_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "TINYLINK_STORAGE";
pub const MONGO_URI_ENV: &str = "TINYLINK_MONGO_URI";
pub const MONGO_DATABASE_ENV: &str = "TINYLINK_MONGO_DATABASE";
pub const MONGO_COLLECTION_ENV: &str = "TINYLINK_MONGO_COLLECTION";
pub const REDIS_MODE_ENV: &str = "TINYLINK_REDIS_MODE";
pub const REDIS_HOSTS_ENV: &str = "TINYLINK_REDIS_HOSTS";
pub const REDIS_PASSWORD_ENV: &str = "TINYLINK_REDIS_PASSWORD";
pub const REDIS_DB_ENV: &str = "TINYLINK_REDIS_DB";
pub const REDIS_KEY_PREFIX_ENV: &str = "TINYLINK_REDIS_KEY_PREFIX";
pub const SHORT_URI_ENV: &str = "TINYLINK_SHORT_URI";
pub const ALPHABET_ENV: &str = "TINYLINK_ALPHABET";
pub const MAX_LENGTH_ENV: &str = "TINYLINK_MAX_LENGTH";
pub const GENERATOR_ENV: &str = "TINYLINK_GENERATOR";
pub const MAX_ATTEMPTS_ENV: &str = "TINYLINK_MAX_ATTEMPTS";
pub const STORAGE_TIMEOUT_ENV: &str = "TINYLINK_STORAGE_TIMEOUT_MS";
pub const RATE_BUCKET_ENV: &str = "TINYLINK_RATE_BUCKET";
pub const RATE_PER_SECOND_ENV: &str = "TINYLINK_RATE_PER_SECOND";
pub const LOG_LEVEL_ENV: &str = "TINYLINK_LOG_LEVEL";
pub const LOG_JSON_ENV: &str = "TINYLINK_LOG_JSON";
pub const OTLP_ENDPOINT_ENV: &str = "TINYLINK_OTLP_ENDPOINT";

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_GRPC_ADDR: &str = "0.0.0.0:8082";
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_REDIS_HOSTS: &str = "localhost:6379";
pub const DEFAULT_SHORT_URI: &str = "http://localhost:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    Memory,
    Redis,
    Mongo,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::Memory => write!(f, "memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
            StorageBackendArg::Mongo => write!(f, "mongo"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RedisModeArg {
    Single,
    Cluster,
}

impl From<RedisModeArg> for RedisMode {
    fn from(value: RedisModeArg) -> Self {
        match value {
            RedisModeArg::Single => RedisMode::Single,
            RedisModeArg::Cluster => RedisMode::Cluster,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeneratorArg {
    Auto,
    Random,
    Sequence,
}

impl From<GeneratorArg> for GeneratorStrategy {
    fn from(value: GeneratorArg) -> Self {
        match value {
            GeneratorArg::Auto => GeneratorStrategy::Auto,
            GeneratorArg::Random => GeneratorStrategy::Random,
            GeneratorArg::Sequence => GeneratorStrategy::Sequence,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tinylink", version, about = "URL shortener with HTTP and gRPC front ends")]
pub struct CLI {
    #[arg(long, env = HTTP_ADDR_ENV, default_value = DEFAULT_HTTP_ADDR)]
    pub http_addr: SocketAddr,

    #[arg(long, env = GRPC_ADDR_ENV, default_value = DEFAULT_GRPC_ADDR)]
    pub grpc_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Memory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MONGO_URI_ENV, default_value = DEFAULT_MONGO_URI)]
    pub mongo_uri: String,

    #[arg(long, env = MONGO_DATABASE_ENV, default_value = "tinylink")]
    pub mongo_database: String,

    #[arg(long, env = MONGO_COLLECTION_ENV, default_value = "redirect")]
    pub mongo_collection: String,

    #[arg(long, env = REDIS_MODE_ENV, value_enum, default_value_t = RedisModeArg::Single)]
    pub redis_mode: RedisModeArg,

    /// Redis nodes as `host:port`, separated by `;`.
    #[arg(long, env = REDIS_HOSTS_ENV, default_value = DEFAULT_REDIS_HOSTS)]
    pub redis_hosts: String,

    #[arg(long, env = REDIS_PASSWORD_ENV, hide_env_values = true)]
    pub redis_password: Option<String>,

    #[arg(long, env = REDIS_DB_ENV, default_value_t = 0)]
    pub redis_db: i64,

    #[arg(long, env = REDIS_KEY_PREFIX_ENV, default_value = DEFAULT_KEY_PREFIX)]
    pub redis_key_prefix: String,

    /// Public base URL that short codes are appended to.
    #[arg(long, env = SHORT_URI_ENV, default_value = DEFAULT_SHORT_URI)]
    pub short_uri: String,

    /// Symbols codes are drawn from. Empty selects the base58 alphabet.
    #[arg(long, env = ALPHABET_ENV, default_value = "")]
    pub alphabet: String,

    /// Longest code to generate. Zero or negative means unbounded.
    #[arg(long, env = MAX_LENGTH_ENV, default_value_t = -1, allow_negative_numbers = true)]
    pub max_length: i64,

    #[arg(long, env = GENERATOR_ENV, value_enum, default_value_t = GeneratorArg::Auto)]
    pub generator: GeneratorArg,

    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..=1000)
    )]
    pub max_attempts: u64,

    #[arg(long, env = STORAGE_TIMEOUT_ENV, default_value_t = 5000)]
    pub storage_timeout_ms: u64,

    #[arg(long, env = RATE_BUCKET_ENV, default_value = "10")]
    pub rate_bucket: NonZeroU32,

    #[arg(long, env = RATE_PER_SECOND_ENV, default_value = "10")]
    pub rate_per_second: NonZeroU32,

    /// Filter directives, e.g. `info` or `tinylink=debug,tower_http=info`.
    #[arg(long, env = LOG_LEVEL_ENV, default_value = "info")]
    pub log_level: String,

    #[arg(long, env = LOG_JSON_ENV)]
    pub log_json: bool,

    /// Export spans to this OTLP/gRPC collector when set.
    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl CLI {
    /// Splits `--redis-hosts` on `;`, dropping blanks.
    pub fn redis_hosts(&self) -> Vec<String> {
        self.redis_hosts
            .split(';')
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn max_length(&self) -> Option<usize> {
        usize::try_from(self.max_length).ok().filter(|len| *len > 0)
    }

    pub fn storage_backend(&self) -> StorageBackend {
        match self.storage {
            StorageBackendArg::Memory => StorageBackend::Memory,
            StorageBackendArg::Redis => StorageBackend::Redis(
                RedisSettings::builder()
                    .mode(self.redis_mode.into())
                    .hosts(self.redis_hosts())
                    .password(self.redis_password.clone())
                    .db(self.redis_db)
                    .key_prefix(self.redis_key_prefix.clone())
                    .build(),
            ),
            StorageBackendArg::Mongo => StorageBackend::Mongo(
                MongoSettings::builder()
                    .uri(self.mongo_uri.clone())
                    .database(self.mongo_database.clone())
                    .collection(self.mongo_collection.clone())
                    .build(),
            ),
        }
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings::builder()
            .short_link_base(self.short_uri.clone())
            .max_attempts(
                NonZeroUsize::new(self.max_attempts as usize).unwrap_or(DEFAULT_MAX_ATTEMPTS),
            )
            .storage_timeout(Duration::from_millis(self.storage_timeout_ms))
            .build()
    }

    pub fn rate_limit(&self) -> RateLimitSettings {
        RateLimitSettings::new(self.rate_bucket, self.rate_per_second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CLI {
        CLI::try_parse_from(std::iter::once("tinylink").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);

        assert_eq!(cli.http_addr.port(), 8080);
        assert_eq!(cli.grpc_addr.port(), 8082);
        assert_eq!(cli.storage, StorageBackendArg::Memory);
        assert_eq!(cli.max_length(), None);
        assert_eq!(cli.generator, GeneratorArg::Auto);

        let settings = cli.service_settings();
        assert_eq!(settings.short_link_base, DEFAULT_SHORT_URI);
        assert_eq!(settings.max_attempts.get(), 5);
        assert_eq!(settings.storage_timeout, Duration::from_secs(5));

        let rate = cli.rate_limit();
        assert_eq!(rate.bucket.get(), 10);
        assert_eq!(rate.per_second.get(), 10);
    }

    #[test]
    fn non_positive_max_length_is_unbounded() {
        assert_eq!(parse(&["--max-length", "0"]).max_length(), None);
        assert_eq!(parse(&["--max-length", "-3"]).max_length(), None);
        assert_eq!(parse(&["--max-length", "7"]).max_length(), Some(7));
    }

    #[test]
    fn redis_hosts_are_split_on_semicolons() {
        let cli = parse(&["--storage", "redis", "--redis-hosts", "a:7000; b:7001;;c:7002"]);

        assert_eq!(cli.redis_hosts(), vec!["a:7000", "b:7001", "c:7002"]);
        assert!(matches!(cli.storage_backend(), StorageBackend::Redis(_)));
    }

    #[test]
    fn mongo_backend_carries_names() {
        let cli = parse(&["--storage", "mongo", "--mongo-collection", "links"]);
        assert_eq!(cli.storage_backend().to_string(), "mongo");
    }

    #[test]
    fn zero_rate_bucket_is_rejected() {
        let result = CLI::try_parse_from(["tinylink", "--rate-bucket", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_max_attempts_is_rejected() {
        let result = CLI::try_parse_from(["tinylink", "--max-attempts", "0"]);
        assert!(result.is_err());
    }
}
