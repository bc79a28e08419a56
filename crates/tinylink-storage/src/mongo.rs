use async_trait::async_trait;
use jiff::Timestamp;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tinylink_core::repository::Repository;
use tinylink_core::{Redirect, ShortCode, StorageError};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

use crate::Result;

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;
const CODE_INDEX_NAME: &str = "code_unique";

/// Connection settings for [`MongoRepository`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct MongoSettings {
    #[builder(setter(into))]
    uri: String,
    #[builder(default = "tinylink".to_string(), setter(into))]
    database: String,
    #[builder(default = "redirect".to_string(), setter(into))]
    collection: String,
    /// Bound on connecting and on selecting a server for each operation.
    #[builder(default = Duration::from_secs(60))]
    timeout: Duration,
}

/// On-disk shape of a redirect. Timestamps are Unix milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RedirectDocument {
    code: String,
    url: String,
    created_at: i64,
    expires_at: Option<i64>,
}

impl From<&Redirect> for RedirectDocument {
    fn from(redirect: &Redirect) -> Self {
        Self {
            code: redirect.code.as_str().to_owned(),
            url: redirect.target_url.clone(),
            created_at: redirect.created_at.as_millisecond(),
            expires_at: redirect.expires_at.map(|ts| ts.as_millisecond()),
        }
    }
}

impl TryFrom<RedirectDocument> for Redirect {
    type Error = StorageError;

    fn try_from(document: RedirectDocument) -> Result<Self> {
        let created_at = parse_millis(document.created_at)?;
        let expires_at = document.expires_at.map(parse_millis).transpose()?;

        Ok(Redirect {
            code: ShortCode::new_unchecked(document.code),
            target_url: document.url,
            created_at,
            expires_at,
        })
    }
}

fn parse_millis(value: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(value).map_err(|e| {
        StorageError::InvalidData(format!("invalid timestamp '{}': {e}", value))
    })
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

fn map_mongo_error(err: mongodb::error::Error) -> StorageError {
    let message = err.to_string();

    match err.kind.as_ref() {
        ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
            StorageError::Timeout(message)
        }
        ErrorKind::Io(_) | ErrorKind::ServerSelection { .. } => StorageError::Unavailable(message),
        ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
            StorageError::InvalidData(message)
        }
        _ => StorageError::Query(message),
    }
}

/// Document-store implementation of the Repository trait on top of MongoDB.
///
/// One document per redirect. A unique index on `code` makes `insert_one`
/// the atomic uniqueness check.
#[derive(Debug, Clone)]
pub struct MongoRepository {
    collection: Collection<RedirectDocument>,
}

impl MongoRepository {
    /// Connects to MongoDB and makes sure the unique index on `code` exists.
    pub async fn connect(settings: &MongoSettings) -> Result<Self> {
        let mut options = ClientOptions::parse(&settings.uri)
            .await
            .map_err(map_mongo_error)?;
        options.app_name = Some("tinylink".to_string());
        options.connect_timeout = Some(settings.timeout);
        options.server_selection_timeout = Some(settings.timeout);

        let client = Client::with_options(options).map_err(map_mongo_error)?;
        let collection = client
            .database(&settings.database)
            .collection::<RedirectDocument>(&settings.collection);

        let repository = Self { collection };
        repository.ensure_indexes().await?;

        debug!(
            database = %settings.database,
            collection = %settings.collection,
            "connected to mongodb"
        );
        Ok(repository)
    }

    async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "code": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(CODE_INDEX_NAME.to_string())
                    .build(),
            )
            .build();

        self.collection
            .create_index(index)
            .await
            .map_err(map_mongo_error)?;
        Ok(())
    }
}

#[async_trait]
impl Repository for MongoRepository {
    async fn create(&self, redirect: &Redirect) -> Result<()> {
        trace!(code = %redirect.code, "inserting redirect document");

        let document = RedirectDocument::from(redirect);
        match self.collection.insert_one(document).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => {
                trace!(code = %redirect.code, "short code already taken");
                Err(StorageError::DuplicateCode(redirect.code.to_string()))
            }
            Err(err) => Err(map_mongo_error(err)),
        }
    }

    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Redirect>> {
        trace!(code = %code, "fetching redirect document");

        let document = self
            .collection
            .find_one(doc! { "code": code.as_str() })
            .await
            .map_err(map_mongo_error)?;

        document.map(Redirect::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    #[test]
    fn document_round_trip_keeps_millisecond_precision() {
        let created_at = Timestamp::from_millisecond(1_700_000_000_123).unwrap();
        let redirect = Redirect {
            code: ShortCode::new_unchecked("abc123"),
            target_url: "https://example.com/a?b=c".to_string(),
            created_at,
            expires_at: Some(created_at + SignedDuration::from_hours(1)),
        };

        let document = RedirectDocument::from(&redirect);
        assert_eq!(document.code, "abc123");
        assert_eq!(document.created_at, 1_700_000_000_123);

        let back = Redirect::try_from(document).unwrap();
        assert_eq!(back, redirect);
    }

    #[test]
    fn out_of_range_timestamp_is_invalid_data() {
        let document = RedirectDocument {
            code: "abc123".to_string(),
            url: "https://example.com".to_string(),
            created_at: i64::MAX,
            expires_at: None,
        };

        let err = Redirect::try_from(document).unwrap_err();
        assert!(matches!(err, StorageError::InvalidData(_)));
    }

    #[test]
    fn settings_defaults() {
        let settings = MongoSettings::builder()
            .uri("mongodb://localhost:27017")
            .build();

        assert_eq!(settings.database, "tinylink");
        assert_eq!(settings.collection, "redirect");
        assert_eq!(settings.timeout, Duration::from_secs(60));
    }
}
