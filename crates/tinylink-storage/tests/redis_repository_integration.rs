mod common;

use jiff::{SignedDuration, Timestamp};
use std::sync::Arc;
use std::time::Duration;
use tinylink_core::{Redirect, Repository};
use tinylink_storage::{RedisRepository, RedisSettings};
use tinylink_test_infra::RedisServer;

struct Fixture {
    _redis: RedisServer,
    repo: RedisRepository,
}

impl Fixture {
    async fn start(key_prefix: &str) -> Self {
        let redis = RedisServer::new().await.expect("start redis");
        let address = redis.address().await.expect("redis address");
        let settings = RedisSettings::builder()
            .hosts(vec![address])
            .key_prefix(key_prefix)
            .build();
        let repo = RedisRepository::connect(&settings)
            .await
            .expect("connect redis");

        Self {
            _redis: redis,
            repo,
        }
    }
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn redis_repository_conforms() {
    let fixture = Fixture::start("conformance:").await;
    common::run_all(Arc::new(fixture.repo.clone())).await;
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn key_prefix_is_a_separate_namespace() {
    let fixture = Fixture::start("one:").await;
    let other = RedisRepository::with_prefix(fixture.repo.clone().into_connection(), "two:");
    let redirect = Redirect::new(common::code("shared"), "https://one.example");

    fixture.repo.create(&redirect).await.unwrap();
    other
        .create(&Redirect::new(common::code("shared"), "https://two.example"))
        .await
        .unwrap();

    let found = fixture.repo.find_by_code(&redirect.code).await.unwrap();
    assert_eq!(found.unwrap().target_url, "https://one.example");
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn redis_drops_key_after_expiry_hint() {
    let fixture = Fixture::start("ttl:").await;
    let expires_at = Timestamp::now() + SignedDuration::from_millis(300);
    let redirect = Redirect::new(common::code("short-lived"), "https://example.com")
        .with_expires_at(Some(expires_at));

    fixture.repo.create(&redirect).await.unwrap();
    tokio::time::sleep(Duration::from_millis(800)).await;

    let found = fixture.repo.find_by_code(&redirect.code).await.unwrap();
    assert!(found.is_none());
}
