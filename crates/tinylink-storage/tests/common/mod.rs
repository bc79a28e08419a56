//! Behavior every repository backend must share.
//!
//! Each backend's integration test calls these against its own instance, so
//! the invariants are checked identically whichever variant is active.

use jiff::{SignedDuration, Timestamp};
use std::collections::HashSet;
use std::sync::Arc;
use tinylink_core::{Redirect, Repository, ShortCode, StorageError};

pub fn code(value: &str) -> ShortCode {
    ShortCode::new_unchecked(value)
}

/// An hour from now, truncated to what every backend can represent.
fn future_millis() -> Timestamp {
    let future = Timestamp::now() + SignedDuration::from_hours(1);
    Timestamp::from_millisecond(future.as_millisecond()).unwrap()
}

pub async fn create_then_find<R: Repository>(repo: &R) {
    let redirect = Redirect::new(code("round-trip"), "https://example.com/a?b=c#d");

    repo.create(&redirect).await.unwrap();

    let found = repo.find_by_code(&redirect.code).await.unwrap().unwrap();
    assert_eq!(found.code, redirect.code);
    assert_eq!(found.target_url, "https://example.com/a?b=c#d");
    assert_eq!(found.expires_at, None);
}

pub async fn missing_code_is_none<R: Repository>(repo: &R) {
    let found = repo.find_by_code(&code("doesnotexist")).await.unwrap();
    assert!(found.is_none());
}

pub async fn duplicate_code_is_rejected<R: Repository>(repo: &R) {
    repo.create(&Redirect::new(code("taken"), "https://one.example"))
        .await
        .unwrap();

    let err = repo
        .create(&Redirect::new(code("taken"), "https://two.example"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::DuplicateCode(_)));

    let found = repo.find_by_code(&code("taken")).await.unwrap().unwrap();
    assert_eq!(found.target_url, "https://one.example");
}

pub async fn expiry_hint_is_persisted<R: Repository>(repo: &R) {
    let expires_at = future_millis();
    let redirect =
        Redirect::new(code("with-ttl"), "https://example.com").with_expires_at(Some(expires_at));

    repo.create(&redirect).await.unwrap();

    let found = repo.find_by_code(&redirect.code).await.unwrap().unwrap();
    assert_eq!(found.expires_at, Some(expires_at));
}

pub async fn racing_creates_admit_one<R: Repository>(repo: Arc<R>) {
    let handles: Vec<_> = (0..16)
        .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                repo.create(&Redirect::new(
                    code("contended"),
                    format!("https://racer{i}.example"),
                ))
                .await
            })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => winners += 1,
            Err(err) => assert!(matches!(err, StorageError::DuplicateCode(_))),
        }
    }
    assert_eq!(winners, 1);
}

pub async fn distinct_codes_are_independent<R: Repository>(repo: Arc<R>) {
    let handles: Vec<_> = (0..32)
        .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                let redirect =
                    Redirect::new(code(&format!("code-{i:03}")), format!("https://{i}.example"));
                repo.create(&redirect).await.map(|()| redirect.code)
            })
        })
        .collect();

    let mut created = HashSet::new();
    for handle in handles {
        created.insert(handle.await.unwrap().unwrap());
    }
    assert_eq!(created.len(), 32);

    for i in 0..32 {
        let found = repo
            .find_by_code(&code(&format!("code-{i:03}")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.target_url, format!("https://{i}.example"));
    }
}

pub async fn run_all<R: Repository>(repo: Arc<R>) {
    create_then_find(repo.as_ref()).await;
    missing_code_is_none(repo.as_ref()).await;
    duplicate_code_is_rejected(repo.as_ref()).await;
    expiry_hint_is_persisted(repo.as_ref()).await;
    racing_creates_admit_one(Arc::clone(&repo)).await;
    distinct_codes_are_independent(repo).await;
}
