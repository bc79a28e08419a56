use crate::error::StorageError;
use std::future::Future;
use std::time::Duration;

/// Runs a repository call under `timeout`.
///
/// On expiry the in-flight future is dropped, which aborts its I/O, and a
/// [`StorageError::Timeout`] is returned in its place.
pub async fn with_deadline<T, F>(timeout: Duration, future: F) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, StorageError>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Timeout(format!(
            "no response from storage within {}ms",
            timeout.as_millis()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_results() {
        let ok = with_deadline(Duration::from_secs(1), async { Ok::<_, StorageError>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = with_deadline(Duration::from_secs(1), async {
            Err::<(), _>(StorageError::Query("boom".into()))
        })
        .await;
        assert!(matches!(err, Err(StorageError::Query(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_calls_time_out() {
        let result = with_deadline(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, StorageError>(())
        })
        .await;

        assert!(matches!(result, Err(StorageError::Timeout(_))));
    }
}
