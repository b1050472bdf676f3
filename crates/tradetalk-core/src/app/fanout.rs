//! Bounded fan-out over independent store calls.
//!
//! With a limit of 1 the calls run one after another, in input order.
//! Any limit is best-effort: the first error is returned, calls that already
//! succeeded stay applied, and the ones not yet started are never issued.

use std::future::Future;
use std::pin::pin;

use futures_util::stream::{self, StreamExt};

use crate::domain::StoreError;

/// Returns the number of calls that succeeded.
pub(crate) async fn for_each_bounded<T, F, Fut>(
    items: Vec<T>,
    limit: usize,
    op: F,
) -> Result<usize, StoreError>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<(), StoreError>>,
{
    let mut pending = pin!(stream::iter(items).map(op).buffer_unordered(limit.max(1)));
    let mut done = 0;
    while let Some(result) = pending.next().await {
        result?;
        done += 1;
    }
    Ok(done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn sequential_limit_keeps_input_order() {
        let seen = Mutex::new(Vec::new());

        let done = for_each_bounded(vec![1, 2, 3, 4], 1, |n| {
            let seen = &seen;
            async move {
                seen.lock().unwrap().push(n);
                Ok(())
            }
        })
        .await
        .unwrap();

        assert_eq!(done, 4);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn stops_at_first_error_without_rollback() {
        let seen = Mutex::new(Vec::new());

        let err = for_each_bounded(vec![1, 2, 3, 4], 1, |n| {
            let seen = &seen;
            async move {
                if n == 3 {
                    return Err(StoreError::Unavailable("boom".into()));
                }
                seen.lock().unwrap().push(n);
                Ok(())
            }
        })
        .await
        .unwrap_err();

        assert!(err.is_transient());
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn zero_limit_is_treated_as_one() {
        let done = for_each_bounded(vec![(); 5], 0, |_| async { Ok(()) })
            .await
            .unwrap();
        assert_eq!(done, 5);
    }

    #[tokio::test]
    async fn wider_limit_still_runs_everything() {
        let done = for_each_bounded((0..20).collect::<Vec<u32>>(), 4, |_| async {
            tokio::task::yield_now().await;
            Ok(())
        })
        .await
        .unwrap();
        assert_eq!(done, 20);
    }
}
