use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use action_validate_schema::CompiledSchema;
use tokio::sync::watch;
use tracing::debug;

use crate::error::Result;

type Outcome = Option<Result<Arc<CompiledSchema>>>;

enum Slot {
    Ready(Arc<CompiledSchema>),
    Pending(watch::Receiver<Outcome>),
}

enum Lookup {
    Ready(Arc<CompiledSchema>),
    Wait(watch::Receiver<Outcome>),
    Lead(watch::Sender<Outcome>),
}

/// Action-type keyed cache of compiled validators.
///
/// At most one fill runs per type at a time. Callers that ask for a type
/// while its fill is running wait for that fill and receive the same
/// outcome. Failed fills leave nothing behind.
#[derive(Default)]
pub struct ValidatorCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl ValidatorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached validator for `action_type`, running `fill` on a miss.
    pub async fn get_or_fill<F, Fut>(&self, action_type: &str, fill: F) -> Result<Arc<CompiledSchema>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<CompiledSchema>>>,
    {
        let sender = loop {
            match self.lookup(action_type) {
                Lookup::Ready(schema) => {
                    debug!(action_type, "using cached validator");
                    return Ok(schema);
                }
                Lookup::Wait(receiver) => {
                    debug!(action_type, "waiting for in-flight schema download");
                    if let Some(outcome) = wait_for_fill(receiver).await {
                        return outcome;
                    }
                    // The leading caller went away before finishing; try again.
                }
                Lookup::Lead(sender) => break sender,
            }
        };

        let guard = FillGuard {
            cache: self,
            action_type,
            sender: Some(sender),
        };
        let outcome = fill().await;
        guard.complete(&outcome);
        outcome
    }

    /// Cached validator for `action_type`, if its fill has completed.
    pub fn get(&self, action_type: &str) -> Option<Arc<CompiledSchema>> {
        match self.slots().get(action_type) {
            Some(Slot::Ready(schema)) => Some(Arc::clone(schema)),
            _ => None,
        }
    }

    pub fn contains(&self, action_type: &str) -> bool {
        self.get(action_type).is_some()
    }

    /// Action types with a compiled validator, sorted.
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .slots()
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Ready(_)))
            .map(|(action_type, _)| action_type.clone())
            .collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.slots()
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, action_type: &str) -> Lookup {
        let mut slots = self.slots();
        match slots.get(action_type) {
            Some(Slot::Ready(schema)) => Lookup::Ready(Arc::clone(schema)),
            Some(Slot::Pending(receiver)) => Lookup::Wait(receiver.clone()),
            None => {
                let (sender, receiver) = watch::channel(None);
                slots.insert(action_type.to_string(), Slot::Pending(receiver));
                Lookup::Lead(sender)
            }
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ValidatorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorCache")
            .field("types", &self.types())
            .finish()
    }
}

async fn wait_for_fill(mut receiver: watch::Receiver<Outcome>) -> Outcome {
    match receiver.wait_for(Option::is_some).await {
        Ok(outcome) => (*outcome).clone(),
        Err(_) => None,
    }
}

/// Owns the pending slot of a running fill. Dropping it unfinished clears
/// the slot so that waiters can retry.
struct FillGuard<'a> {
    cache: &'a ValidatorCache,
    action_type: &'a str,
    sender: Option<watch::Sender<Outcome>>,
}

impl FillGuard<'_> {
    fn complete(mut self, outcome: &Result<Arc<CompiledSchema>>) {
        let Some(sender) = self.sender.take() else {
            return;
        };

        {
            let mut slots = self.cache.slots();
            match outcome {
                Ok(schema) => {
                    slots.insert(self.action_type.to_string(), Slot::Ready(Arc::clone(schema)));
                }
                Err(_) => {
                    slots.remove(self.action_type);
                }
            }
        }

        let _ = sender.send(Some(outcome.clone()));
    }
}

impl Drop for FillGuard<'_> {
    fn drop(&mut self) {
        if self.sender.take().is_some() {
            debug!(action_type = self.action_type, "schema download abandoned");
            self.cache.slots().remove(self.action_type);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use action_validate_schema::{compile, SchemaConfig};
    use serde_json::json;

    use super::*;
    use crate::error::{SchemaFetchError, ValidateError};

    fn schema() -> Arc<CompiledSchema> {
        Arc::new(compile(&json!({ "required": ["fruit"] }), &SchemaConfig::default()).unwrap())
    }

    fn fetch_failure() -> ValidateError {
        ValidateError::SchemaFetch(SchemaFetchError::TooLarge {
            action_type: "fruit".to_string(),
            limit: 0,
        })
    }

    #[tokio::test]
    async fn fills_once_then_hits() {
        let cache = ValidatorCache::new();
        let fills = AtomicUsize::new(0);
        let counter = &fills;
        let fill = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(schema())
        };

        let first = cache.get_or_fill("fruit", fill).await.unwrap();
        let second = cache.get_or_fill("fruit", fill).await.unwrap();

        assert_eq!(fills.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.contains("fruit"));
        assert_eq!(cache.types(), vec!["fruit".to_string()]);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_fill() {
        let cache = ValidatorCache::new();
        let fills = AtomicUsize::new(0);
        let counter = &fills;
        let fill = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(schema())
        };

        let (a, b, c) = tokio::join!(
            cache.get_or_fill("fruit", fill),
            cache.get_or_fill("fruit", fill),
            cache.get_or_fill("fruit", fill),
        );

        assert_eq!(fills.load(Ordering::SeqCst), 1);
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&b, &c));
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_failure() {
        let cache = ValidatorCache::new();
        let fills = AtomicUsize::new(0);
        let counter = &fills;
        let fill = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err(fetch_failure())
        };

        let (a, b) = tokio::join!(
            cache.get_or_fill("fruit", fill),
            cache.get_or_fill("fruit", fill),
        );

        assert_eq!(fills.load(Ordering::SeqCst), 1);
        assert!(a.unwrap_err().is_schema_fetch());
        assert!(b.unwrap_err().is_schema_fetch());
        assert!(cache.is_empty());

        cache.get_or_fill("fruit", fill).await.unwrap_err();
        assert_eq!(fills.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn abandoned_fill_clears_slot() {
        let cache = ValidatorCache::new();

        let abandoned = tokio::time::timeout(
            Duration::from_millis(10),
            cache.get_or_fill("fruit", std::future::pending),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(!cache.contains("fruit"));

        let filled = cache.get_or_fill("fruit", || async { Ok(schema()) }).await;
        assert!(filled.is_ok());
    }

    #[tokio::test]
    async fn waiter_takes_over_after_leader_is_dropped() {
        let cache = ValidatorCache::new();

        let (leader, waiter) = tokio::join!(
            tokio::time::timeout(
                Duration::from_millis(20),
                cache.get_or_fill("fruit", std::future::pending),
            ),
            async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                cache.get_or_fill("fruit", || async { Ok(schema()) }).await
            },
        );

        assert!(leader.is_err());
        assert!(waiter.is_ok());
        assert!(cache.contains("fruit"));
    }

    #[tokio::test]
    async fn types_are_independent() {
        let cache = ValidatorCache::new();
        cache
            .get_or_fill("veggies", || async { Ok(schema()) })
            .await
            .unwrap();
        cache
            .get_or_fill("fruit", || async { Ok(schema()) })
            .await
            .unwrap();
        cache
            .get_or_fill("nuts", || async { Err(fetch_failure()) })
            .await
            .unwrap_err();

        assert_eq!(cache.types(), vec!["fruit".to_string(), "veggies".to_string()]);
        assert!(cache.get("nuts").is_none());
    }
}
