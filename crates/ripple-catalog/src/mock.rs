//! Mock catalog source for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use ripple_core::error::CatalogError;
use ripple_core::traits::CatalogSource;

/// A catalog source serving canned JSON without touching the network.
///
/// Unknown paths answer HTTP 404.
pub struct MockSource {
    resources: Mutex<HashMap<String, Value>>,
    failures: Mutex<HashMap<String, CatalogError>>,
    /// Artificial latency, to keep fetches in flight while tests race them.
    delay: Option<Duration>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Paths requested, in order.
    requests: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            resources: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            delay: None,
            call_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_resource(self, path: &str, value: Value) -> Self {
        self.set_resource(path, value);
        self
    }

    pub fn with_failure(self, path: &str, error: CatalogError) -> Self {
        self.set_failure(path, error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Publish (or replace) a resource.
    pub fn set_resource(&self, path: &str, value: Value) {
        self.failures.lock().unwrap().remove(path);
        self.resources.lock().unwrap().insert(path.to_string(), value);
    }

    /// Make a path fail until it is published again.
    pub fn set_failure(&self, path: &str, error: CatalogError) {
        self.failures.lock().unwrap().insert(path.to_string(), error);
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// How many times `path` was requested.
    pub fn calls_for(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == path)
            .count()
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_json(&self, path: &str) -> Result<Value, CatalogError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.requests.lock().unwrap().push(path.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.failures.lock().unwrap().get(path) {
            return Err(error.clone());
        }
        self.resources
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| CatalogError::Status {
                resource: path.to_string(),
                status: 404,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn serves_and_counts() {
        let source = MockSource::new().with_resource("tokens.json", json!({"tokens": []}));
        assert!(source.fetch_json("tokens.json").await.is_ok());
        assert!(source.fetch_json("other.json").await.is_err());
        assert_eq!(source.call_count(), 2);
        assert_eq!(source.calls_for("tokens.json"), 1);
    }

    #[tokio::test]
    async fn failures_take_precedence_until_republished() {
        let source = MockSource::new()
            .with_resource("m.json", json!({"routes": []}))
            .with_failure(
                "m.json",
                CatalogError::Network {
                    resource: "m.json".into(),
                    message: "reset".into(),
                },
            );
        assert!(matches!(
            source.fetch_json("m.json").await,
            Err(CatalogError::Network { .. })
        ));
        source.set_resource("m.json", json!({"routes": []}));
        assert!(source.fetch_json("m.json").await.is_ok());
    }
}
