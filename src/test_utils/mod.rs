#[cfg(test)]
pub mod mocks {
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use crate::domain::{repositories::PlayerRepository, value_objects::PlayerTag};
    use crate::infrastructure::clash_royale::{UpstreamError, UpstreamErrorBody};

    /// Simple in-memory player source for testing
    ///
    /// Unknown tags answer like the real API does: 404 `notFound`.
    #[derive(Clone, Default)]
    pub struct InMemoryPlayerRepository {
        players: Arc<Mutex<HashMap<String, Value>>>,
        battlelogs: Arc<Mutex<HashMap<String, Value>>>,
        failure: Arc<Mutex<Option<UpstreamError>>>,
        requested_tags: Arc<Mutex<Vec<String>>>,
    }

    impl InMemoryPlayerRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// # Panics
        /// Panics if the internal mutex is poisoned
        #[must_use]
        pub fn with_player(self, tag: &str, player: Value) -> Self {
            self.players.lock().unwrap().insert(tag.to_string(), player);
            self
        }

        /// # Panics
        /// Panics if the internal mutex is poisoned
        #[must_use]
        pub fn with_battlelog(self, tag: &str, battlelog: Value) -> Self {
            self.battlelogs.lock().unwrap().insert(tag.to_string(), battlelog);
            self
        }

        /// Make every call fail with `error`
        /// # Panics
        /// Panics if the internal mutex is poisoned
        #[must_use]
        pub fn failing_with(self, error: UpstreamError) -> Self {
            *self.failure.lock().unwrap() = Some(error);
            self
        }

        /// Canonical tags passed to the repository so far
        /// # Panics
        /// Panics if the internal mutex is poisoned
        pub fn requested_tags(&self) -> Vec<String> {
            self.requested_tags.lock().unwrap().clone()
        }

        fn lookup(
            &self,
            source: &Mutex<HashMap<String, Value>>,
            tag: &PlayerTag,
        ) -> Result<Value, UpstreamError> {
            self.requested_tags.lock().unwrap().push(tag.as_str().to_string());

            if let Some(error) = self.failure.lock().unwrap().clone() {
                return Err(error);
            }

            source.lock().unwrap().get(tag.as_str()).cloned().ok_or_else(|| {
                UpstreamError::status(
                    404,
                    UpstreamErrorBody {
                        reason: Some("notFound".to_string()),
                        message: Some("Player not found".to_string()),
                        ..Default::default()
                    },
                )
            })
        }
    }

    #[async_trait]
    impl PlayerRepository for InMemoryPlayerRepository {
        type Error = UpstreamError;

        async fn find_player(&self, tag: &PlayerTag) -> Result<Value, Self::Error> {
            self.lookup(&self.players, tag)
        }

        async fn find_battlelog(&self, tag: &PlayerTag) -> Result<Value, Self::Error> {
            self.lookup(&self.battlelogs, tag)
        }

        async fn health_check(&self) -> Result<(), Self::Error> {
            match self.failure.lock().unwrap().clone() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }
    }
}
