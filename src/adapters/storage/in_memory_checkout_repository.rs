//! In-memory checkout repository.
//!
//! Checkouts live for one attempt and are discarded on exit, so a map behind
//! a tokio `RwLock` is the production store. Attempts that never exit are
//! dropped by [`InMemoryCheckoutRepository::evict_idle`], which the server
//! runs on an interval.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::checkout::CheckoutController;
use crate::domain::foundation::{CheckoutId, DomainError, Timestamp};
use crate::ports::CheckoutRepository;

/// In-memory storage for live checkouts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCheckoutRepository {
    checkouts: Arc<RwLock<HashMap<CheckoutId, CheckoutController>>>,
}

impl InMemoryCheckoutRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored checkouts (useful for tests)
    pub async fn clear(&self) {
        self.checkouts.write().await.clear();
    }

    /// Removes checkouts untouched for longer than `max_idle`.
    /// Returns how many were removed.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        self.evict_updated_before(Timestamp::ago(max_idle)).await
    }

    async fn evict_updated_before(&self, cutoff: Timestamp) -> usize {
        let mut checkouts = self.checkouts.write().await;
        let before = checkouts.len();
        checkouts.retain(|_, checkout| checkout.updated_at() >= cutoff);
        before - checkouts.len()
    }

    /// Spawns a task that evicts idle checkouts every `interval`.
    pub fn spawn_idle_sweeper(
        &self,
        max_idle: Duration,
        interval: Duration,
    ) -> tokio::task::JoinHandle<()> {
        let repository = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = repository.evict_idle(max_idle).await;
                if evicted > 0 {
                    info!(evicted, idle_ttl_secs = max_idle.as_secs(), "Evicted idle checkouts");
                } else {
                    debug!("No idle checkouts to evict");
                }
            }
        })
    }
}

#[async_trait]
impl CheckoutRepository for InMemoryCheckoutRepository {
    async fn save(&self, checkout: &CheckoutController) -> Result<(), DomainError> {
        self.checkouts
            .write()
            .await
            .insert(checkout.id(), checkout.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CheckoutId) -> Result<Option<CheckoutController>, DomainError> {
        Ok(self.checkouts.read().await.get(id).cloned())
    }

    async fn delete(&self, id: &CheckoutId) -> Result<(), DomainError> {
        self.checkouts.write().await.remove(id);
        Ok(())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.checkouts.read().await.len())
    }
}
