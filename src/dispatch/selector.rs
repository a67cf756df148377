//! Where dispatch candidates come from.

use crate::clients::LedgerClient;
use crate::ledger_actor::OrderError;
use crate::model::{Position, Rider};
use async_trait::async_trait;
use tracing::debug;

/// Default upper bound on how many active riders are considered per order.
pub const DEFAULT_SAMPLE_LIMIT: usize = 100;

/// Produces the riders a dispatch may choose from.
///
/// The returned list is a snapshot; the ledger re-checks the winner when the order is
/// committed.
#[async_trait]
pub trait CandidateSelector: Send + Sync {
    async fn candidates(&self, consumer: Position) -> Result<Vec<Rider>, OrderError>;
}

/// A uniform random sample of at most `limit` active riders, taken from the registry.
///
/// The consumer position is not used to bias the sample.
#[derive(Clone)]
pub struct RandomSampleSelector {
    ledger: LedgerClient,
    limit: usize,
}

impl RandomSampleSelector {
    pub fn new(ledger: LedgerClient, limit: usize) -> Self {
        Self { ledger, limit }
    }
}

#[async_trait]
impl CandidateSelector for RandomSampleSelector {
    async fn candidates(&self, consumer: Position) -> Result<Vec<Rider>, OrderError> {
        let riders = self
            .ledger
            .list_active_sample(self.limit)
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?;
        debug!(%consumer, sampled = riders.len(), limit = self.limit, "Sampled riders");
        Ok(riders)
    }
}
