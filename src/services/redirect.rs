//! Redirect resolution: the hot path.
//!
//! Resolves a code to its destination, counts the visit with a single
//! atomic store increment, and hands the raw fingerprint to a detached
//! analytics task. The destination is returned (and the HTTP redirect
//! issued) without waiting on that task; an analytics failure can never
//! surface to or delay the redirecting client.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::analytics::{VisitEnricher, VisitFingerprint};
use crate::errors::{LinkforgeError, Result};
use crate::storage::LinkStore;

pub struct RedirectResolver {
    store: Arc<dyn LinkStore>,
    enricher: Arc<VisitEnricher>,
}

impl RedirectResolver {
    pub fn new(store: Arc<dyn LinkStore>, enricher: Arc<VisitEnricher>) -> Self {
        Self { store, enricher }
    }

    /// Resolve a code to its destination URL.
    ///
    /// Missing, inactive, and expired links are indistinguishable to the
    /// caller: all three are `NotFound`.
    pub async fn resolve(&self, code: &str, mut fingerprint: VisitFingerprint) -> Result<String> {
        let link = self
            .store
            .find_active_by_code(code)
            .await?
            .ok_or_else(|| LinkforgeError::not_found(format!("no active link for '{}'", code)))?;

        if link.is_expired(Utc::now()) {
            debug!("Expired link treated as not found: {}", code);
            return Err(LinkforgeError::not_found(format!(
                "no active link for '{}'",
                code
            )));
        }

        // One atomic op against the store; never read-modify-write.
        self.store.increment_clicks(&link.id).await?;

        fingerprint.link_id = link.id.clone();

        // Detached task with its own lifetime: not tied to the request
        // scope, so finishing the response cannot cancel it. The enricher
        // owns its error boundary.
        let enricher = Arc::clone(&self.enricher);
        tokio::spawn(async move {
            enricher.capture(fingerprint).await;
        });

        Ok(link.original_url)
    }
}
