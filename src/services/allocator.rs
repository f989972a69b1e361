//! Short-code allocation.
//!
//! Draws fixed-length random codes and guarantees, against the store, that
//! the returned code does not exist at the instant of return. Repeated
//! collisions in a 62^6 keyspace point at a store problem, so exhaustion is
//! a hard error rather than a silent fallback to longer codes.

use std::sync::Arc;

use tracing::{debug, error};

use crate::errors::{LinkforgeError, Result};
use crate::storage::LinkStore;
use crate::utils::{generate_random_code, GENERATED_CODE_LENGTH};

const MAX_ATTEMPTS: usize = 5;

pub struct CodeAllocator {
    store: Arc<dyn LinkStore>,
    code_length: usize,
    max_attempts: usize,
}

impl CodeAllocator {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self {
            store,
            code_length: GENERATED_CODE_LENGTH,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// Allocate a code that does not exist in the store.
    pub async fn allocate(&self) -> Result<String> {
        for attempt in 1..=self.max_attempts {
            let code = generate_random_code(self.code_length).to_lowercase();

            if !self.store.exists_by_code(&code).await? {
                return Ok(code);
            }

            debug!(
                "Code collision on attempt {}/{}: {}",
                attempt, self.max_attempts, code
            );
        }

        error!(
            "Code allocation exhausted after {} attempts; store may be degenerate",
            self.max_attempts
        );
        Err(LinkforgeError::allocation_exhausted(format!(
            "could not allocate a unique code in {} attempts",
            self.max_attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;
    use crate::storage::Link;

    #[tokio::test]
    async fn test_allocate_returns_unused_lowercase_code() {
        let store = Arc::new(MemoryStore::new());
        let allocator = CodeAllocator::new(store.clone() as Arc<dyn LinkStore>);

        let code = allocator.allocate().await.unwrap();
        assert_eq!(code.len(), GENERATED_CODE_LENGTH);
        assert_eq!(code, code.to_lowercase());
        assert!(!store.exists_by_code(&code).await.unwrap());
    }

    #[tokio::test]
    async fn test_exhaustion_when_every_code_collides() {
        use async_trait::async_trait;
        use crate::storage::VisitRecord;

        /// Store whose keyspace is already "full".
        struct SaturatedStore;

        #[async_trait]
        impl LinkStore for SaturatedStore {
            async fn find_active_by_code(&self, _: &str) -> Result<Option<Link>> {
                Ok(None)
            }
            async fn get_by_id(&self, _: &str) -> Result<Option<Link>> {
                Ok(None)
            }
            async fn exists_by_code(&self, _: &str) -> Result<bool> {
                Ok(true)
            }
            async fn insert_link(&self, link: Link) -> Result<Link> {
                Ok(link)
            }
            async fn increment_clicks(&self, _: &str) -> Result<()> {
                Ok(())
            }
            async fn insert_visit_record(&self, _: VisitRecord) -> Result<()> {
                Ok(())
            }
            fn backend_name(&self) -> &'static str {
                "saturated"
            }
        }

        let allocator = CodeAllocator::new(Arc::new(SaturatedStore));
        let err = allocator.allocate().await.unwrap_err();
        assert!(matches!(err, LinkforgeError::AllocationExhausted(_)));
    }
}
