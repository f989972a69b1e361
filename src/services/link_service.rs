//! Link creation service.
//!
//! Validation, code allocation (or custom-alias checks), concurrent AI
//! enrichment with independent fallbacks, and the final insert. Enrichment
//! can only ever degrade the created link's optional fields; it cannot fail
//! the creation.

use std::sync::Arc;

use tracing::info;

use crate::ai::{AiEnrichment, Insight};
use crate::errors::{LinkforgeError, Result};
use crate::services::allocator::CodeAllocator;
use crate::storage::{Link, LinkStore};
use crate::utils::is_valid_code;
use crate::utils::url_validator::validate_url;

/// Request to create a new link.
#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    pub original_url: String,
    pub custom_alias: Option<String>,
    pub owner_id: String,
}

pub struct LinkService {
    store: Arc<dyn LinkStore>,
    allocator: CodeAllocator,
    ai: Arc<AiEnrichment>,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>, ai: Arc<AiEnrichment>) -> Self {
        let allocator = CodeAllocator::new(Arc::clone(&store));
        Self {
            store,
            allocator,
            ai,
        }
    }

    /// Create a new short link.
    pub async fn create_link(&self, req: CreateLinkRequest) -> Result<Link> {
        validate_url(&req.original_url)
            .map_err(|e| LinkforgeError::validation(e.to_string()))?;

        // Alias validation happens before any store access.
        let code = match req.custom_alias.as_deref().filter(|a| !a.is_empty()) {
            Some(alias) => {
                if !is_valid_code(alias) {
                    return Err(LinkforgeError::validation(format!(
                        "Invalid custom alias '{}'. Use 3-20 lowercase letters, digits, or hyphens.",
                        alias
                    )));
                }
                if self.store.exists_by_code(alias).await? {
                    return Err(LinkforgeError::alias_taken(format!(
                        "Custom alias '{}' already taken",
                        alias
                    )));
                }
                alias.to_string()
            }
            None => self.allocator.allocate().await?,
        };

        // Both enrichment calls run concurrently and fail independently;
        // each already degrades to its own fallback, so this join settles
        // rather than short-circuits.
        let (suggested_aliases, categorization) = tokio::join!(
            self.ai.suggest_aliases(&req.original_url),
            self.ai.categorize_url(&req.original_url),
        );

        let mut link = Link::new(code, req.original_url, req.owner_id);
        link.custom_alias = req.custom_alias.filter(|a| !a.is_empty());
        link.suggested_aliases = suggested_aliases;
        link.category = categorization.category;
        link.tags = categorization.tags;

        // A racing insert of the same alias surfaces here as AliasTaken via
        // the store's unique constraint.
        let created = self.store.insert_link(link).await?;

        info!(
            "Created link '{}' -> '{}' (category: {})",
            created.code, created.original_url, created.category
        );
        Ok(created)
    }

    /// On-demand insights for an existing link.
    ///
    /// The summary handed to the model is assembled here from current link
    /// state; inference failure degrades to an empty list, only a missing
    /// link is an error.
    pub async fn link_insights(&self, id: &str) -> Result<Vec<Insight>> {
        let link = self
            .store
            .get_by_id(id)
            .await?
            .ok_or_else(|| LinkforgeError::not_found(format!("no link with id '{}'", id)))?;

        let summary = format!(
            "Total clicks: {}. Category: {}. Tags: {}. Created: {}.",
            link.click_count,
            link.category,
            if link.tags.is_empty() {
                "none".to_string()
            } else {
                link.tags.join(", ")
            },
            link.created_at.to_rfc3339(),
        );

        Ok(self.ai.generate_insights(&link.id, &summary).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::client::{InferenceClient, InferenceError};
    use crate::config::InferenceConfig;
    use crate::storage::memory::MemoryStore;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedClient(String);

    #[async_trait]
    impl InferenceClient for FixedClient {
        async fn complete(
            &self,
            _prompt: &str,
            _max_tokens: u32,
            _timeout: Duration,
        ) -> std::result::Result<String, InferenceError> {
            Ok(self.0.clone())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl InferenceClient for FailingClient {
        async fn complete(
            &self,
            _prompt: &str,
            _max_tokens: u32,
            _timeout: Duration,
        ) -> std::result::Result<String, InferenceError> {
            Err(InferenceError::Request("connection refused".into()))
        }
    }

    fn inference_config() -> InferenceConfig {
        InferenceConfig {
            base_url: "http://localhost:1234/v1".into(),
            api_key: None,
            model: "test-model".into(),
            alias_timeout_secs: 1,
            categorize_timeout_secs: 1,
            insights_timeout_secs: 1,
        }
    }

    fn service(store: Arc<MemoryStore>, client: Arc<dyn InferenceClient>) -> LinkService {
        let ai = Arc::new(AiEnrichment::new(client, &inference_config()));
        LinkService::new(store as Arc<dyn LinkStore>, ai)
    }

    fn request(url: &str, alias: Option<&str>) -> CreateLinkRequest {
        CreateLinkRequest {
            original_url: url.to_string(),
            custom_alias: alias.map(String::from),
            owner_id: "owner-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_with_generated_code() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone(), Arc::new(FailingClient));

        let link = svc
            .create_link(request("https://example.com", None))
            .await
            .unwrap();
        assert_eq!(link.code.len(), 6);
        assert!(store.exists_by_code(&link.code).await.unwrap());
    }

    #[tokio::test]
    async fn test_enrichment_failure_degrades_to_defaults() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store, Arc::new(FailingClient));

        let link = svc
            .create_link(request("https://example.com", None))
            .await
            .unwrap();
        assert!(link.suggested_aliases.is_empty());
        assert_eq!(link.category, "uncategorized");
        assert!(link.tags.is_empty());
    }

    #[tokio::test]
    async fn test_enrichment_applied_when_available() {
        // One stub feeds both operations; the alias parser reads lines and
        // the categorizer only matches its labeled lines.
        let store = Arc::new(MemoryStore::new());
        let svc = service(
            store,
            Arc::new(FixedClient(
                "Category: blog\nTags: rust, links".to_string(),
            )),
        );

        let link = svc
            .create_link(request("https://example.com", None))
            .await
            .unwrap();
        assert_eq!(link.category, "blog");
        assert_eq!(link.tags, vec!["rust", "links"]);
        assert!(!link.suggested_aliases.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_alias_rejected_before_store_access() {
        use crate::storage::VisitRecord;
        use std::sync::atomic::{AtomicUsize, Ordering};

        #[derive(Default)]
        struct CountingStore {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl LinkStore for CountingStore {
            async fn find_active_by_code(&self, _: &str) -> crate::errors::Result<Option<Link>> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            }
            async fn get_by_id(&self, _: &str) -> crate::errors::Result<Option<Link>> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            }
            async fn exists_by_code(&self, _: &str) -> crate::errors::Result<bool> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(false)
            }
            async fn insert_link(&self, link: Link) -> crate::errors::Result<Link> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(link)
            }
            async fn increment_clicks(&self, _: &str) -> crate::errors::Result<()> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            async fn insert_visit_record(&self, _: VisitRecord) -> crate::errors::Result<()> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            fn backend_name(&self) -> &'static str {
                "counting"
            }
        }

        let store = Arc::new(CountingStore::default());
        let ai = Arc::new(AiEnrichment::new(
            Arc::new(FailingClient),
            &inference_config(),
        ));
        let svc = LinkService::new(store.clone() as Arc<dyn LinkStore>, ai);

        // Too short
        let err = svc
            .create_link(request("https://example.com", Some("ab")))
            .await
            .unwrap_err();
        assert!(matches!(err, LinkforgeError::Validation(_)));

        // Wrong charset
        let err = svc
            .create_link(request("https://example.com", Some("My-Alias")))
            .await
            .unwrap_err();
        assert!(matches!(err, LinkforgeError::Validation(_)));

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_taken_alias_is_conflict() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone(), Arc::new(FailingClient));

        svc.create_link(request("https://example.com", Some("my-alias")))
            .await
            .unwrap();
        let err = svc
            .create_link(request("https://other.com", Some("my-alias")))
            .await
            .unwrap_err();
        assert!(matches!(err, LinkforgeError::AliasTaken(_)));
    }

    #[tokio::test]
    async fn test_insights_for_existing_link() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(
            store,
            Arc::new(FixedClient(
                "[{\"type\":\"trend\",\"text\":\"steady growth\",\"confidence\":0.7}]".into(),
            )),
        );

        let link = svc
            .create_link(request("https://example.com", None))
            .await
            .unwrap();
        let insights = svc.link_insights(&link.id).await.unwrap();
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].text, "steady growth");
    }

    #[tokio::test]
    async fn test_insights_for_missing_link_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store, Arc::new(FailingClient));

        let err = svc.link_insights("no-such-id").await.unwrap_err();
        assert!(matches!(err, LinkforgeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store, Arc::new(FailingClient));

        let err = svc
            .create_link(request("javascript:alert(1)", None))
            .await
            .unwrap_err();
        assert!(matches!(err, LinkforgeError::Validation(_)));
    }
}
