use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shortened link.
///
/// `code` is globally unique and immutable once created. `click_count` only
/// ever increases; increments go through [`crate::storage::LinkStore::increment_clicks`]
/// so they stay atomic per link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub code: String,
    pub original_url: String,
    pub owner_id: String,
    pub custom_alias: Option<String>,
    /// Advisory AI suggestions (at most 3). Never re-validated for
    /// uniqueness unless a user picks one as a custom alias later.
    pub suggested_aliases: Vec<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub click_count: u64,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Build a fresh link with default enrichment fields.
    pub fn new(code: String, original_url: String, owner_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code,
            original_url,
            owner_id,
            custom_alias: None,
            suggested_aliases: Vec::new(),
            category: "uncategorized".to_string(),
            tags: Vec::new(),
            click_count: 0,
            active: true,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at < now)
    }
}

/// One captured visit. Append-only, best-effort; owned by the analytics
/// subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitRecord {
    pub link_id: String,
    pub timestamp: DateTime<Utc>,
    /// Display-normalized source IP (`localhost` for loopback).
    pub source_ip: String,
    pub user_agent_raw: String,
    pub referrer: Option<String>,
    pub country: String,
    pub city: String,
    pub device: String,
    pub browser: String,
    pub os: String,
}
