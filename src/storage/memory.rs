//! In-memory store backend.
//!
//! Links live in a `DashMap` keyed by code with a secondary id index.
//! Uniqueness is enforced through the map's entry API, and click increments
//! run under the shard lock, so concurrent redirects never lose updates.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use async_trait::async_trait;

use super::models::{Link, VisitRecord};
use super::LinkStore;
use crate::errors::{LinkforgeError, Result};

#[derive(Default)]
pub struct MemoryStore {
    /// code -> link
    links: DashMap<String, Link>,
    /// id -> code
    id_index: DashMap<String, String>,
    visits: Mutex<Vec<VisitRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of captured visits. Test/diagnostic accessor.
    pub fn visit_count(&self) -> usize {
        self.visits.lock().len()
    }

    /// Snapshot of visits for one link. Test/diagnostic accessor.
    pub fn visits_for_link(&self, link_id: &str) -> Vec<VisitRecord> {
        self.visits
            .lock()
            .iter()
            .filter(|v| v.link_id == link_id)
            .cloned()
            .collect()
    }

    /// Current state of a link by code, regardless of `active`.
    pub fn link_by_code(&self, code: &str) -> Option<Link> {
        self.links.get(code).map(|entry| entry.clone())
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn find_active_by_code(&self, code: &str) -> Result<Option<Link>> {
        Ok(self
            .links
            .get(code)
            .filter(|link| link.active)
            .map(|link| link.clone()))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Link>> {
        let Some(code) = self.id_index.get(id).map(|c| c.clone()) else {
            return Ok(None);
        };
        Ok(self.links.get(&code).map(|link| link.clone()))
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool> {
        Ok(self.links.contains_key(code))
    }

    async fn insert_link(&self, link: Link) -> Result<Link> {
        match self.links.entry(link.code.clone()) {
            Entry::Occupied(_) => Err(LinkforgeError::alias_taken(format!(
                "code '{}' already exists",
                link.code
            ))),
            Entry::Vacant(slot) => {
                self.id_index.insert(link.id.clone(), link.code.clone());
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn increment_clicks(&self, id: &str) -> Result<()> {
        let code = self
            .id_index
            .get(id)
            .map(|c| c.clone())
            .ok_or_else(|| LinkforgeError::not_found(format!("link id '{}' not found", id)))?;

        // get_mut holds the shard write lock, so the += is atomic.
        match self.links.get_mut(&code) {
            Some(mut link) => {
                link.click_count += 1;
                link.updated_at = chrono::Utc::now();
                Ok(())
            }
            None => Err(LinkforgeError::not_found(format!(
                "link '{}' missing from store",
                code
            ))),
        }
    }

    async fn insert_visit_record(&self, record: VisitRecord) -> Result<()> {
        self.visits.lock().push(record);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
