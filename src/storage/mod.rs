//! Storage abstraction.
//!
//! The rest of the crate only ever talks to [`LinkStore`]; the concrete
//! persistence technology stays behind this trait. The bundled
//! [`memory::MemoryStore`] backend is the default and the one the tests run
//! against.

pub mod memory;
pub mod models;

pub use models::{Link, VisitRecord};

use async_trait::async_trait;

use crate::errors::Result;

#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Look up a link by code, filtered to `active = true`.
    ///
    /// Inactive and missing links are indistinguishable here on purpose:
    /// both come back as `None`.
    async fn find_active_by_code(&self, code: &str) -> Result<Option<Link>>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Link>>;

    /// Existence check used by the allocator and alias pre-checks. Covers
    /// inactive links too; a logically deleted code stays reserved.
    async fn exists_by_code(&self, code: &str) -> Result<bool>;

    /// Insert a new link. A unique-constraint violation on `code` maps to
    /// [`crate::errors::LinkforgeError::AliasTaken`], which is what resolves
    /// the check-then-insert race on custom aliases.
    async fn insert_link(&self, link: Link) -> Result<Link>;

    /// Atomically add 1 to the link's click count. This must be a single
    /// store operation, never a read-modify-write pair.
    async fn increment_clicks(&self, id: &str) -> Result<()>;

    /// Append one visit record. Best-effort callers swallow the error.
    async fn insert_visit_record(&self, record: VisitRecord) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}
