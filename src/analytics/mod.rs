//! Visit analytics capture.
//!
//! The redirect path hands a raw [`VisitFingerprint`] to a detached task;
//! [`enricher::VisitEnricher`] turns it into one `VisitRecord` off the
//! critical path. Everything in here is best-effort telemetry.

pub mod enricher;
pub mod geoip;

pub use enricher::VisitEnricher;
pub use geoip::{GeoInfo, GeoIpLookup, GeoIpProvider};

use chrono::{DateTime, Utc};

/// Raw request attributes captured at redirect time, before any enrichment.
#[derive(Debug, Clone)]
pub struct VisitFingerprint {
    pub link_id: String,
    pub timestamp: DateTime<Utc>,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl VisitFingerprint {
    pub fn new(link_id: String) -> Self {
        Self {
            link_id,
            timestamp: Utc::now(),
            source_ip: None,
            user_agent: None,
            referrer: None,
        }
    }
}
