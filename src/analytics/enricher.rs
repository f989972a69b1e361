//! Visit enrichment.
//!
//! Runs fully asynchronously with respect to the redirect response that
//! triggered it: parses the user agent, resolves geography, normalizes the
//! source IP for display, and persists exactly one `VisitRecord`. Any
//! failure in this path is logged and discarded; it never reaches the
//! redirecting client and never touches link state.

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{trace, warn};
use woothee::parser::Parser;

use super::geoip::GeoIpProvider;
use super::VisitFingerprint;
use crate::errors::Result;
use crate::storage::{LinkStore, VisitRecord};
use crate::utils::ip::{display_ip, is_private_or_local};

const UNKNOWN: &str = "unknown";

/// Parsed user-agent triple; each field defaults to `"unknown"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAgent {
    pub device: String,
    pub browser: String,
    pub os: String,
}

impl Default for ParsedAgent {
    fn default() -> Self {
        Self {
            device: UNKNOWN.to_string(),
            browser: UNKNOWN.to_string(),
            os: UNKNOWN.to_string(),
        }
    }
}

/// Parse a raw user-agent string. Unparseable input (or woothee's own
/// UNKNOWN markers) collapses to `"unknown"` per field.
pub fn parse_user_agent(ua: &str) -> ParsedAgent {
    let parser = Parser::new();
    let Some(result) = parser.parse(ua) else {
        return ParsedAgent::default();
    };

    let field = |value: &str| {
        if value.is_empty() || value == "UNKNOWN" {
            UNKNOWN.to_string()
        } else {
            value.to_string()
        }
    };

    ParsedAgent {
        device: field(result.category),
        browser: field(result.name),
        os: field(result.os),
    }
}

pub struct VisitEnricher {
    store: Arc<dyn LinkStore>,
    geoip: GeoIpProvider,
}

impl VisitEnricher {
    pub fn new(store: Arc<dyn LinkStore>, geoip: GeoIpProvider) -> Self {
        Self { store, geoip }
    }

    /// Fire-and-forget entry point. Never propagates, never retries.
    pub async fn capture(&self, fingerprint: VisitFingerprint) {
        if let Err(e) = self.capture_inner(fingerprint).await {
            warn!("Visit capture failed (non-blocking): {}", e);
        }
    }

    async fn capture_inner(&self, fingerprint: VisitFingerprint) -> Result<()> {
        let agent = fingerprint
            .user_agent
            .as_deref()
            .map(parse_user_agent)
            .unwrap_or_default();

        let raw_ip = fingerprint.source_ip.as_deref().unwrap_or(UNKNOWN);
        let (source_ip, country, city) = self.resolve_geo(raw_ip).await;

        let record = VisitRecord {
            link_id: fingerprint.link_id,
            timestamp: fingerprint.timestamp,
            source_ip,
            user_agent_raw: fingerprint
                .user_agent
                .unwrap_or_else(|| UNKNOWN.to_string()),
            referrer: fingerprint.referrer,
            country,
            city,
            device: agent.device,
            browser: agent.browser,
            os: agent.os,
        };

        trace!(
            link_id = %record.link_id,
            country = %record.country,
            browser = %record.browser,
            "Persisting visit record"
        );

        self.store.insert_visit_record(record).await
    }

    /// Resolve display IP plus country/city.
    ///
    /// Loopback and private addresses skip the lookup entirely and come
    /// back as "Local"; public addresses the provider cannot resolve come
    /// back as "Unknown".
    async fn resolve_geo(&self, raw_ip: &str) -> (String, String, String) {
        let display = display_ip(raw_ip);

        match raw_ip.parse::<IpAddr>() {
            Ok(addr) if is_private_or_local(&addr) => {
                (display, "Local".to_string(), "Local".to_string())
            }
            Ok(_) => {
                let geo = self.geoip.lookup(raw_ip).await.unwrap_or_default();
                (
                    display,
                    geo.country.unwrap_or_else(|| "Unknown".to_string()),
                    geo.city.unwrap_or_else(|| "Unknown".to_string()),
                )
            }
            Err(_) => (display, "Unknown".to_string(), "Unknown".to_string()),
        }
    }
}
