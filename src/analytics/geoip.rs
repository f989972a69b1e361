//! GeoIP lookup.
//!
//! A MaxMind GeoLite2 database when one is configured and readable,
//! otherwise a null provider that resolves nothing.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use maxminddb::Reader;
use tracing::{debug, info, trace, warn};

use crate::config::AnalyticsConfig;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoInfo {
    /// ISO 3166-1 alpha-2 country code (e.g. "US")
    pub country: Option<String>,
    pub city: Option<String>,
}

#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo>;

    /// Provider name, for logs.
    fn name(&self) -> &'static str;
}

/// MaxMind GeoLite2 provider backed by a local .mmdb file.
pub struct MaxMindProvider {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindProvider {
    pub fn new(path: &str) -> Result<Self, maxminddb::MaxMindDbError> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }
}

#[async_trait]
impl GeoIpLookup for MaxMindProvider {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        let ip_addr: IpAddr = ip.parse().ok()?;

        let result = self.reader.lookup(ip_addr).ok()?;
        let city: maxminddb::geoip2::City = result.decode().ok()??;

        let country = city.country.iso_code.map(String::from);
        let city_name = city.city.names.english.map(|s| s.to_string());

        trace!(
            "MaxMind lookup for {}: country={:?}, city={:?}",
            ip, country, city_name
        );

        Some(GeoInfo {
            country,
            city: city_name,
        })
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}

/// Provider used when no database is configured. Always resolves nothing,
/// leaving the enricher to fill in its defaults.
pub struct NullProvider;

#[async_trait]
impl GeoIpLookup for NullProvider {
    async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
        None
    }

    fn name(&self) -> &'static str {
        "Null"
    }
}

/// Unified provider, selected from configuration at startup.
pub struct GeoIpProvider {
    inner: Arc<dyn GeoIpLookup>,
}

impl GeoIpProvider {
    pub fn new(config: &AnalyticsConfig) -> Self {
        let inner: Arc<dyn GeoIpLookup> = if let Some(ref path) = config.maxminddb_path {
            match MaxMindProvider::new(path) {
                Ok(provider) => {
                    info!("GeoIP: Using MaxMind database at {}", path);
                    Arc::new(provider)
                }
                Err(e) => {
                    warn!(
                        "GeoIP: Failed to load MaxMind database at {}: {}, geo lookup disabled",
                        path, e
                    );
                    Arc::new(NullProvider)
                }
            }
        } else {
            debug!("GeoIP: No MaxMind database configured, geo lookup disabled");
            Arc::new(NullProvider)
        };

        Self { inner }
    }

    pub fn from_lookup(inner: Arc<dyn GeoIpLookup>) -> Self {
        Self { inner }
    }

    pub async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        self.inner.lookup(ip).await
    }

    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}

impl Clone for GeoIpProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_provider_resolves_nothing() {
        let provider = NullProvider;
        assert!(provider.lookup("8.8.8.8").await.is_none());
        assert_eq!(provider.name(), "Null");
    }

    #[test]
    fn test_provider_falls_back_without_database() {
        let config = AnalyticsConfig {
            maxminddb_path: None,
        };
        let provider = GeoIpProvider::new(&config);
        assert_eq!(provider.provider_name(), "Null");
    }

    #[test]
    fn test_provider_falls_back_on_unreadable_database() {
        let config = AnalyticsConfig {
            maxminddb_path: Some("/nonexistent/GeoLite2-City.mmdb".to_string()),
        };
        let provider = GeoIpProvider::new(&config);
        assert_eq!(provider.provider_name(), "Null");
    }
}
