//! AI link enrichment.
//!
//! Three operations against one external text-generation endpoint: alias
//! suggestions, URL categorization, and analytics insights. Each call runs
//! under its own timeout, and every external-service failure (timeout,
//! network, non-2xx, malformed output) is absorbed into a deterministic
//! fallback. Nothing in this module errors to its caller.

pub mod client;
pub mod parse;

pub use client::{HttpInferenceClient, InferenceClient, InferenceError};

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::InferenceConfig;

/// Category plus tags for a URL. The fallback value doubles as the parse
/// default for each independently-matched field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categorization {
    pub category: String,
    pub tags: Vec<String>,
}

impl Default for Categorization {
    fn default() -> Self {
        Self {
            category: "uncategorized".to_string(),
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    Trend,
    PeakTime,
    GeographicPattern,
    Anomaly,
}

impl FromStr for InsightType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trend" => Ok(Self::Trend),
            "peak_time" => Ok(Self::PeakTime),
            "geographic_pattern" => Ok(Self::GeographicPattern),
            "anomaly" => Ok(Self::Anomaly),
            _ => Err(()),
        }
    }
}

/// One analytics insight produced by [`AiEnrichment::generate_insights`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub text: String,
    /// Always within [0, 1].
    pub confidence: f64,
}

/// Per-operation generation budgets.
const ALIAS_MAX_TOKENS: u32 = 64;
const CATEGORIZE_MAX_TOKENS: u32 = 96;
const INSIGHTS_MAX_TOKENS: u32 = 256;

pub struct AiEnrichment {
    client: Arc<dyn InferenceClient>,
    alias_timeout: Duration,
    categorize_timeout: Duration,
    insights_timeout: Duration,
}

impl AiEnrichment {
    pub fn new(client: Arc<dyn InferenceClient>, config: &InferenceConfig) -> Self {
        Self {
            client,
            alias_timeout: Duration::from_secs(config.alias_timeout_secs),
            categorize_timeout: Duration::from_secs(config.categorize_timeout_secs),
            insights_timeout: Duration::from_secs(config.insights_timeout_secs),
        }
    }

    /// Suggest up to 3 short alias candidates for a URL.
    ///
    /// Suggestions are advisory; uniqueness is only checked if a user later
    /// picks one as a custom alias. Fallback: empty vec.
    pub async fn suggest_aliases(&self, original_url: &str) -> Vec<String> {
        let prompt = format!(
            "Generate 3 short, memorable URL aliases for: {}. \
             Rules: 3-15 chars, lowercase, hyphens allowed, no special chars. \
             Return only 3 aliases separated by newlines.",
            original_url
        );

        match self
            .client
            .complete(&prompt, ALIAS_MAX_TOKENS, self.alias_timeout)
            .await
        {
            Ok(text) => parse::parse_alias_lines(&text),
            Err(e) => {
                warn!("Alias suggestion failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Categorize a URL and extract up to 5 tags.
    ///
    /// Fallback: `{category: "uncategorized", tags: []}`.
    pub async fn categorize_url(&self, original_url: &str) -> Categorization {
        let prompt = format!(
            "Categorize this URL and extract 3-5 relevant tags: {}. \
             Return format exactly:\nCategory: <category>\nTags: <tag1>, <tag2>, <tag3>\n\n\
             Categories: blog, product, documentation, social, news, video, education, \
             ecommerce, other",
            original_url
        );

        match self
            .client
            .complete(&prompt, CATEGORIZE_MAX_TOKENS, self.categorize_timeout)
            .await
        {
            Ok(text) => parse::parse_categorization(&text),
            Err(e) => {
                warn!("Categorization failed: {}", e);
                Categorization::default()
            }
        }
    }

    /// Generate up to 5 insights from an analytics summary. Fallback: empty vec.
    pub async fn generate_insights(&self, link_id: &str, analytics_summary: &str) -> Vec<Insight> {
        let summary = if analytics_summary.is_empty() {
            "No analytics data yet"
        } else {
            analytics_summary
        };
        let prompt = format!(
            "Analyze these link analytics and provide 3-5 insights. \
             Return **only** a JSON array:\n\n\
             [{{\"type\": \"trend|peak_time|geographic_pattern|anomaly\", \
             \"text\": \"human readable insight\", \"confidence\": 0.0-1.0}}]\n\n\
             Analytics summary: {}",
            summary
        );

        match self
            .client
            .complete(&prompt, INSIGHTS_MAX_TOKENS, self.insights_timeout)
            .await
        {
            Ok(text) => parse::parse_insights(&text),
            Err(e) => {
                warn!("Insights generation for link {} failed: {}", link_id, e);
                Vec::new()
            }
        }
    }
}
