//! Parsers for model output.
//!
//! The inference response is an untrusted string; every function here is
//! total and degrades to the documented default on any shape mismatch.

use serde_json::Value;

use super::{Categorization, Insight, InsightType};

pub const MAX_ALIAS_SUGGESTIONS: usize = 3;
pub const MAX_ALIAS_LENGTH: usize = 15;
pub const MAX_TAGS: usize = 5;
pub const MAX_INSIGHTS: usize = 5;

/// Parse newline-separated alias candidates.
///
/// Takes the first 3 non-empty lines, lowercases them, strips everything
/// outside `[a-z0-9-]`, and truncates to 15 chars. Candidates that
/// sanitize to nothing are dropped.
pub fn parse_alias_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_ALIAS_SUGGESTIONS)
        .map(sanitize_alias)
        .filter(|alias| !alias.is_empty())
        .collect()
}

fn sanitize_alias(line: &str) -> String {
    line.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .take(MAX_ALIAS_LENGTH)
        .collect()
}

/// Parse the two-line `Category:` / `Tags:` format.
///
/// Each line is matched independently; a missing line yields that field's
/// default without failing the other.
pub fn parse_categorization(text: &str) -> Categorization {
    let mut result = Categorization::default();

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(rest) = strip_prefix_ci(trimmed, "category:") {
            let word: String = rest
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect();
            if !word.is_empty() {
                result.category = word.to_lowercase();
            }
        } else if let Some(rest) = strip_prefix_ci(trimmed, "tags:") {
            result.tags = rest
                .split(',')
                .map(|tag| tag.trim().to_lowercase())
                .filter(|tag| !tag.is_empty())
                .take(MAX_TAGS)
                .collect();
        }
    }

    result
}

fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    // get() also rejects a non-char-boundary split on multibyte input
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        line.get(prefix.len()..)
    } else {
        None
    }
}

/// Parse an insights JSON array, tolerating surrounding code fences.
///
/// Anything that is not a JSON array yields `[]`. Elements missing `type`
/// or `text`, carrying an unknown type, or a non-numeric `confidence` are
/// dropped individually rather than failing the batch.
pub fn parse_insights(text: &str) -> Vec<Insight> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(cleaned) else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(parse_insight_element)
        .take(MAX_INSIGHTS)
        .collect()
}

fn parse_insight_element(value: Value) -> Option<Insight> {
    let obj = value.as_object()?;

    let insight_type: InsightType = obj
        .get("type")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse().ok())?;

    let text = obj.get("text").and_then(Value::as_str)?;
    if text.is_empty() {
        return None;
    }

    let confidence = obj.get("confidence").and_then(Value::as_f64)?;

    Some(Insight {
        insight_type,
        text: text.to_string(),
        confidence: confidence.clamp(0.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_lines_basic() {
        let text = "quick-docs\nrusty-links\nshort-stop\nfourth-ignored";
        assert_eq!(
            parse_alias_lines(text),
            vec!["quick-docs", "rusty-links", "short-stop"]
        );
    }

    #[test]
    fn test_alias_lines_sanitized() {
        let text = "1. My_Fancy Alias!\n  go-docs  \n\n\nextra";
        let parsed = parse_alias_lines(text);
        // "1. My_Fancy Alias!" lowercases and strips to "1myfancyalias"
        assert_eq!(parsed, vec!["1myfancyalias", "go-docs", "extra"]);
        assert!(parsed.iter().all(|a| a.len() <= MAX_ALIAS_LENGTH));
    }

    #[test]
    fn test_alias_lines_empty_input() {
        assert!(parse_alias_lines("").is_empty());
        assert!(parse_alias_lines("\n\n  \n").is_empty());
        // A line of pure punctuation sanitizes to nothing and is dropped
        assert!(parse_alias_lines("!!! ???").is_empty());
    }

    #[test]
    fn test_alias_truncation() {
        let long = "a".repeat(40);
        let parsed = parse_alias_lines(&long);
        assert_eq!(parsed, vec!["a".repeat(15)]);
    }

    #[test]
    fn test_categorization_full() {
        let text = "Category: blog\nTags: rust, web, Programming";
        let parsed = parse_categorization(text);
        assert_eq!(parsed.category, "blog");
        assert_eq!(parsed.tags, vec!["rust", "web", "programming"]);
    }

    #[test]
    fn test_categorization_missing_tags_line() {
        let parsed = parse_categorization("Category: blog");
        assert_eq!(parsed.category, "blog");
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_categorization_missing_category_line() {
        let parsed = parse_categorization("Tags: one, two");
        assert_eq!(parsed.category, "uncategorized");
        assert_eq!(parsed.tags, vec!["one", "two"]);
    }

    #[test]
    fn test_categorization_garbage() {
        let parsed = parse_categorization("I'm sorry, I can't categorize that.");
        assert_eq!(parsed.category, "uncategorized");
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_categorization_non_ascii_output() {
        // A model answering in another script must degrade, not panic
        let parsed = parse_categorization("Категория: блог\nTags: rust");
        assert_eq!(parsed.category, "uncategorized");
        assert_eq!(parsed.tags, vec!["rust"]);

        let parsed = parse_categorization("Категория: блог\nТеги: что-то");
        assert_eq!(parsed, Categorization::default());
    }

    #[test]
    fn test_categorization_tag_cap() {
        let parsed = parse_categorization("Tags: a, b, c, d, e, f, g");
        assert_eq!(parsed.tags.len(), MAX_TAGS);
    }

    #[test]
    fn test_categorization_case_insensitive_labels() {
        let parsed = parse_categorization("category: News\ntags: Breaking");
        assert_eq!(parsed.category, "news");
        assert_eq!(parsed.tags, vec!["breaking"]);
    }

    #[test]
    fn test_insights_fenced_with_invalid_element() {
        let text =
            "```json\n[{\"type\":\"trend\",\"text\":\"ok\",\"confidence\":0.8},{\"text\":\"bad\"}]\n```";
        let parsed = parse_insights(text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].insight_type, InsightType::Trend);
        assert_eq!(parsed[0].text, "ok");
        assert!((parsed[0].confidence - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_insights_not_an_array() {
        assert!(parse_insights("{\"type\":\"trend\"}").is_empty());
        assert!(parse_insights("no json here").is_empty());
        assert!(parse_insights("").is_empty());
    }

    #[test]
    fn test_insights_unknown_type_dropped() {
        let text = "[{\"type\":\"sorcery\",\"text\":\"ok\",\"confidence\":0.5}]";
        assert!(parse_insights(text).is_empty());
    }

    #[test]
    fn test_insights_confidence_clamped_and_capped() {
        let element = "{\"type\":\"anomaly\",\"text\":\"spike\",\"confidence\":1.7}";
        let text = format!(
            "[{}]",
            std::iter::repeat(element)
                .take(7)
                .collect::<Vec<_>>()
                .join(",")
        );
        let parsed = parse_insights(&text);
        assert_eq!(parsed.len(), MAX_INSIGHTS);
        assert!(parsed.iter().all(|i| i.confidence <= 1.0));
    }

    #[test]
    fn test_insights_non_numeric_confidence_dropped() {
        let text = "[{\"type\":\"trend\",\"text\":\"ok\",\"confidence\":\"high\"}]";
        assert!(parse_insights(text).is_empty());
    }
}
