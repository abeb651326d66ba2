//! SEO response envelope.
//!
//! A pure, stateless transform: wraps a generated payload in schema.org
//! structured data, hreflang alternates, and a rule-based SEO health score.
//! No ledger state is touched here.

use chrono::Utc;
use serde::Serialize;

const CANONICAL_URL: &str = "https://ai-growth-tools.com";
const DEFAULT_LANG: &str = "zh-CN";
const DEFAULT_REGION: &str = "CN";

/// Rule-based health score with improvement suggestions.
#[derive(Debug, Clone, Serialize)]
pub struct SeoAnalysis {
    /// Score out of 100.
    pub seo_score: i64,
    /// Suggestions for improving the metadata.
    pub suggestions: Vec<String>,
}

/// A hreflang alternate link.
#[derive(Debug, Clone, Serialize)]
pub struct HreflangLink {
    /// Language tag.
    pub hreflang: &'static str,
    /// Alternate URL.
    pub href: String,
}

/// The standardized response envelope around generated content.
#[derive(Debug, Clone, Serialize)]
pub struct SeoEnvelope {
    /// Always "ok" for a successful generation.
    pub status: &'static str,
    /// Page title.
    pub title: String,
    /// Meta description, truncated to 180 characters.
    pub description: String,
    /// Comma-joined keyword list.
    pub keywords: String,
    /// Canonical URL.
    pub canonical: &'static str,
    /// Primary language tag.
    pub hreflang: &'static str,
    /// Target region.
    pub region: &'static str,
    /// Envelope creation time (RFC 3339).
    pub created_at: String,
    /// Schema.org structured data.
    pub structured_data: serde_json::Value,
    /// Language alternates.
    pub hreflang_links: Vec<HreflangLink>,
    /// Health score and suggestions.
    pub seo_analysis: SeoAnalysis,
    /// The generated payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Guess the schema.org type from markers in the payload.
#[must_use]
pub fn detect_content_type(data: Option<&serde_json::Value>) -> &'static str {
    let Some(data) = data else {
        return "CreativeWork";
    };
    let content = data.to_string().to_lowercase();

    if ["jpg", "jpeg", "png", "webp", "image"]
        .iter()
        .any(|k| content.contains(k))
    {
        return "ImageObject";
    }
    if ["mp4", "video", "clip", "youtube"]
        .iter()
        .any(|k| content.contains(k))
    {
        return "VideoObject";
    }
    if ["mp3", "audio", "podcast"].iter().any(|k| content.contains(k)) {
        return "AudioObject";
    }
    if ["text", "content", "article", "blog"]
        .iter()
        .any(|k| content.contains(k))
    {
        return "Article";
    }

    "CreativeWork"
}

/// Score the metadata against basic SEO/AEO rules.
#[must_use]
pub fn evaluate_seo_health(title: &str, description: &str, keywords: &[String]) -> SeoAnalysis {
    let mut score: i64 = 100;
    let mut suggestions = Vec::new();

    if title.chars().count() < 10 {
        score -= 10;
        suggestions.push("Title is short; add more descriptive keywords.".to_string());
    }
    if description.chars().count() < 50 {
        score -= 15;
        suggestions
            .push("Description is thin; aim for a ~150 character natural summary.".to_string());
    }
    if keywords.len() < 3 {
        score -= 10;
        suggestions.push("Few keywords; provide at least 3-5.".to_string());
    }
    if !["AI", "Smart", "Growth", "Content"]
        .iter()
        .any(|k| title.contains(k))
    {
        score -= 5;
        suggestions.push("Title is missing a core brand or topic keyword.".to_string());
    }

    if suggestions.is_empty() {
        suggestions.push("Well optimized.".to_string());
    }

    SeoAnalysis {
        seo_score: score.max(0),
        suggestions,
    }
}

/// Build the response envelope around a generated payload.
#[must_use]
pub fn build_seo_response(
    data: Option<serde_json::Value>,
    title: &str,
    keywords: Vec<String>,
    description: &str,
) -> SeoEnvelope {
    let keywords = if keywords.is_empty() {
        vec![
            "AI".to_string(),
            "Growth".to_string(),
            "Content".to_string(),
            "SEO".to_string(),
            "AEO".to_string(),
        ]
    } else {
        keywords
    };
    let description: String = description.chars().take(180).collect();
    let content_type = detect_content_type(data.as_ref());
    let seo_analysis = evaluate_seo_health(title, &description, &keywords);
    let now = Utc::now().to_rfc3339();

    let structured_data = serde_json::json!({
        "@context": "https://schema.org",
        "@type": content_type,
        "headline": title,
        "description": description.clone(),
        "keywords": keywords.clone(),
        "inLanguage": DEFAULT_LANG,
        "contentLocation": DEFAULT_REGION,
        "datePublished": now.clone(),
        "provider": {
            "@type": "Organization",
            "name": "Growth Hub",
            "url": CANONICAL_URL,
        },
    });

    let hreflang_links = ["zh-CN", "en-US", "ja-JP"]
        .into_iter()
        .map(|lang| HreflangLink {
            hreflang: lang,
            href: format!("{CANONICAL_URL}/{lang}"),
        })
        .collect();

    SeoEnvelope {
        status: "ok",
        title: title.to_string(),
        description,
        keywords: keywords.join(", "),
        canonical: CANONICAL_URL,
        hreflang: DEFAULT_LANG,
        region: DEFAULT_REGION,
        created_at: now,
        structured_data,
        hreflang_links,
        seo_analysis,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_image_payloads() {
        let data = json!({"image_url": "https://cdn.example.com/pic.png"});
        assert_eq!(detect_content_type(Some(&data)), "ImageObject");
    }

    #[test]
    fn detects_text_payloads() {
        let data = json!({"generated_text": "an article about growth"});
        assert_eq!(detect_content_type(Some(&data)), "Article");
    }

    #[test]
    fn missing_payload_is_creative_work() {
        assert_eq!(detect_content_type(None), "CreativeWork");
    }

    #[test]
    fn perfect_metadata_scores_100() {
        let keywords: Vec<String> = ["AI", "Growth", "Content"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let analysis = evaluate_seo_health(
            "AI Content Generation for Growth Teams",
            "A long, natural-language description of the generated content that easily \
             clears the fifty character minimum.",
            &keywords,
        );
        assert_eq!(analysis.seo_score, 100);
        assert_eq!(analysis.suggestions, vec!["Well optimized."]);
    }

    #[test]
    fn weak_metadata_loses_points() {
        let analysis = evaluate_seo_health("short", "tiny", &[]);
        // -10 title, -15 description, -10 keywords, -5 core keyword.
        assert_eq!(analysis.seo_score, 60);
        assert_eq!(analysis.suggestions.len(), 4);
    }

    #[test]
    fn score_never_goes_negative() {
        let analysis = evaluate_seo_health("", "", &[]);
        assert!(analysis.seo_score >= 0);
    }

    #[test]
    fn envelope_truncates_description() {
        let long = "x".repeat(500);
        let envelope = build_seo_response(None, "Title", vec![], &long);
        assert_eq!(envelope.description.chars().count(), 180);
    }

    #[test]
    fn envelope_defaults_keywords() {
        let envelope = build_seo_response(None, "Title", vec![], "desc");
        assert!(envelope.keywords.contains("SEO"));
        assert_eq!(envelope.status, "ok");
        assert_eq!(envelope.hreflang_links.len(), 3);
    }
}
