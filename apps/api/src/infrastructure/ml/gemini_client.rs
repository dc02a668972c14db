use super::{
    heuristic_analyzer::{
        MAX_KEYWORDS, MAX_SUMMARY_CHARS, determine_severity, extract_keywords, heuristic_analysis,
        summarize, truncate_chars,
    },
    traits::{AbuseClassifier, AbuseVerdict, Analysis, AnalysisSource, ComplaintAnalyzer},
};
use crate::domain::complaint::entity::Severity;
use anyhow::Context;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

lazy_static! {
    static ref JSON_BLOCK: Regex = Regex::new(r"\{[\s\S]*\}").unwrap();
    static ref SUMMARY_LINE: Regex = Regex::new(r"(?i)summary[:\s]+([^\n]+)").unwrap();
    static ref SEVERITY_LINE: Regex =
        Regex::new(r"(?i)severity[:\s]+(good|average|poor|bad|worst|critical)").unwrap();
    static ref KEYWORDS_LINE: Regex = Regex::new(r"(?i)keywords[:\s]+\[([^\]]+)\]").unwrap();
}

/// Gemini `generateContent` client backing both the complaint analysis and
/// the abuse-classification fallback.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ModelAnalysis {
    summary: Option<String>,
    severity: Option<String>,
    keywords: Option<Vec<String>>,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> anyhow::Result<Self> {
        Self::with_base_url(api_key, model, timeout, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(
        api_key: String,
        model: String,
        timeout: Duration,
        base_url: String,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Gemini HTTP client")?;
        Ok(Self {
            http,
            api_key,
            model,
            base_url,
        })
    }

    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&json!({ "contents": [{ "parts": [{ "text": prompt }] }] }))
            .send()
            .await
            .context("Gemini request failed")?
            .error_for_status()
            .context("Gemini returned an error status")?
            .json::<GenerateResponse>()
            .await
            .context("Gemini response was not valid JSON")?;

        response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .find(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Gemini response had no text"))
    }
}

fn analysis_prompt(text: &str) -> String {
    format!(
        r#"Analyze this student complaint and provide:
1. A brief summary (max 100 characters)
2. Severity rating: good, average, poor, bad, worst, or critical
3. Up to 5 keywords for clustering

Complaint: "{text}"

Respond in this exact JSON format:
{{
  "summary": "Brief summary here",
  "severity": "average",
  "keywords": ["keyword1", "keyword2"]
}}"#
    )
}

fn abuse_prompt(text: &str) -> String {
    format!(
        r#"You moderate a campus complaint board. Decide whether the text below contains
abusive, hateful, threatening or profane language in any language, including
Hinglish and obfuscated spellings.

Text: "{text}"

Respond in this exact JSON format:
{{
  "isAbusive": false,
  "detectedWords": []
}}"#
    )
}

fn clean_keywords(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .take(MAX_KEYWORDS)
        .collect()
}

/// Reads the model reply, preferring the embedded JSON object and falling
/// back to line-oriented extraction. Fields the reply does not provide come
/// from the local heuristic.
pub fn parse_analysis(reply: &str, complaint: &str) -> Analysis {
    if let Some(block) = JSON_BLOCK.find(reply) {
        match serde_json::from_str::<ModelAnalysis>(block.as_str()) {
            Ok(parsed) => {
                return Analysis {
                    summary: parsed
                        .summary
                        .filter(|s| !s.trim().is_empty())
                        .map(|s| truncate_chars(s.trim(), MAX_SUMMARY_CHARS))
                        .unwrap_or_else(|| summarize(complaint)),
                    severity: parsed
                        .severity
                        .and_then(|s| s.parse::<Severity>().ok())
                        .unwrap_or_default(),
                    keywords: parsed
                        .keywords
                        .map(clean_keywords)
                        .filter(|k| !k.is_empty())
                        .unwrap_or_else(|| extract_keywords(complaint)),
                    source: AnalysisSource::Model,
                };
            }
            Err(e) => debug!(error = %e, "Model reply held malformed JSON"),
        }
    }

    let summary = SUMMARY_LINE
        .captures(reply)
        .map(|c| truncate_chars(c[1].trim(), MAX_SUMMARY_CHARS))
        .unwrap_or_else(|| summarize(complaint));
    let severity = SEVERITY_LINE
        .captures(reply)
        .and_then(|c| c[1].parse::<Severity>().ok())
        .unwrap_or_else(|| determine_severity(complaint));
    let keywords = KEYWORDS_LINE
        .captures(reply)
        .map(|c| {
            clean_keywords(
                c[1].split(',')
                    .map(|k| k.replace(['\'', '"'], ""))
                    .collect(),
            )
        })
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| extract_keywords(complaint));

    Analysis {
        summary,
        severity,
        keywords,
        source: AnalysisSource::Model,
    }
}

pub fn parse_verdict(reply: &str) -> anyhow::Result<AbuseVerdict> {
    let block = JSON_BLOCK
        .find(reply)
        .ok_or_else(|| anyhow::anyhow!("No JSON object in classifier reply"))?;
    serde_json::from_str(block.as_str()).context("Malformed classifier verdict")
}

#[async_trait]
impl ComplaintAnalyzer for GeminiClient {
    #[instrument(skip(self, text), fields(model = %self.model, chars = text.len()))]
    async fn analyze(&self, text: &str) -> Analysis {
        match self.generate(&analysis_prompt(text)).await {
            Ok(reply) => parse_analysis(&reply, text),
            Err(e) => {
                warn!(error = %e, "Model analysis failed, using heuristic");
                heuristic_analysis(text, e.to_string())
            }
        }
    }
}

#[async_trait]
impl AbuseClassifier for GeminiClient {
    #[instrument(skip(self, text), fields(model = %self.model))]
    async fn classify(&self, text: &str) -> anyhow::Result<AbuseVerdict> {
        let reply = self.generate(&abuse_prompt(text)).await?;
        parse_verdict(&reply)
    }
}
