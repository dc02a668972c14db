use super::traits::{Analysis, AnalysisSource, ComplaintAnalyzer};
use crate::domain::complaint::entity::Severity;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};

pub const MAX_SUMMARY_CHARS: usize = 100;
pub const MAX_KEYWORDS: usize = 5;

lazy_static! {
    static ref SENTENCE_SPLIT: Regex = Regex::new(r"[.!?]+").unwrap();
    static ref STOP_WORDS: HashSet<&'static str> = [
        "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has",
        "had", "do", "does", "did", "will", "would", "could", "should", "may", "might", "must",
        "shall", "can", "need", "dare", "ought", "used", "to", "of", "in", "for", "on", "with",
        "at", "by", "from", "as", "into", "through", "during", "before", "after", "above",
        "below", "between", "under", "again", "further", "then", "once", "here", "there",
        "when", "where", "why", "how", "all", "each", "few", "more", "most", "other", "some",
        "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very", "just",
        "and", "but", "if", "or", "because", "until", "while", "this", "that", "these",
        "those", "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your",
        "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers",
        "herself", "it", "its", "itself", "they", "them", "their", "theirs", "themselves",
        "what", "which", "who", "whom",
    ]
    .into_iter()
    .collect();
}

const CRITICAL_WORDS: &[&str] = &[
    "emergency",
    "danger",
    "life-threatening",
    "urgent",
    "critical",
    "immediately",
];
const WORST_WORDS: &[&str] = &["broken", "failure", "unusable", "blocked", "shutdown"];
const BAD_WORDS: &[&str] = &["problem", "issue", "not working", "failed", "error"];
const POOR_WORDS: &[&str] = &["slow", "delay", "inconvenient", "frustrating"];

/// Up to five words longer than three letters, most frequent first. Ties
/// keep first-occurrence order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();

    let mut order: Vec<&str> = Vec::new();
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for word in cleaned.split_whitespace() {
        if word.len() <= 3 || STOP_WORDS.contains(word) {
            continue;
        }
        let count = freq.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    // stable sort keeps insertion order among equal counts
    order.sort_by(|a, b| freq[b].cmp(&freq[a]));
    order
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

/// First two sentences, cut to [`MAX_SUMMARY_CHARS`].
pub fn summarize(text: &str) -> String {
    let sentences: Vec<&str> = SENTENCE_SPLIT
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .collect();

    if sentences.len() <= 2 {
        return truncate_chars(text.trim(), MAX_SUMMARY_CHARS);
    }

    let joined = sentences[..2]
        .iter()
        .map(|s| s.trim())
        .collect::<Vec<_>>()
        .join(". ");
    let mut summary = truncate_chars(&joined, MAX_SUMMARY_CHARS - 3);
    summary.push_str("...");
    summary
}

pub fn determine_severity(text: &str) -> Severity {
    let lower = text.to_lowercase();
    let hit = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if hit(CRITICAL_WORDS) {
        Severity::Critical
    } else if hit(WORST_WORDS) {
        Severity::Worst
    } else if hit(BAD_WORDS) {
        Severity::Bad
    } else if hit(POOR_WORDS) {
        Severity::Poor
    } else {
        Severity::Average
    }
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Full local analysis, tagged with why the model was not used.
pub fn heuristic_analysis(text: &str, reason: impl Into<String>) -> Analysis {
    Analysis {
        summary: summarize(text),
        severity: determine_severity(text),
        keywords: extract_keywords(text),
        source: AnalysisSource::Heuristic {
            reason: reason.into(),
        },
    }
}

/// Analyzer used when no model is configured.
#[derive(Debug, Clone, Default)]
pub struct HeuristicAnalyzer;

#[async_trait]
impl ComplaintAnalyzer for HeuristicAnalyzer {
    async fn analyze(&self, text: &str) -> Analysis {
        heuristic_analysis(text, "no model configured")
    }
}
