use crate::{domain::shared::errors::DomainError, infrastructure::ml::traits::AbuseClassifier};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, sync::Arc};
use tracing::{debug, info, warn};
use ts_rs::TS;

/// Ban length for a bare call; complaint submission passes its own.
pub const DEFAULT_BAN_HOURS: i64 = 3;

/// One year; longer bans are rejected rather than clamped.
pub const MAX_BAN_HOURS: i64 = 8760;

pub const ENGLISH_PROFANITY: &[&str] = &[
    "fuck", "shit", "ass", "bitch", "damn", "hell", "crap", "bastard", "dick", "pussy", "cock",
    "cunt", "whore", "slut", "fag", "nigger", "retard", "idiot", "stupid", "dumb", "moron",
    "asshole", "bullshit", "motherfucker",
];

pub const HINDI_PROFANITY: &[&str] = &[
    "chutiya", "chutia", "madarchod", "madar chod", "bhosdike", "bhenchod", "behen chod", "gandu",
    "gaandu", "lauda", "lund", "chut", "gaand", "bhosda", "randi", "kutta", "kuttiya", "saala",
    "sala", "harami", "kamina", "ullu", "bewakoof",
];

pub const ABUSIVE_PHRASES: &[&str] = &[
    "number kat",
    "marks kat",
    "fail kar",
    "tod denge",
    "maar denge",
    "fuck you",
    "fuck off",
    "screw you",
    "go to hell",
    "die",
];

/// Which stage produced the verdict. Informational only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DetectionMethod {
    WordList,
    Pattern,
    Ai,
}

/// What happened at the external-classifier stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackOutcome {
    /// Local matching already found something
    NotAttempted,
    /// No classifier configured
    Unavailable,
    Clean,
    Flagged,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AbuseReport {
    pub is_abusive: bool,
    /// Deduplicated, in the order found
    pub detected_words: Vec<String>,
    pub detected_by: DetectionMethod,
    pub fallback: FallbackOutcome,
}

/// Lowercases and undoes common leetspeak substitutions. Idempotent.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            '0' => 'o',
            '1' | '!' => 'i',
            '3' => 'e',
            '4' | '@' | '*' => 'a',
            '5' | '$' => 's',
            '7' => 't',
            other => other,
        })
        .collect()
}

fn word_list() -> impl Iterator<Item = &'static str> {
    ENGLISH_PROFANITY
        .iter()
        .chain(HINDI_PROFANITY)
        .chain(ABUSIVE_PHRASES)
        .copied()
}

/// Runs the word-list and phrase stages over already-normalized text.
///
/// Word-list matching is containment in either direction, so short tokens
/// such as "as" match "ass" and words like "class" are flagged.
pub fn scan_local(normalized: &str) -> (Vec<String>, DetectionMethod) {
    let mut found = Vec::new();
    let mut method = DetectionMethod::WordList;

    for token in normalized.split_whitespace() {
        let cleaned: String = token.chars().filter(|c| c.is_ascii_lowercase()).collect();
        if cleaned.is_empty() {
            continue;
        }
        if word_list().any(|entry| cleaned.contains(entry) || entry.contains(cleaned.as_str())) {
            found.push(token.to_string());
        }
    }

    for phrase in ABUSIVE_PHRASES {
        if normalized.contains(phrase) {
            found.push((*phrase).to_string());
            method = DetectionMethod::Pattern;
        }
    }

    (found, method)
}

fn dedup_in_order(words: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .into_iter()
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Pure: `now + hours`. Persisting the ban is the caller's job.
pub fn ban_expiration(now: DateTime<Utc>, hours: i64) -> Result<DateTime<Utc>, DomainError> {
    Duration::try_hours(hours)
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| DomainError::ValidationError("Ban duration is out of range".to_string()))
}

/// Three-stage abuse check: word list, phrase pattern, then the external
/// classifier when the local stages found nothing.
#[derive(Clone, Default)]
pub struct AbuseDetector {
    classifier: Option<Arc<dyn AbuseClassifier>>,
}

impl AbuseDetector {
    pub fn new(classifier: Option<Arc<dyn AbuseClassifier>>) -> Self {
        Self { classifier }
    }

    pub async fn detect(&self, text: &str) -> AbuseReport {
        let normalized = normalize(text);
        let (mut found, mut method) = scan_local(&normalized);

        let fallback = if !found.is_empty() {
            FallbackOutcome::NotAttempted
        } else if let Some(classifier) = &self.classifier {
            match classifier.classify(text).await {
                Ok(verdict) if verdict.is_abusive => {
                    found.extend(verdict.detected_words);
                    method = DetectionMethod::Ai;
                    FallbackOutcome::Flagged
                }
                Ok(_) => FallbackOutcome::Clean,
                Err(e) => {
                    warn!(error = %e, "Abuse classifier failed, using word list only");
                    FallbackOutcome::Failed(e.to_string())
                }
            }
        } else {
            FallbackOutcome::Unavailable
        };

        let detected_words = dedup_in_order(found);
        let is_abusive = !detected_words.is_empty();
        if is_abusive {
            info!(method = ?method, words = ?detected_words, "Abusive content detected");
        } else {
            debug!(fallback = ?fallback, "Content passed abuse check");
        }

        AbuseReport {
            is_abusive,
            detected_words,
            detected_by: method,
            fallback,
        }
    }
}
