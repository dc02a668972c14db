use crate::domain::complaint::entity::Severity;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Where an [`Analysis`] came from. A model failure never surfaces as an
/// error; it shows up here instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisSource {
    Model,
    Heuristic { reason: String },
}

#[derive(Debug, Clone)]
pub struct Analysis {
    /// At most 100 characters
    pub summary: String,
    pub severity: Severity,
    /// At most five, most relevant first
    pub keywords: Vec<String>,
    pub source: AnalysisSource,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintAnalyzer: Send + Sync {
    /// Always yields a result; implementations degrade to the local
    /// heuristic rather than fail.
    async fn analyze(&self, text: &str) -> Analysis;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbuseVerdict {
    #[serde(rename = "isAbusive", alias = "is_abusive", default)]
    pub is_abusive: bool,
    #[serde(rename = "detectedWords", alias = "detected_words", default)]
    pub detected_words: Vec<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AbuseClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> anyhow::Result<AbuseVerdict>;
}
