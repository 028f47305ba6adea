use crate::acquisition::payload::ImagePayload;
use chrono::{DateTime, Local};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier request failed: {0}")]
    Transport(String),
    #[error("classifier responded with status {0}")]
    Status(u16),
    #[error("classifier response was malformed: {0}")]
    MalformedBody(String),
}

/// Raw classifier answer: a category index (or the out-of-domain sentinel),
/// a score in [0,1] and an optional message for the sentinel case.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    pub class: i64,
    pub score: f64,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub label: String,
    score: f64,
    pub produced_at: DateTime<Local>,
}

pub const ERROR_LABEL: &str = "Error";

impl ClassificationResult {
    pub fn new(label: String, score: f64, produced_at: DateTime<Local>) -> Self {
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };

        Self {
            label,
            score,
            produced_at,
        }
    }

    pub fn error(produced_at: DateTime<Local>) -> Self {
        Self::new(ERROR_LABEL.to_string(), 0.0, produced_at)
    }

    #[cfg(test)]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Whole-percent confidence, rounded half away from zero.
    pub fn confidence_percent(&self) -> u8 {
        (self.score * 100.0).round() as u8
    }

    pub fn is_error(&self) -> bool {
        self.label == ERROR_LABEL && self.score == 0.0
    }
}

pub trait ImageClassifier {
    fn classify(&self, payload: &ImagePayload) -> Result<Prediction, ClassifierError>;
}
