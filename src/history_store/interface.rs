use crate::acquisition::payload::ImagePayload;
use crate::image_classifier::interface::ClassificationResult;
use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer};

pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete history record";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistoryError {
    #[error("history request failed: {0}")]
    Transport(String),
    #[error("history store responded with status {0}")]
    Status(u16),
    #[error("{0}")]
    Remote(String),
    #[error("history response was malformed: {0}")]
    MalformedBody(String),
}

impl HistoryError {
    /// Text shown to the user when a delete fails.
    pub fn delete_notice(&self) -> String {
        match self {
            HistoryError::Remote(message) => message.clone(),
            _ => DELETE_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Opaque record id. The store may send it as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HistoryId(pub String);

impl std::fmt::Display for HistoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for HistoryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Integer(n) => Ok(HistoryId(n.to_string())),
            NumberOrString::Float(n) => Ok(HistoryId(n.to_string())),
            NumberOrString::Text(s) => Ok(HistoryId(s)),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn deserialize_accuracy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Integer(n) => n as f64,
        NumberOrString::Float(n) => n,
        NumberOrString::Text(s) => s
            .trim()
            .trim_end_matches('%')
            .parse::<f64>()
            .map_err(serde::de::Error::custom)?,
    };
    Ok(value.round().clamp(0.0, 100.0) as u8)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryRecord {
    pub id: HistoryId,
    #[serde(rename = "image")]
    pub image_reference: String,
    #[serde(rename = "name")]
    pub label: String,
    #[serde(deserialize_with = "deserialize_accuracy")]
    pub accuracy: u8,
    #[serde(default)]
    pub date: String,
}

/// `YYYY-MM-DD HH:MM:00` in local time, seconds always zeroed.
pub fn format_history_date(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:00").to_string()
}

pub trait HistoryStore {
    /// Failures degrade to an empty list.
    fn list(&self) -> Vec<HistoryRecord>;
    fn save(
        &self,
        payload: &ImagePayload,
        result: &ClassificationResult,
    ) -> Result<HistoryRecord, HistoryError>;
    fn delete(&self, id: &HistoryId) -> Result<(), HistoryError>;
}
