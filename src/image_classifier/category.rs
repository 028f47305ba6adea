use crate::image_classifier::interface::{ClassificationResult, ClassifierError, Prediction};
use chrono::{DateTime, Local};

/// Index the classifier returns when the image is not a chili at all.
pub const NOT_RECOGNIZED_CLASS: i64 = -1;

pub const NOT_RECOGNIZED_LABEL: &str = "Bukan cabai";

pub const CATEGORY_NAMES: [&str; 7] = [
    "Cabai Besar Merah",
    "Cabai Besar Hijau",
    "Cabai Keriting Merah",
    "Cabai Keriting Hijau",
    "Cabai Rawit Hijau",
    "Cabai Rawit Merah",
    "Cabai Gendot",
];

pub fn category_label(prediction: &Prediction) -> String {
    if prediction.class == NOT_RECOGNIZED_CLASS {
        return match prediction.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => NOT_RECOGNIZED_LABEL.to_string(),
        };
    }

    usize::try_from(prediction.class)
        .ok()
        .and_then(|index| CATEGORY_NAMES.get(index))
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Category {}", prediction.class))
}

/// Collapses every classifier failure into the `"Error"` result.
pub fn to_classification_result(
    outcome: &Result<Prediction, ClassifierError>,
    produced_at: DateTime<Local>,
) -> ClassificationResult {
    match outcome {
        Ok(prediction) => {
            ClassificationResult::new(category_label(prediction), prediction.score, produced_at)
        }
        Err(_) => ClassificationResult::error(produced_at),
    }
}
