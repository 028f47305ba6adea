use crate::classify_flow::core::{CameraState, HistoryList, State, Workflow};
use crate::device_camera::interface::DeviceCameraError;
use crate::device_display::interface::DeviceDisplay;
use crate::history_store::interface::HistoryId;
use chrono::{DateTime, Datelike, Local, NaiveDateTime, Timelike};
use std::error::Error;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub label: String,
    pub confidence: u8,
    pub produced_at: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub id: HistoryId,
    pub label: String,
    pub accuracy: u8,
    pub date: String,
    pub image_reference: String,
    pub delete_enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub preview: Option<String>,
    pub result: Option<ResultView>,
    pub loading: bool,
    pub can_classify: bool,
    pub camera: Option<String>,
    pub history_loading: bool,
    pub history: Vec<HistoryRow>,
    pub notice: Option<String>,
}

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Long Indonesian form, e.g. `09 Maret 2024 pukul 07.05`. Dates that do not
/// parse are shown as sent; a missing date is `-`.
pub fn display_history_date(date: &str) -> String {
    let date = date.trim();
    if date.is_empty() {
        return "-".to_string();
    }

    let parsed = DateTime::parse_from_rfc3339(date)
        .map(|at| at.with_timezone(&Local).naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S"));

    match parsed {
        Ok(at) => format!(
            "{:02} {} {} pukul {:02}.{:02}",
            at.day(),
            MONTH_NAMES[at.month0() as usize],
            at.year(),
            at.hour(),
            at.minute()
        ),
        Err(_) => date.to_string(),
    }
}

pub fn view(state: &State) -> View {
    let preview = state.workflow.payload().map(|payload| {
        format!(
            "{} {}x{} ({} bytes)",
            payload.mime_type,
            payload.width,
            payload.height,
            payload.bytes.len()
        )
    });

    let result = state.workflow.result().map(|result| ResultView {
        label: result.label.clone(),
        confidence: result.confidence_percent(),
        produced_at: result.produced_at.format("%d/%m/%Y %H:%M").to_string(),
        is_error: result.is_error(),
    });

    let loading = matches!(state.workflow, Workflow::Classifying { .. });

    let camera = match &state.camera {
        CameraState::Closed => None,
        CameraState::Opening => Some("Opening camera...".to_string()),
        CameraState::Live => Some("Camera live, ready to capture".to_string()),
        CameraState::Capturing => Some("Capturing...".to_string()),
        CameraState::Error(DeviceCameraError::AccessDenied) => {
            Some("Camera access denied".to_string())
        }
        CameraState::Error(DeviceCameraError::Unavailable) => {
            Some("Camera not available".to_string())
        }
        CameraState::Error(DeviceCameraError::Stream(reason)) => {
            Some(format!("Camera error: {}", reason))
        }
    };

    let (history_loading, history) = match &state.history.list {
        HistoryList::Loading => (true, vec![]),
        HistoryList::Loaded(records) => (
            false,
            records
                .iter()
                .map(|record| HistoryRow {
                    id: record.id.clone(),
                    label: record.label.clone(),
                    accuracy: record.accuracy,
                    date: display_history_date(&record.date),
                    image_reference: record.image_reference.clone(),
                    delete_enabled: !state.history.deleting.contains(&record.id),
                })
                .collect(),
        ),
    };

    View {
        preview,
        result,
        loading,
        can_classify: state.workflow.payload().is_some() && !loading,
        camera,
        history_loading,
        history,
        notice: state.notice.as_ref().map(|notice| notice.message()),
    }
}

impl View {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec!["Cabai classifier".to_string()];

        match &self.preview {
            Some(preview) => lines.push(format!("Image: {}", preview)),
            None => lines.push("Image: none selected".to_string()),
        }
        if let Some(camera) = &self.camera {
            lines.push(camera.clone());
        }
        if self.loading {
            lines.push("Analyzing...".to_string());
        }
        if let Some(result) = &self.result {
            lines.push(format!("Result: {} ({}%)", result.label, result.confidence));
            lines.push(format!("        {}", result.produced_at));
            if result.is_error {
                lines.push("        classification failed, try again".to_string());
            }
        }
        if self.can_classify && self.result.is_none() {
            lines.push("Ready: type 'classify' to analyze".to_string());
        }

        lines.push("History:".to_string());
        if self.history_loading {
            lines.push("  loading...".to_string());
        } else if self.history.is_empty() {
            lines.push("  no history yet".to_string());
        }
        for row in &self.history {
            let status = if row.delete_enabled { "" } else { " (deleting)" };
            lines.push(format!(
                "  [{}] {} {}% {}{}",
                row.id, row.label, row.accuracy, row.date, status
            ));
            lines.push(format!("      {}", row.image_reference));
        }

        if let Some(notice) = &self.notice {
            lines.push(format!("! {}", notice));
        }

        lines
    }
}

#[derive(Clone)]
pub struct Render {
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
}

impl Render {
    pub fn new(device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>) -> Self {
        Self { device_display }
    }

    pub fn render(&self, state: &State) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut device_display = self
            .device_display
            .lock()
            .map_err(|e| e.to_string())?;

        device_display.clear()?;
        device_display.write_lines(&view(state).lines())?;

        Ok(())
    }
}
