use crate::acquisition::payload::ImagePayload;
use crate::history_store::interface::{
    format_history_date, HistoryError, HistoryId, HistoryRecord, HistoryStore,
};
use crate::image_classifier::interface::ClassificationResult;
use crate::library::logger::interface::Logger;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory history store for offline runs and tests.
pub struct HistoryStoreFake {
    logger: Arc<dyn Logger + Send + Sync>,
    records: Mutex<Vec<HistoryRecord>>,
    next_id: AtomicUsize,
    fail_saves: AtomicBool,
    save_calls: AtomicUsize,
}

impl HistoryStoreFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("history").with_namespace("fake"),
            records: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            fail_saves: AtomicBool::new(false),
            save_calls: AtomicUsize::new(0),
        }
    }

    #[cfg(test)]
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<HistoryRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl HistoryStore for HistoryStoreFake {
    fn list(&self) -> Vec<HistoryRecord> {
        self.records()
    }

    fn save(
        &self,
        payload: &ImagePayload,
        result: &ClassificationResult,
    ) -> Result<HistoryRecord, HistoryError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_saves.load(Ordering::SeqCst) {
            self.logger.warn("Rejecting save");
            return Err(HistoryError::Remote("history store unavailable".to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = HistoryRecord {
            id: HistoryId(id.to_string()),
            image_reference: format!("/uploads/{}-{}", id, payload.file_name()),
            label: result.label.clone(),
            accuracy: result.confidence_percent(),
            date: format_history_date(&result.produced_at),
        };

        let mut records = self
            .records
            .lock()
            .map_err(|e| HistoryError::Transport(e.to_string()))?;
        records.push(record.clone());

        self.logger.info(&format!("Saved record {}", record.id));
        Ok(record)
    }

    fn delete(&self, id: &HistoryId) -> Result<(), HistoryError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| HistoryError::Transport(e.to_string()))?;

        let before = records.len();
        records.retain(|record| &record.id != id);

        if records.len() == before {
            return Err(HistoryError::Remote("not found".to_string()));
        }

        self.logger.info(&format!("Deleted record {}", id));
        Ok(())
    }
}
