use crate::acquisition::capture_session::CaptureSession;
use crate::acquisition::payload::select_from_file;
use crate::classify_flow::core::{Effect, Event};
use crate::device_camera::interface::DeviceCamera;
use crate::history_store::interface::HistoryStore;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use chrono::Local;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone)]
pub struct RunEffect {
    logger: Arc<dyn Logger + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    history_store: Arc<dyn HistoryStore + Send + Sync>,
    capture_slot: Arc<Mutex<Option<(u64, CaptureSession)>>>,
}

impl RunEffect {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        history_store: Arc<dyn HistoryStore + Send + Sync>,
    ) -> Self {
        Self {
            logger: logger.with_namespace("effect"),
            device_camera,
            image_classifier,
            history_store,
            capture_slot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn run_effect(&self, effect: Effect, event_sender: Sender<Event>) {
        self.logger.info(&format!("Running effect: {:?}", effect));

        let event = match effect {
            Effect::ReadFile { path } => Some(Event::FileReadDone(select_from_file(&path))),
            Effect::OpenCamera { session } => {
                let mut slot = self.capture_slot();
                if matches!(slot.as_ref(), Some((current, _)) if *current > session) {
                    self.logger
                        .warn(&format!("Camera session {} superseded before opening", session));
                    None
                } else {
                    if let Some((_, mut previous)) = slot.take() {
                        previous.cancel();
                    }
                    let capture = CaptureSession::open(self.device_camera.as_ref());
                    let outcome = match capture.error() {
                        Some(error) => Err(error.clone()),
                        None => Ok(()),
                    };
                    *slot = Some((session, capture));
                    Some(Event::CameraOpenDone { session, outcome })
                }
            }
            Effect::CaptureFrame { session } => {
                let mut slot = self.capture_slot();
                let outcome = match slot.take() {
                    Some((current, mut capture)) if current == session => capture.capture(),
                    other => {
                        *slot = other;
                        Ok(None)
                    }
                };
                Some(Event::CaptureDone { session, outcome })
            }
            Effect::CancelCapture { session } => {
                self.release_session(session);
                None
            }
            Effect::Classify { request, payload } => {
                let outcome = self.image_classifier.classify(&payload);
                if let Err(e) = &outcome {
                    self.logger.error(&format!("Classification failed: {}", e));
                }
                Some(Event::ClassifyDone {
                    request,
                    outcome,
                    at: Local::now(),
                })
            }
            Effect::SaveHistory { payload, result } => {
                let saved = self.history_store.save(&payload, &result);
                if let Err(e) = &saved {
                    self.logger.error(&format!("Saving history failed: {}", e));
                }
                Some(Event::SaveHistoryDone(saved))
            }
            Effect::LoadHistory => Some(Event::HistoryLoaded(self.history_store.list())),
            Effect::DeleteHistory { id } => {
                let outcome = self.history_store.delete(&id);
                if let Err(e) = &outcome {
                    self.logger
                        .error(&format!("Deleting history record {} failed: {}", id, e));
                }
                Some(Event::DeleteDone { id, outcome })
            }
        };

        if let Some(event) = event {
            if event_sender.send(event).is_err() {
                self.logger.warn("Event loop is gone, dropping effect result");
            }
        }
    }

    /// Releases the open camera stream, if any.
    pub fn release_camera(&self) {
        if let Some((_, mut capture)) = self.capture_slot().take() {
            capture.cancel();
        }
    }

    /// Releases the held session unless it is newer than `session`.
    fn release_session(&self, session: u64) {
        let mut slot = self.capture_slot();
        if matches!(slot.as_ref(), Some((current, _)) if *current <= session) {
            if let Some((_, mut capture)) = slot.take() {
                capture.cancel();
            }
        }
    }

    fn capture_slot(&self) -> MutexGuard<'_, Option<(u64, CaptureSession)>> {
        self.capture_slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
