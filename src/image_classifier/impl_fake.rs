use crate::acquisition::payload::ImagePayload;
use crate::image_classifier::category::{CATEGORY_NAMES, NOT_RECOGNIZED_CLASS};
use crate::image_classifier::interface::{ClassifierError, ImageClassifier, Prediction};
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::sync::{Arc, Mutex};

/// Offline classifier. Answers with a scripted prediction when one is queued,
/// otherwise with a random category or the out-of-domain sentinel.
pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    scripted: Mutex<Vec<Result<Prediction, ClassifierError>>>,
}

impl ImageClassifierFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("classifier").with_namespace("fake"),
            scripted: Mutex::new(Vec::new()),
        }
    }

    #[cfg(test)]
    pub fn push_outcome(&self, outcome: Result<Prediction, ClassifierError>) {
        if let Ok(mut scripted) = self.scripted.lock() {
            scripted.insert(0, outcome);
        }
    }

    fn random_prediction(&self) -> Result<Prediction, ClassifierError> {
        let mut rng = rand::rng();

        let class_dist = Uniform::new(NOT_RECOGNIZED_CLASS, CATEGORY_NAMES.len() as i64)
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;
        let score_dist =
            Uniform::new(0.0, 1.0).map_err(|e| ClassifierError::Transport(e.to_string()))?;

        let class = class_dist.sample(&mut rng);
        Ok(Prediction {
            class,
            score: score_dist.sample(&mut rng),
            message: (class == NOT_RECOGNIZED_CLASS).then(|| "Bukan cabai".to_string()),
        })
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(&self, payload: &ImagePayload) -> Result<Prediction, ClassifierError> {
        self.logger.info(&format!("Classifying {:?}", payload));

        let scripted = self.scripted.lock().ok().and_then(|mut queue| queue.pop());

        match scripted {
            Some(outcome) => outcome,
            None => self.random_prediction(),
        }
    }
}
