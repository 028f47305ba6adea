use crate::acquisition::payload::ImagePayload;
use crate::config::Config;
use crate::image_classifier::interface::{ClassifierError, ImageClassifier, Prediction};
use crate::library::logger::interface::Logger;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use std::sync::Arc;

pub struct ImageClassifierHttp {
    client: Client,
    predict_url: String,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierHttp {
    pub fn new(
        config: &Config,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            predict_url: config.predict_url(),
            logger: logger.with_namespace("classifier").with_namespace("http"),
        })
    }
}

pub fn parse_prediction(body: &str) -> Result<Prediction, ClassifierError> {
    serde_json::from_str(body).map_err(|e| ClassifierError::MalformedBody(e.to_string()))
}

impl ImageClassifier for ImageClassifierHttp {
    fn classify(&self, payload: &ImagePayload) -> Result<Prediction, ClassifierError> {
        let part = Part::bytes(payload.bytes.as_ref().clone())
            .file_name(payload.file_name())
            .mime_str(&payload.mime_type)
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;
        let form = Form::new().part("file", part);

        self.logger
            .info(&format!("POST {} ({:?})", self.predict_url, payload));

        let response = self
            .client
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;

        parse_prediction(&body)
    }
}
