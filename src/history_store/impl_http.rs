use crate::acquisition::payload::ImagePayload;
use crate::config::Config;
use crate::history_store::interface::{
    format_history_date, HistoryError, HistoryId, HistoryRecord, HistoryStore,
};
use crate::image_classifier::interface::ClassificationResult;
use crate::library::logger::interface::Logger;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct HistoryStoreHttp {
    client: Client,
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl HistoryStoreHttp {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            config,
            logger: logger.with_namespace("history").with_namespace("http"),
        })
    }

    /// `/history/{id}` with the id percent-encoded as one path segment.
    fn record_url(&self, id: &HistoryId) -> Result<Url, HistoryError> {
        let mut url = Url::parse(&self.config.history_url())
            .map_err(|e| HistoryError::Transport(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| HistoryError::Transport("history URL cannot have a path".to_string()))?
            .pop_if_empty()
            .push(&id.0);
        Ok(url)
    }

    fn try_list(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        let response = self
            .client
            .get(self.config.history_url())
            .send()
            .map_err(|e| HistoryError::Transport(e.to_string()))?;

        let body = read_success_body(response)?;
        serde_json::from_str(&body).map_err(|e| HistoryError::MalformedBody(e.to_string()))
    }
}

/// Returns the body of a 2xx response, or the store's `{error}` message.
fn read_success_body(response: Response) -> Result<String, HistoryError> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| HistoryError::Transport(e.to_string()))?;

    if status.is_success() {
        return Ok(body);
    }

    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody { error }) if !error.is_empty() => Err(HistoryError::Remote(error)),
        _ => Err(HistoryError::Status(status.as_u16())),
    }
}

impl HistoryStore for HistoryStoreHttp {
    fn list(&self) -> Vec<HistoryRecord> {
        match self.try_list() {
            Ok(records) => {
                self.logger
                    .info(&format!("Loaded {} history records", records.len()));
                records
            }
            Err(e) => {
                self.logger.warn(&format!("Loading history failed: {}", e));
                vec![]
            }
        }
    }

    fn save(
        &self,
        payload: &ImagePayload,
        result: &ClassificationResult,
    ) -> Result<HistoryRecord, HistoryError> {
        let image = Part::bytes(payload.bytes.as_ref().clone())
            .file_name(payload.file_name())
            .mime_str(&payload.mime_type)
            .map_err(|e| HistoryError::Transport(e.to_string()))?;
        let form = Form::new()
            .part("image", image)
            .text("name", result.label.clone())
            .text("accuracy", result.confidence_percent().to_string())
            .text("date", format_history_date(&result.produced_at));

        self.logger.info(&format!(
            "Saving '{}' ({}%)",
            result.label,
            result.confidence_percent()
        ));

        let response = self
            .client
            .post(self.config.history_url())
            .multipart(form)
            .send()
            .map_err(|e| HistoryError::Transport(e.to_string()))?;

        let body = read_success_body(response)?;
        serde_json::from_str(&body).map_err(|e| HistoryError::MalformedBody(e.to_string()))
    }

    fn delete(&self, id: &HistoryId) -> Result<(), HistoryError> {
        self.logger.info(&format!("Deleting history record {}", id));

        let response = self
            .client
            .delete(self.record_url(id)?)
            .send()
            .map_err(|e| HistoryError::Transport(e.to_string()))?;

        read_success_body(response).map(|_| ())
    }
}
