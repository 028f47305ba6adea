use crate::library::logger::interface::Logger;
use std::sync::Arc;

const ROOT_NAMESPACE: &str = "cabai";

/// Forwards to the `log` facade, using the namespace path as the target.
#[derive(Debug, Clone)]
pub struct LoggerLog {
    namespace: String,
}

impl LoggerLog {
    pub fn new() -> Self {
        Self {
            namespace: ROOT_NAMESPACE.to_string(),
        }
    }

    #[cfg(test)]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl Default for LoggerLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for LoggerLog {
    fn info(&self, message: &str) {
        log::info!(target: &self.namespace, "{}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!(target: &self.namespace, "{}", message);
    }

    fn error(&self, message: &str) {
        log::error!(target: &self.namespace, "{}", message);
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerLog {
            namespace: format!("{}::{}", self.namespace, namespace),
        })
    }
}
