use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    /// `None` waits for the service however long it takes.
    pub request_timeout: Option<Duration>,
    pub camera_device: String,
    pub camera_input_format: String,
    pub ffmpeg_path: String,
    pub capture_frame_width: u32,
    pub capture_frame_height: u32,
    pub display_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            request_timeout: None,
            camera_device: "/dev/video0".to_string(),
            camera_input_format: "v4l2".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            capture_frame_width: 640,
            capture_frame_height: 480,
            display_width: 48,
        }
    }
}

impl Config {
    pub fn with_api_base_url(mut self, api_base_url: &str) -> Self {
        self.api_base_url = api_base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.api_base_url)
    }

    pub fn history_url(&self) -> String {
        format!("{}/history", self.api_base_url)
    }
}
