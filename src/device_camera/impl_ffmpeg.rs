use crate::config::Config;
use crate::device_camera::interface::{CameraStream, DeviceCamera, DeviceCameraError};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, ImageFormat};
use std::fs::File;
use std::io::ErrorKind;
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Camera read through an `ffmpeg` binary (v4l2 on Linux by default).
///
/// Opening holds the device node, so a missing or forbidden device is
/// reported before any frame is requested.
pub struct DeviceCameraFfmpeg {
    logger: Arc<dyn Logger + Send + Sync>,
    device: String,
    input_format: String,
    ffmpeg_path: String,
    width: u32,
    height: u32,
}

impl DeviceCameraFfmpeg {
    pub fn new(config: &Config, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("ffmpeg"),
            device: config.camera_device.clone(),
            input_format: config.camera_input_format.clone(),
            ffmpeg_path: config.ffmpeg_path.clone(),
            width: config.capture_frame_width,
            height: config.capture_frame_height,
        }
    }
}

impl DeviceCamera for DeviceCameraFfmpeg {
    fn open(&self) -> Result<Box<dyn CameraStream + Send>, DeviceCameraError> {
        self.logger.info(&format!("Opening camera {}", self.device));

        let handle = File::open(&self.device).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DeviceCameraError::Unavailable,
            ErrorKind::PermissionDenied => DeviceCameraError::AccessDenied,
            _ => DeviceCameraError::Stream(e.to_string()),
        })?;

        Ok(Box::new(CameraStreamFfmpeg {
            logger: self.logger.clone(),
            handle: Some(handle),
            device: self.device.clone(),
            input_format: self.input_format.clone(),
            ffmpeg_path: self.ffmpeg_path.clone(),
            width: self.width,
            height: self.height,
        }))
    }
}

struct CameraStreamFfmpeg {
    logger: Arc<dyn Logger + Send + Sync>,
    handle: Option<File>,
    device: String,
    input_format: String,
    ffmpeg_path: String,
    width: u32,
    height: u32,
}

impl CameraStream for CameraStreamFfmpeg {
    fn grab_frame(&mut self) -> Result<DynamicImage, DeviceCameraError> {
        if self.handle.is_none() {
            return Err(DeviceCameraError::Stream("stream already released".to_string()));
        }

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-f")
            .arg(&self.input_format)
            .arg("-video_size")
            .arg(format!("{}x{}", self.width, self.height))
            .arg("-i")
            .arg(&self.device)
            .arg("-frames:v")
            .arg("1")
            .arg("-f")
            .arg("image2pipe")
            .arg("-vcodec")
            .arg("png")
            .arg("-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                DeviceCameraError::Stream(format!("ffmpeg not found at '{}'", self.ffmpeg_path))
            }
            _ => DeviceCameraError::Stream(format!("failed to run ffmpeg: {}", e)),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            self.logger.error(&format!("ffmpeg capture failed: {}", stderr.trim()));
            return Err(DeviceCameraError::Stream(stderr.trim().to_string()));
        }

        let frame = image::load_from_memory_with_format(&output.stdout, ImageFormat::Png)
            .map_err(|e| DeviceCameraError::Stream(e.to_string()))?;

        self.logger.info("Frame captured");
        Ok(frame)
    }

    fn release(&mut self) {
        if self.handle.take().is_some() {
            self.logger.info("Camera stream released");
        }
    }
}
