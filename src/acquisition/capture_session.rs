use crate::acquisition::payload::ImagePayload;
use crate::device_camera::interface::{CameraStream, DeviceCamera, DeviceCameraError};

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("camera frame could not be read: {0}")]
    Frame(#[from] DeviceCameraError),
    #[error("camera frame could not be encoded: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureStatus {
    Opening,
    Live,
    Error(DeviceCameraError),
    Captured,
    Cancelled,
}

impl CaptureStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CaptureStatus::Captured | CaptureStatus::Cancelled)
    }
}

/// One open camera stream, from `open` to release.
///
/// Only constructed through [`CaptureSession::open`]. Every exit path
/// (capture, cancel, drop) goes through `teardown`, so a terminal session
/// never holds the device.
pub struct CaptureSession {
    status: CaptureStatus,
    stream: Option<Box<dyn CameraStream + Send>>,
}

impl std::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("status", &self.status)
            .field("holds_stream", &self.stream.is_some())
            .finish()
    }
}

impl CaptureSession {
    pub fn open(device: &dyn DeviceCamera) -> Self {
        let mut session = Self {
            status: CaptureStatus::Opening,
            stream: None,
        };

        match device.open() {
            Ok(stream) => {
                session.stream = Some(stream);
                session.status = CaptureStatus::Live;
            }
            Err(error) => {
                session.status = CaptureStatus::Error(error);
            }
        }

        session
    }

    #[cfg(test)]
    pub fn status(&self) -> &CaptureStatus {
        &self.status
    }

    pub fn error(&self) -> Option<&DeviceCameraError> {
        match &self.status {
            CaptureStatus::Error(error) => Some(error),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn holds_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// Grabs the current frame as PNG. The stream is released whatever the
    /// outcome. Returns `Ok(None)` when the session is not live.
    pub fn capture(&mut self) -> Result<Option<ImagePayload>, CaptureError> {
        if self.status != CaptureStatus::Live {
            return Ok(None);
        }

        let grabbed = match self.stream.as_mut() {
            Some(stream) => stream.grab_frame(),
            None => Err(DeviceCameraError::Stream("stream missing".to_string())),
        };

        self.teardown(CaptureStatus::Captured);

        let frame = grabbed?;
        let payload = ImagePayload::encode_png(&frame)?;
        Ok(Some(payload))
    }

    pub fn cancel(&mut self) {
        if !self.status.is_terminal() {
            self.teardown(CaptureStatus::Cancelled);
        }
    }

    fn teardown(&mut self, status: CaptureStatus) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
        }
        self.status = status;
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.cancel();
    }
}
