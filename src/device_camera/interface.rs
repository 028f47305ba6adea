use image::DynamicImage;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeviceCameraError {
    #[error("camera access was denied")]
    AccessDenied,
    #[error("no camera is available")]
    Unavailable,
    #[error("camera stream failed: {0}")]
    Stream(String),
}

/// A camera-class input device. Each successful `open` hands out an
/// exclusively owned stream.
pub trait DeviceCamera {
    fn open(&self) -> Result<Box<dyn CameraStream + Send>, DeviceCameraError>;
}

pub trait CameraStream {
    fn grab_frame(&mut self) -> Result<DynamicImage, DeviceCameraError>;
    /// Stops the device stream. Must tolerate repeated calls.
    fn release(&mut self);
}
