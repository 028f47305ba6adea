use crate::device_camera::interface::{CameraStream, DeviceCamera, DeviceCameraError};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, Rgb, RgbImage};
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FakeCameraBehavior {
    Available,
    AccessDenied,
    Unavailable,
    BrokenFrames,
}

pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    behavior: Mutex<FakeCameraBehavior>,
    width: u32,
    height: u32,
    open_streams: Arc<AtomicUsize>,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, width: u32, height: u32) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            behavior: Mutex::new(FakeCameraBehavior::Available),
            width,
            height,
            open_streams: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_behavior(&self, behavior: FakeCameraBehavior) {
        if let Ok(mut current) = self.behavior.lock() {
            *current = behavior;
        }
    }

    /// Streams handed out and not yet released.
    #[cfg(test)]
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    fn behavior(&self) -> FakeCameraBehavior {
        self.behavior
            .lock()
            .map(|behavior| *behavior)
            .unwrap_or(FakeCameraBehavior::Unavailable)
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn open(&self) -> Result<Box<dyn CameraStream + Send>, DeviceCameraError> {
        let behavior = self.behavior();
        self.logger.info(&format!("Opening camera ({:?})", behavior));

        match behavior {
            FakeCameraBehavior::AccessDenied => Err(DeviceCameraError::AccessDenied),
            FakeCameraBehavior::Unavailable => Err(DeviceCameraError::Unavailable),
            FakeCameraBehavior::Available | FakeCameraBehavior::BrokenFrames => {
                self.open_streams.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(CameraStreamFake {
                    logger: self.logger.clone(),
                    width: self.width,
                    height: self.height,
                    broken: behavior == FakeCameraBehavior::BrokenFrames,
                    released: false,
                    open_streams: self.open_streams.clone(),
                }))
            }
        }
    }
}

struct CameraStreamFake {
    logger: Arc<dyn Logger + Send + Sync>,
    width: u32,
    height: u32,
    broken: bool,
    released: bool,
    open_streams: Arc<AtomicUsize>,
}

impl CameraStream for CameraStreamFake {
    fn grab_frame(&mut self) -> Result<DynamicImage, DeviceCameraError> {
        if self.released {
            return Err(DeviceCameraError::Stream("stream already released".to_string()));
        }
        if self.broken {
            return Err(DeviceCameraError::Stream("no frame available".to_string()));
        }

        let mut rng = rand::rng();
        let base: u8 = rng.random_range(96..=200);
        let frame = RgbImage::from_fn(self.width, self.height, |x, y| {
            let noise: u8 = rng.random_range(0..16);
            Rgb([
                base.saturating_add(noise),
                (x % 256) as u8 / 4,
                (y % 256) as u8 / 4,
            ])
        });

        self.logger.info("Frame captured");
        Ok(DynamicImage::ImageRgb8(frame))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.open_streams.fetch_sub(1, Ordering::SeqCst);
        self.logger.info("Camera stream released");
    }
}
