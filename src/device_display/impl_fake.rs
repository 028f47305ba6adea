use crate::device_display::interface::DeviceDisplay;
use std::error::Error;

/// Keeps every frame written, for assertions.
#[derive(Default)]
pub struct DeviceDisplayFake {
    pub frames: Vec<Vec<String>>,
    width: usize,
}

impl DeviceDisplayFake {
    pub fn new(width: usize) -> Self {
        Self {
            frames: Vec::new(),
            width,
        }
    }

    pub fn last_frame(&self) -> Option<&Vec<String>> {
        self.frames.last()
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.frames.push(Vec::new());
        Ok(())
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<(), Box<dyn Error + Send + Sync>> {
        let frame = lines
            .iter()
            .map(|line| line.chars().take(self.width).collect())
            .collect();
        match self.frames.last_mut() {
            Some(last) if last.is_empty() => *last = frame,
            _ => self.frames.push(frame),
        }
        Ok(())
    }
}
