use std::error::Error;

/// Text surface the rendered view is written to.
pub trait DeviceDisplay: Send + Sync {
    /// Clear all text from the display
    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Replace the whole display with `lines`, top to bottom
    fn write_lines(&mut self, lines: &[String]) -> Result<(), Box<dyn Error + Send + Sync>>;
}
