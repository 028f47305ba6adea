use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("cannot read image {path}: {reason}")]
    UnreadableFile { path: String, reason: String },
}

/// Encoded image bytes ready for upload, plus what a preview needs.
#[derive(Clone, PartialEq)]
pub struct ImagePayload {
    pub bytes: Arc<Vec<u8>>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl ImagePayload {
    /// Validates that `bytes` is a decodable image and wraps it unchanged.
    pub fn from_encoded(bytes: Vec<u8>) -> Result<Self, image::ImageError> {
        let format = image::guess_format(&bytes)?;
        let decoded = image::load_from_memory_with_format(&bytes, format)?;

        Ok(Self {
            mime_type: format.to_mime_type().to_string(),
            width: decoded.width(),
            height: decoded.height(),
            bytes: Arc::new(bytes),
        })
    }

    pub fn encode_png(frame: &DynamicImage) -> Result<Self, image::ImageError> {
        let mut bytes = Vec::new();
        frame.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

        Ok(Self {
            mime_type: ImageFormat::Png.to_mime_type().to_string(),
            width: frame.width(),
            height: frame.height(),
            bytes: Arc::new(bytes),
        })
    }

    /// Upload file name, extension derived from the MIME type.
    pub fn file_name(&self) -> String {
        let extension = ImageFormat::from_mime_type(&self.mime_type)
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("bin");
        format!("image.{}", extension)
    }
}

pub fn select_from_file(path: &Path) -> Result<ImagePayload, AcquisitionError> {
    let unreadable = |reason: String| AcquisitionError::UnreadableFile {
        path: path.display().to_string(),
        reason,
    };

    let bytes = std::fs::read(path).map_err(|e| unreadable(e.to_string()))?;

    ImagePayload::from_encoded(bytes).map_err(|e| unreadable(e.to_string()))
}
