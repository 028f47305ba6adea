use crate::acquisition::payload::{select_from_file, AcquisitionError, ImagePayload};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::{Cursor, Write};

fn encoded(format: ImageFormat) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([200, 30, 20])));
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

#[test]
fn selects_png_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&encoded(ImageFormat::Png)).unwrap();

    let payload = select_from_file(file.path()).unwrap();

    assert_eq!(payload.mime_type, "image/png");
    assert_eq!((payload.width, payload.height), (4, 3));
    assert_eq!(payload.file_name(), "image.png");
}

#[test]
fn selects_jpeg_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&encoded(ImageFormat::Jpeg)).unwrap();

    let payload = select_from_file(file.path()).unwrap();

    assert_eq!(payload.mime_type, "image/jpeg");
}

#[test]
fn text_file_is_unreadable() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"definitely not an image").unwrap();

    let result = select_from_file(file.path());

    assert!(matches!(
        result,
        Err(AcquisitionError::UnreadableFile { .. })
    ));
}

#[test]
fn truncated_png_is_unreadable() {
    let mut bytes = encoded(ImageFormat::Png);
    bytes.truncate(bytes.len() / 2);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();

    assert!(select_from_file(file.path()).is_err());
}

#[test]
fn missing_file_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();

    let result = select_from_file(&dir.path().join("nope.png"));

    assert!(matches!(
        result,
        Err(AcquisitionError::UnreadableFile { .. })
    ));
}

#[test]
fn debug_output_elides_bytes() {
    let payload = ImagePayload::from_encoded(encoded(ImageFormat::Png)).unwrap();

    let debug = format!("{:?}", payload);

    assert!(debug.contains("bytes>"));
    assert!(!debug.contains("["));
}
