use crate::acquisition::capture_session::{CaptureError, CaptureSession, CaptureStatus};
use crate::device_camera::impl_fake::{DeviceCameraFake, FakeCameraBehavior};
use crate::device_camera::interface::DeviceCameraError;
use crate::library::logger::impl_log::LoggerLog;
use std::sync::Arc;

fn camera() -> DeviceCameraFake {
    DeviceCameraFake::new(Arc::new(LoggerLog::new()), 8, 6)
}

#[test]
fn capture_produces_png_and_releases_stream() {
    let camera = camera();
    let mut session = CaptureSession::open(&camera);
    assert_eq!(session.status(), &CaptureStatus::Live);
    assert_eq!(camera.open_streams(), 1);

    let payload = session.capture().unwrap().unwrap();

    assert_eq!(payload.mime_type, "image/png");
    assert_eq!((payload.width, payload.height), (8, 6));
    assert_eq!(session.status(), &CaptureStatus::Captured);
    assert!(!session.holds_stream());
    assert_eq!(camera.open_streams(), 0);
}

#[test]
fn failed_capture_still_releases_stream() {
    let camera = camera();
    camera.set_behavior(FakeCameraBehavior::BrokenFrames);
    let mut session = CaptureSession::open(&camera);

    let result = session.capture();

    assert!(matches!(result, Err(CaptureError::Frame(_))));
    assert_eq!(camera.open_streams(), 0);
    assert!(session.status().is_terminal());
}

#[test]
fn cancel_right_after_open_releases_stream() {
    let camera = camera();
    let mut session = CaptureSession::open(&camera);

    session.cancel();

    assert_eq!(session.status(), &CaptureStatus::Cancelled);
    assert_eq!(camera.open_streams(), 0);
    assert!(session.capture().unwrap().is_none());
}

#[test]
fn denied_access_enters_error_state() {
    let camera = camera();
    camera.set_behavior(FakeCameraBehavior::AccessDenied);

    let mut session = CaptureSession::open(&camera);

    assert_eq!(session.error(), Some(&DeviceCameraError::AccessDenied));
    assert!(session.capture().unwrap().is_none());
    session.cancel();
    assert_eq!(session.status(), &CaptureStatus::Cancelled);
}

#[test]
fn missing_device_enters_error_state() {
    let camera = camera();
    camera.set_behavior(FakeCameraBehavior::Unavailable);

    let session = CaptureSession::open(&camera);

    assert_eq!(session.error(), Some(&DeviceCameraError::Unavailable));
    assert_eq!(camera.open_streams(), 0);
}

#[test]
fn dropping_a_live_session_releases_stream() {
    let camera = camera();
    {
        let _session = CaptureSession::open(&camera);
        assert_eq!(camera.open_streams(), 1);
    }
    assert_eq!(camera.open_streams(), 0);
}

#[test]
fn cancel_is_idempotent() {
    let camera = camera();
    let mut session = CaptureSession::open(&camera);

    session.cancel();
    session.cancel();

    assert_eq!(camera.open_streams(), 0);
}
