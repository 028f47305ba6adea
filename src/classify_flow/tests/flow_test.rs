use crate::classify_flow::core::{CameraState, Effect, Event, HistoryList, Notice, Workflow};
use crate::classify_flow::tests::fixture::{png_file, Fixture};
use crate::device_camera::impl_fake::FakeCameraBehavior;
use crate::history_store::interface::HistoryId;
use crate::image_classifier::interface::{ClassifierError, Prediction};
use std::io::Write;

fn prediction(class: i64, score: f64, message: Option<&str>) -> Prediction {
    Prediction {
        class,
        score,
        message: message.map(str::to_string),
    }
}

#[test]
fn upload_classify_and_persist() {
    let mut f = Fixture::new();
    assert_eq!(f.state.history.list, HistoryList::Loaded(vec![]));
    let file = png_file();

    f.dispatch(Event::FileSelected(file.path().to_path_buf()));
    assert!(matches!(f.state.workflow, Workflow::ImageSelected { .. }));

    f.image_classifier
        .push_outcome(Ok(prediction(5, 0.919, None)));
    f.dispatch(Event::ClassifyRequested);

    let result = f.state.workflow.result().unwrap();
    assert_eq!(result.label, "Cabai Rawit Merah");
    assert_eq!(result.confidence_percent(), 92);

    let stored = f.history_store.records();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].label, "Cabai Rawit Merah");
    assert_eq!(stored[0].accuracy, 92);
    assert_eq!(f.state.history.list, HistoryList::Loaded(stored));
}

#[test]
fn failing_save_never_alters_displayed_result() {
    let mut f = Fixture::new();
    f.history_store.fail_saves(true);
    let file = png_file();
    f.dispatch(Event::FileSelected(file.path().to_path_buf()));

    f.image_classifier
        .push_outcome(Ok(prediction(-1, 0.81, Some("Bukan cabai"))));
    f.dispatch(Event::ClassifyRequested);

    match &f.state.workflow {
        Workflow::ResultReady { result, .. } => {
            assert_eq!(result.label, "Bukan cabai");
            assert_eq!(result.confidence_percent(), 81);
        }
        _ => panic!("Unexpected workflow"),
    }
    assert_eq!(f.history_store.save_calls(), 1);
    assert!(matches!(f.state.notice, Some(Notice::SaveFailed(_))));
    assert_eq!(f.state.history.list, HistoryList::Loaded(vec![]));
}

#[test]
fn network_failure_shows_error_without_saving() {
    let mut f = Fixture::new();
    let file = png_file();
    f.dispatch(Event::FileSelected(file.path().to_path_buf()));

    f.image_classifier.push_outcome(Err(ClassifierError::Transport(
        "connection refused".to_string(),
    )));
    f.dispatch(Event::ClassifyRequested);

    let result = f.state.workflow.result().unwrap();
    assert_eq!(result.label, "Error");
    assert_eq!(result.confidence_percent(), 0);
    assert!(matches!(f.state.workflow, Workflow::Error { .. }));
    assert_eq!(f.save_effects(), 0);
    assert_eq!(f.history_store.save_calls(), 0);
}

#[test]
fn unreadable_selection_shows_notice() {
    let mut f = Fixture::new();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"%PDF-1.4 not an image").unwrap();

    f.dispatch(Event::FileSelected(file.path().to_path_buf()));

    assert_eq!(f.state.workflow, Workflow::Idle);
    assert_eq!(f.state.notice, Some(Notice::UnreadableImage));

    f.dispatch(Event::NoticeDismissed);
    assert_eq!(f.state.notice, None);
}

#[test]
fn camera_capture_feeds_classification() {
    let mut f = Fixture::new();

    f.dispatch(Event::OpenCameraRequested);
    assert_eq!(f.state.camera, CameraState::Live);
    assert_eq!(f.device_camera.open_streams(), 1);

    f.dispatch(Event::CaptureRequested);
    assert_eq!(f.state.camera, CameraState::Closed);
    assert_eq!(f.device_camera.open_streams(), 0);
    match &f.state.workflow {
        Workflow::ImageSelected { payload } => {
            assert_eq!(payload.mime_type, "image/png");
            assert_eq!((payload.width, payload.height), (16, 12));
        }
        _ => panic!("Unexpected workflow"),
    }

    f.image_classifier
        .push_outcome(Ok(prediction(2, 0.7, None)));
    f.dispatch(Event::ClassifyRequested);
    assert_eq!(f.state.workflow.result().unwrap().label, "Cabai Keriting Merah");
}

#[test]
fn open_then_cancel_releases_device() {
    let mut f = Fixture::new();

    f.dispatch(Event::OpenCameraRequested);
    f.dispatch(Event::CancelCaptureRequested);

    assert_eq!(f.state.camera, CameraState::Closed);
    assert_eq!(f.device_camera.open_streams(), 0);

    f.take_effects();
    f.dispatch(Event::CaptureRequested);
    assert!(f.take_effects().is_empty());
    assert_eq!(f.state.workflow, Workflow::Idle);
}

#[test]
fn broken_frame_releases_device_and_warns() {
    let mut f = Fixture::new();
    f.device_camera.set_behavior(FakeCameraBehavior::BrokenFrames);

    f.dispatch(Event::OpenCameraRequested);
    f.dispatch(Event::CaptureRequested);

    assert_eq!(f.device_camera.open_streams(), 0);
    assert_eq!(f.state.camera, CameraState::Closed);
    assert_eq!(f.state.notice, Some(Notice::CaptureFailed));
}

#[test]
fn missing_camera_does_not_fall_back_to_file() {
    let mut f = Fixture::new();
    f.device_camera.set_behavior(FakeCameraBehavior::Unavailable);

    f.dispatch(Event::OpenCameraRequested);

    assert!(matches!(f.state.camera, CameraState::Error(_)));
    assert!(f
        .state
        .notice
        .as_ref()
        .unwrap()
        .message()
        .contains("No camera"));
    assert!(!f
        .take_effects()
        .iter()
        .any(|effect| matches!(effect, Effect::ReadFile { .. })));
}

#[test]
fn quitting_with_live_camera_releases_it() {
    let mut f = Fixture::new();
    f.dispatch(Event::OpenCameraRequested);

    f.dispatch(Event::QuitRequested);

    assert!(f.state.exited);
    assert_eq!(f.device_camera.open_streams(), 0);
}

#[test]
fn delete_removes_exactly_one_record() {
    let mut f = Fixture::new();
    let file = png_file();
    f.dispatch(Event::FileSelected(file.path().to_path_buf()));
    for class in [0, 1, 2] {
        f.image_classifier
            .push_outcome(Ok(prediction(class, 0.9, None)));
        f.dispatch(Event::ClassifyRequested);
    }
    f.dispatch(Event::HistoryRequested);
    let ids: Vec<HistoryId> = f.history_store.records().into_iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 3);

    f.dispatch(Event::DeleteRequested(ids[1].clone()));

    match &f.state.history.list {
        HistoryList::Loaded(records) => {
            let remaining: Vec<HistoryId> = records.iter().map(|r| r.id.clone()).collect();
            assert_eq!(remaining, vec![ids[0].clone(), ids[2].clone()]);
        }
        HistoryList::Loading => panic!("History not loaded"),
    }
}

#[test]
fn deleting_unknown_id_surfaces_error_and_keeps_list() {
    let mut f = Fixture::new();
    let file = png_file();
    f.dispatch(Event::FileSelected(file.path().to_path_buf()));
    f.image_classifier
        .push_outcome(Ok(prediction(4, 0.6, None)));
    f.dispatch(Event::ClassifyRequested);
    let before = f.state.history.list.clone();

    f.dispatch(Event::DeleteRequested(HistoryId("999".to_string())));

    assert_eq!(f.state.history.list, before);
    assert_eq!(f.state.notice.as_ref().unwrap().message(), "not found");
    assert!(f.state.history.deleting.is_empty());
}
