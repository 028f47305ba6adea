use crate::acquisition::capture_session::CaptureError;
use crate::acquisition::payload::{AcquisitionError, ImagePayload};
use crate::device_camera::interface::DeviceCameraError;
use crate::history_store::interface::{HistoryError, HistoryId, HistoryRecord};
use crate::image_classifier::category::to_classification_result;
use crate::image_classifier::interface::{ClassificationResult, ClassifierError, Prediction};
use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Workflow {
    #[default]
    Idle,
    ImageSelected {
        payload: ImagePayload,
    },
    Classifying {
        payload: ImagePayload,
        request: u64,
    },
    ResultReady {
        payload: ImagePayload,
        result: ClassificationResult,
    },
    Error {
        payload: ImagePayload,
        result: ClassificationResult,
    },
}

impl Workflow {
    pub fn payload(&self) -> Option<&ImagePayload> {
        match self {
            Workflow::Idle => None,
            Workflow::ImageSelected { payload }
            | Workflow::Classifying { payload, .. }
            | Workflow::ResultReady { payload, .. }
            | Workflow::Error { payload, .. } => Some(payload),
        }
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        match self {
            Workflow::ResultReady { result, .. } | Workflow::Error { result, .. } => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CameraState {
    #[default]
    Closed,
    Opening,
    Live,
    Capturing,
    Error(DeviceCameraError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum HistoryList {
    #[default]
    Loading,
    Loaded(Vec<HistoryRecord>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryState {
    pub list: HistoryList,
    pub deleting: BTreeSet<HistoryId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    UnreadableImage,
    Camera(DeviceCameraError),
    CaptureFailed,
    SaveFailed(String),
    DeleteFailed(String),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::UnreadableImage => "Cannot read image".to_string(),
            Notice::Camera(DeviceCameraError::AccessDenied) => {
                "Camera access was denied. Allow camera access and try again.".to_string()
            }
            Notice::Camera(DeviceCameraError::Unavailable) => {
                "No camera was found on this device.".to_string()
            }
            Notice::Camera(DeviceCameraError::Stream(reason)) => {
                format!("Camera error: {}", reason)
            }
            Notice::CaptureFailed => "Could not capture a photo".to_string(),
            Notice::SaveFailed(reason) => {
                format!("Result could not be saved to history: {}", reason)
            }
            Notice::DeleteFailed(message) => message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct State {
    pub workflow: Workflow,
    pub camera: CameraState,
    pub history: HistoryState,
    pub notice: Option<Notice>,
    pub exited: bool,
    /// Id of the most recently requested camera session.
    pub camera_session: u64,
    /// Id of the most recently sent classification request.
    pub classify_request: u64,
}

#[derive(Debug)]
pub enum Event {
    FileSelected(PathBuf),
    FileReadDone(Result<ImagePayload, AcquisitionError>),
    OpenCameraRequested,
    CameraOpenDone {
        session: u64,
        outcome: Result<(), DeviceCameraError>,
    },
    CaptureRequested,
    CaptureDone {
        session: u64,
        outcome: Result<Option<ImagePayload>, CaptureError>,
    },
    CancelCaptureRequested,
    ClassifyRequested,
    ClassifyDone {
        request: u64,
        outcome: Result<Prediction, ClassifierError>,
        at: DateTime<Local>,
    },
    SaveHistoryDone(Result<HistoryRecord, HistoryError>),
    ResetRequested,
    HistoryRequested,
    HistoryLoaded(Vec<HistoryRecord>),
    DeleteRequested(HistoryId),
    DeleteDone {
        id: HistoryId,
        outcome: Result<(), HistoryError>,
    },
    NoticeDismissed,
    QuitRequested,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ReadFile { path: PathBuf },
    OpenCamera { session: u64 },
    CaptureFrame { session: u64 },
    CancelCapture { session: u64 },
    Classify { request: u64, payload: ImagePayload },
    SaveHistory {
        payload: ImagePayload,
        result: ClassificationResult,
    },
    LoadHistory,
    DeleteHistory { id: HistoryId },
}

pub fn init() -> (State, Vec<Effect>) {
    (State::default(), vec![Effect::LoadHistory])
}

pub fn transition(state: State, event: Event) -> (State, Vec<Effect>) {
    match event {
        // Acquisition
        Event::FileSelected(path) => (state, vec![Effect::ReadFile { path }]),
        Event::FileReadDone(Ok(payload)) => (
            State {
                workflow: Workflow::ImageSelected { payload },
                notice: None,
                ..state
            },
            vec![],
        ),
        Event::FileReadDone(Err(_)) => (
            State {
                notice: Some(Notice::UnreadableImage),
                ..state
            },
            vec![],
        ),
        Event::OpenCameraRequested => match state.camera {
            CameraState::Closed | CameraState::Error(_) => {
                let session = state.camera_session + 1;
                (
                    State {
                        camera: CameraState::Opening,
                        camera_session: session,
                        ..state
                    },
                    vec![Effect::OpenCamera { session }],
                )
            }
            _ => (state, vec![]),
        },
        Event::CameraOpenDone { session, outcome } => {
            let is_current =
                state.camera == CameraState::Opening && session == state.camera_session;
            match outcome {
                Ok(()) if is_current => (
                    State {
                        camera: CameraState::Live,
                        ..state
                    },
                    vec![],
                ),
                // Cancelled or superseded while the device was still opening.
                Ok(()) => (state, vec![Effect::CancelCapture { session }]),
                Err(error) if is_current => (
                    State {
                        camera: CameraState::Error(error.clone()),
                        notice: Some(Notice::Camera(error)),
                        ..state
                    },
                    vec![],
                ),
                Err(_) => (state, vec![]),
            }
        }
        Event::CaptureRequested => match state.camera {
            CameraState::Live => {
                let session = state.camera_session;
                (
                    State {
                        camera: CameraState::Capturing,
                        ..state
                    },
                    vec![Effect::CaptureFrame { session }],
                )
            }
            _ => (state, vec![]),
        },
        Event::CaptureDone { session, outcome } => {
            if state.camera != CameraState::Capturing || session != state.camera_session {
                return (state, vec![]);
            }

            let state = State {
                camera: CameraState::Closed,
                ..state
            };
            match outcome {
                Ok(Some(payload)) => (
                    State {
                        workflow: Workflow::ImageSelected { payload },
                        notice: None,
                        ..state
                    },
                    vec![],
                ),
                Ok(None) | Err(_) => (
                    State {
                        notice: Some(Notice::CaptureFailed),
                        ..state
                    },
                    vec![],
                ),
            }
        }
        Event::CancelCaptureRequested => {
            let session = state.camera_session;
            (
                State {
                    camera: CameraState::Closed,
                    ..state
                },
                vec![Effect::CancelCapture { session }],
            )
        }

        // Classification
        Event::ClassifyRequested => {
            let payload = match &state.workflow {
                Workflow::Classifying { .. } => None,
                workflow => workflow.payload().cloned(),
            };
            match payload {
                Some(payload) => {
                    let request = state.classify_request + 1;
                    (
                        State {
                            workflow: Workflow::Classifying {
                                payload: payload.clone(),
                                request,
                            },
                            classify_request: request,
                            notice: None,
                            ..state
                        },
                        vec![Effect::Classify { request, payload }],
                    )
                }
                None => (state, vec![]),
            }
        }
        Event::ClassifyDone {
            request,
            outcome,
            at,
        } => {
            let current = match &state.workflow {
                Workflow::Classifying {
                    payload,
                    request: current,
                } if *current == request => Some(payload.clone()),
                _ => None,
            };
            let Some(payload) = current else {
                return (state, vec![]);
            };

            let result = to_classification_result(&outcome, at);
            match outcome {
                Ok(_) => (
                    State {
                        workflow: Workflow::ResultReady {
                            payload: payload.clone(),
                            result: result.clone(),
                        },
                        ..state
                    },
                    vec![Effect::SaveHistory { payload, result }],
                ),
                Err(_) => (
                    State {
                        workflow: Workflow::Error { payload, result },
                        ..state
                    },
                    vec![],
                ),
            }
        }
        Event::ResetRequested => (
            State {
                workflow: Workflow::Idle,
                notice: None,
                ..state
            },
            vec![],
        ),

        // History
        Event::SaveHistoryDone(Ok(record)) => {
            let mut history = state.history;
            if let HistoryList::Loaded(records) = &mut history.list {
                records.push(record);
            }
            (State { history, ..state }, vec![])
        }
        Event::SaveHistoryDone(Err(error)) => (
            State {
                notice: Some(Notice::SaveFailed(error.to_string())),
                ..state
            },
            vec![],
        ),
        Event::HistoryRequested => {
            let mut history = state.history;
            history.list = HistoryList::Loading;
            (State { history, ..state }, vec![Effect::LoadHistory])
        }
        Event::HistoryLoaded(records) => {
            let mut history = state.history;
            history.list = HistoryList::Loaded(records);
            (State { history, ..state }, vec![])
        }
        Event::DeleteRequested(id) => {
            if state.history.deleting.contains(&id) {
                return (state, vec![]);
            }
            let mut history = state.history;
            history.deleting.insert(id.clone());
            (State { history, ..state }, vec![Effect::DeleteHistory { id }])
        }
        Event::DeleteDone { id, outcome } => {
            let mut history = state.history;
            history.deleting.remove(&id);
            match outcome {
                Ok(()) => {
                    if let HistoryList::Loaded(records) = &mut history.list {
                        records.retain(|record| record.id != id);
                    }
                    (State { history, ..state }, vec![])
                }
                Err(error) => (
                    State {
                        history,
                        notice: Some(Notice::DeleteFailed(error.delete_notice())),
                        ..state
                    },
                    vec![],
                ),
            }
        }

        Event::NoticeDismissed => (
            State {
                notice: None,
                ..state
            },
            vec![],
        ),
        Event::QuitRequested => {
            let effects = match state.camera {
                CameraState::Closed => vec![],
                _ => vec![Effect::CancelCapture {
                    session: state.camera_session,
                }],
            };
            (
                State {
                    camera: CameraState::Closed,
                    exited: true,
                    ..state
                },
                effects,
            )
        }
    }
}
