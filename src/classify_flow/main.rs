use crate::classify_flow::core::{init, transition, Effect, Event, State};
use crate::classify_flow::render::Render;
use crate::classify_flow::run_effect::RunEffect;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::history_store::interface::HistoryStore;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use crate::library::state_machine::StateMachine;
use std::sync::mpsc::{Receiver, RecvError, Sender};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct ClassifyFlow {
    logger: Arc<dyn Logger + Send + Sync>,
    run_effect: RunEffect,
    render: Render,
}

impl ClassifyFlow {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        history_store: Arc<dyn HistoryStore + Send + Sync>,
    ) -> Self {
        let logger = logger.with_namespace("classify_flow");
        Self {
            run_effect: RunEffect::new(
                logger.clone(),
                device_camera,
                image_classifier,
                history_store,
            ),
            render: Render::new(device_display),
            logger,
        }
    }

    /// Drives the workflow until the user quits, then releases the camera.
    pub fn run(
        &self,
        event_sender: Sender<Event>,
        event_receiver: Receiver<Event>,
    ) -> Result<State, RecvError> {
        let transition_logger = self.logger.clone();
        let render_logger = self.logger.clone();
        let render = self.render.clone();
        let run_effect = self.run_effect.clone();

        let state_machine = StateMachine::new(
            init(),
            move |state: State, event: Event| {
                transition_logger.info(&format!("event: {:?}", event));
                let (state, effects) = transition(state, event);
                if !effects.is_empty() {
                    transition_logger.info(&format!("effects: {:?}", effects));
                }
                (state, effects)
            },
            move |state: &State| {
                if let Err(e) = render.render(state) {
                    render_logger.error(&format!("Render failed: {}", e));
                }
            },
            move |effect: Effect, sender: Sender<Event>| run_effect.run_effect(effect, sender),
            |state: &State| state.exited,
        );

        let outcome = state_machine.run(event_sender, event_receiver);
        self.run_effect.release_camera();
        outcome
    }
}
