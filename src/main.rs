use clap::{Parser, ValueEnum};
use classify_flow::command::{parse_command, Command, HELP};
use classify_flow::core::Event;
use classify_flow::main::ClassifyFlow;
use config::Config;
use device_camera::impl_fake::{DeviceCameraFake, FakeCameraBehavior};
use device_camera::impl_ffmpeg::DeviceCameraFfmpeg;
use device_camera::interface::DeviceCamera;
use device_display::impl_console::DeviceDisplayConsole;
use history_store::{
    impl_fake::HistoryStoreFake, impl_http::HistoryStoreHttp, interface::HistoryStore,
};
use image_classifier::{
    impl_fake::ImageClassifierFake, impl_http::ImageClassifierHttp, interface::ImageClassifier,
};
use library::logger::{impl_log::LoggerLog, interface::Logger};
use std::io::BufRead;
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex};

mod acquisition;
mod classify_flow;
mod config;
mod device_camera;
mod device_display;
mod history_store;
mod image_classifier;
mod library;

#[derive(Parser, Debug)]
#[command(about = "Identify chili varieties from a photo")]
struct Args {
    /// Base URL of the prediction and history service
    #[arg(long)]
    api_url: Option<String>,

    /// Use the in-memory classifier and history store, and a simulated camera
    #[arg(long)]
    offline: bool,

    /// Camera device node
    #[arg(long)]
    camera_device: Option<String>,

    /// Simulate the camera instead of reading the device
    #[arg(long, value_enum)]
    fake_camera: Option<FakeCamera>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum FakeCamera {
    Available,
    Denied,
    Unavailable,
    Broken,
}

impl Args {
    /// Behavior of the simulated camera, or `None` for the real device.
    fn fake_camera_behavior(&self) -> Option<FakeCameraBehavior> {
        match (self.fake_camera, self.offline) {
            (Some(FakeCamera::Available), _) | (None, true) => Some(FakeCameraBehavior::Available),
            (Some(FakeCamera::Denied), _) => Some(FakeCameraBehavior::AccessDenied),
            (Some(FakeCamera::Unavailable), _) => Some(FakeCameraBehavior::Unavailable),
            (Some(FakeCamera::Broken), _) => Some(FakeCameraBehavior::BrokenFrames),
            (None, false) => None,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = Config::default();
    if let Some(api_url) = &args.api_url {
        config = config.with_api_base_url(api_url);
    }
    if let Some(camera_device) = &args.camera_device {
        config.camera_device = camera_device.clone();
    }

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerLog::new());

    let device_camera: Arc<dyn DeviceCamera + Send + Sync> = match args.fake_camera_behavior() {
        Some(behavior) => {
            let camera = DeviceCameraFake::new(
                logger.clone(),
                config.capture_frame_width,
                config.capture_frame_height,
            );
            camera.set_behavior(behavior);
            Arc::new(camera)
        }
        None => Arc::new(DeviceCameraFfmpeg::new(&config, logger.clone())),
    };

    let device_display = Arc::new(Mutex::new(DeviceDisplayConsole::new(config.display_width)));

    let (image_classifier, history_store): (
        Arc<dyn ImageClassifier + Send + Sync>,
        Arc<dyn HistoryStore + Send + Sync>,
    ) = if args.offline {
        (
            Arc::new(ImageClassifierFake::new(logger.clone())),
            Arc::new(HistoryStoreFake::new(logger.clone())),
        )
    } else {
        (
            Arc::new(ImageClassifierHttp::new(&config, logger.clone())?),
            Arc::new(HistoryStoreHttp::new(config.clone(), logger.clone())?),
        )
    };

    let flow = ClassifyFlow::new(
        logger.clone(),
        device_camera,
        device_display,
        image_classifier,
        history_store,
    );

    let (event_sender, event_receiver) = channel();
    spawn_input(event_sender.clone(), logger.clone());

    println!("{}", HELP);
    flow.run(event_sender, event_receiver)?;

    Ok(())
}

fn spawn_input(event_sender: Sender<Event>, logger: Arc<dyn Logger + Send + Sync>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    logger.error(&format!("Reading input failed: {}", e));
                    break;
                }
            };

            match parse_command(&line) {
                Some(Command::Event(event)) => {
                    if event_sender.send(event).is_err() {
                        return;
                    }
                }
                Some(Command::Help) => println!("{}", HELP),
                Some(Command::Unknown(input)) => println!("unknown command '{}'. {}", input, HELP),
                None => {}
            }
        }

        let _ = event_sender.send(Event::QuitRequested);
    });
}
