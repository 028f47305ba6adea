use crate::classify_flow::core::Event;
use crate::history_store::interface::HistoryId;
use std::path::PathBuf;

pub const HELP: &str = "commands: open <path> | camera | capture | cancel | classify | reset | history | delete <id> | dismiss | quit";

#[derive(Debug)]
pub enum Command {
    Event(Event),
    Help,
    Unknown(String),
}

/// Maps one line of console input to a user event.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (name, argument) = match line.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (line, ""),
    };

    let command = match (name.to_lowercase().as_str(), argument) {
        ("open", path) if !path.is_empty() => {
            Command::Event(Event::FileSelected(PathBuf::from(path)))
        }
        ("camera", "") => Command::Event(Event::OpenCameraRequested),
        ("capture", "") => Command::Event(Event::CaptureRequested),
        ("cancel", "") => Command::Event(Event::CancelCaptureRequested),
        ("classify", "") => Command::Event(Event::ClassifyRequested),
        ("reset", "") => Command::Event(Event::ResetRequested),
        ("history", "") => Command::Event(Event::HistoryRequested),
        ("delete", id) if !id.is_empty() => {
            Command::Event(Event::DeleteRequested(HistoryId(id.to_string())))
        }
        ("dismiss", "") => Command::Event(Event::NoticeDismissed),
        ("quit", "") | ("exit", "") => Command::Event(Event::QuitRequested),
        ("help", _) => Command::Help,
        _ => Command::Unknown(line.to_string()),
    };

    Some(command)
}
