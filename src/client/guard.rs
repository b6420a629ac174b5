//! Advisory copy and screen-capture guard for the question display. Not a
//! security boundary: it only swaps the action for a warning.

pub const SCREENSHOT_WARNING: &str = "Screenshots are not allowed during the quiz.";
pub const COPY_WARNING: &str = "Copying questions is not allowed.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardEvent {
    Key(String),
    Copy,
}

pub fn warning_for(event: &GuardEvent) -> Option<&'static str> {
    match event {
        GuardEvent::Key(key) if is_screen_capture_key(key) => Some(SCREENSHOT_WARNING),
        GuardEvent::Key(_) => None,
        GuardEvent::Copy => Some(COPY_WARNING),
    }
}

fn is_screen_capture_key(key: &str) -> bool {
    ["PrintScreen", "PrtSc", "Snapshot"]
        .iter()
        .any(|name| key.trim().eq_ignore_ascii_case(name))
}
