use crate::Speaker;
use std::io::Write;

/// Prints responses to stdout as `<name>: <text>`.
#[derive(Debug, Clone)]
pub struct ConsoleSpeaker {
    name: String,
}

impl ConsoleSpeaker {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for ConsoleSpeaker {
    fn default() -> Self {
        Self::new("Jarvis")
    }
}

impl Speaker for ConsoleSpeaker {
    fn say(&self, text: &str) {
        tracing::debug!(speaker = %self.name, text, "speaking");
        let mut stdout = std::io::stdout().lock();
        // stdout closed: nothing left to speak to
        let _ = writeln!(stdout, "{}: {}", self.name, text);
        let _ = stdout.flush();
    }
}
