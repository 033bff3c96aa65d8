//! Conversation front: wake word, confirmation follow-ups and expiry

use crate::{DispatchError, Dispatcher, Response, Result};
use std::time::{Duration, Instant};

/// Words that confirm a pending critical operation
pub const AFFIRMATIVE_WORDS: [&str; 5] = ["yes", "confirm", "proceed", "okay", "ok"];

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub wake_word: String,
    /// Ignore input that does not start with the wake word
    pub require_wake_word: bool,
    /// How long a confirmation request stays valid
    pub safety_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            wake_word: "jarvis".to_string(),
            require_wake_word: false,
            safety_timeout: Duration::from_secs(30),
        }
    }
}

/// Whether `text` contains one of [`AFFIRMATIVE_WORDS`] as a whole word
pub fn is_affirmative(text: &str) -> bool {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| AFFIRMATIVE_WORDS.contains(&word))
}

pub struct Session {
    dispatcher: Dispatcher,
    config: SessionConfig,
}

impl Session {
    pub fn new(dispatcher: Dispatcher, config: SessionConfig) -> Result<Self> {
        if config.require_wake_word && config.wake_word.trim().is_empty() {
            return Err(DispatchError::Config(
                "wake word is required but empty".to_string(),
            ));
        }
        Ok(Self {
            dispatcher,
            config: SessionConfig {
                wake_word: config.wake_word.trim().to_lowercase(),
                ..config
            },
        })
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Command text following the wake word, or `None` if the utterance does
    /// not start with it. An empty string means the wake word came alone.
    pub fn strip_wake_word(&self, utterance: &str) -> Option<String> {
        let wake = self.config.wake_word.as_str();
        if wake.is_empty() {
            return None;
        }
        let text = utterance.trim();
        let head = text.get(..wake.len())?;
        if !head.eq_ignore_ascii_case(wake) {
            return None;
        }
        let rest = text.get(wake.len()..)?;
        if rest.starts_with(|c: char| c.is_alphanumeric()) {
            return None;
        }
        Some(rest.trim_start_matches([',', ' ', '.', '!']).trim().to_string())
    }

    pub fn handle(&mut self, utterance: &str) -> Option<Response> {
        self.handle_at(utterance, Instant::now())
    }

    /// Route one utterance as of `now`. `None` means the input was ignored.
    pub fn handle_at(&mut self, utterance: &str, now: Instant) -> Option<Response> {
        let woken = self.strip_wake_word(utterance);
        let command = match woken {
            Some(command) => {
                if command.is_empty() {
                    return Some(Response::speak("Yes, I'm listening."));
                }
                command
            }
            None if self.config.require_wake_word => {
                tracing::trace!(utterance, "no wake word, ignoring");
                return None;
            }
            None => utterance.trim().to_string(),
        };
        if command.is_empty() {
            return None;
        }

        let state = *self.dispatcher.confirmation();
        if state.is_pending() {
            if state.is_expired(now, self.config.safety_timeout) {
                self.dispatcher.reset();
                tracing::info!("confirmation request expired");
                if is_affirmative(&command) {
                    return Some(Response::speak(
                        "The confirmation request timed out. Please ask again.",
                    ));
                }
            } else if is_affirmative(&command) {
                return self.dispatcher.confirm_pending(&command);
            } else {
                self.dispatcher.reset();
                return Some(Response::speak("Operation cancelled."));
            }
        }

        Some(self.dispatcher.process(&command))
    }
}
