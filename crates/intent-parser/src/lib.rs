//! Intent Parser for Voice Commands
//!
//! This crate turns a transcribed utterance into one of a fixed set of
//! assistant intents plus the parameters its handler needs. Classification is
//! a first-match walk over an ordered regex table; parameter extraction runs a
//! second, intent-specific set of patterns.

mod error;
mod intents;
mod parameters;
mod parser;

pub use error::{ClassifierError, Result};
pub use intents::Intent;
pub use parameters::{ParameterSet, TimeUnit, TimerDuration, DEFAULT_LOCATION};
pub use parser::{normalize, IntentClassifier};

use serde::{Deserialize, Serialize};

/// Outcome of classifying one utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Normalized utterance text
    pub text: String,
    /// Recognized intent, if any
    pub intent: Option<Intent>,
    /// Parameters for the recognized intent
    pub parameters: ParameterSet,
}

impl IntentClassifier {
    /// Classify and extract parameters in one step
    pub fn parse(&self, utterance: &str) -> ParseResult {
        let intent = self.classify(utterance);
        let parameters = intent
            .map(|i| self.extract_parameters(utterance, i))
            .unwrap_or_default();
        ParseResult {
            text: normalize(utterance),
            intent,
            parameters,
        }
    }
}

/// Initialize the intent parser system
pub fn init() -> Result<()> {
    tracing::info!("Initializing Intent Parser system");
    Ok(())
}

/// Parse a single command with a freshly built classifier
pub fn parse_command(text: &str) -> Result<ParseResult> {
    let classifier = IntentClassifier::new()?;
    Ok(classifier.parse(text))
}
