//! Routes classified utterances to their handlers

use crate::actions::{ActionTag, Response};
use crate::clock::{Clock, SystemClock};
use crate::confirmation::{ConfirmationState, CriticalOperation, Transition};
use crate::Result;
use assistant_services::{SystemControl, WeatherProvider};
use intent_parser::{Intent, IntentClassifier, ParameterSet, DEFAULT_LOCATION};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;
use time::macros::format_description;

/// Groups of handlers that can be switched off
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlags {
    #[serde(default = "enabled")]
    pub weather: bool,
    #[serde(default = "enabled")]
    pub system_control: bool,
    #[serde(default = "enabled")]
    pub timer: bool,
    #[serde(default = "enabled")]
    pub volume_control: bool,
}

fn enabled() -> bool {
    true
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            weather: true,
            system_control: true,
            timer: true,
            volume_control: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Page opened by the browser handler
    pub default_url: String,
    /// Delay announced and applied once shutdown/restart is confirmed
    pub shutdown_delay_secs: u64,
    /// When true, `cancel_operation` re-enters the shutdown/restart handler
    /// (confirming a pending request). When false it clears the pending
    /// request and asks the caller to abort any scheduled operation.
    pub cancel_confirms: bool,
    pub features: FeatureFlags,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            default_url: "https://www.google.com".to_string(),
            shutdown_delay_secs: 5,
            cancel_confirms: true,
            features: FeatureFlags::default(),
        }
    }
}

impl DispatcherConfig {
    /// Intents with a registered handler under these flags
    pub fn enabled_intents(&self) -> HashSet<Intent> {
        let f = &self.features;
        Intent::ALL
            .into_iter()
            .filter(|intent| match intent {
                Intent::Weather => f.weather,
                Intent::OpenBrowser
                | Intent::OpenApp
                | Intent::SystemInfo
                | Intent::Shutdown
                | Intent::Restart
                | Intent::CancelOperation => f.system_control,
                Intent::Timer => f.timer,
                Intent::Volume => f.volume_control,
                Intent::Time | Intent::Date | Intent::Greeting | Intent::Exit => true,
            })
            .collect()
    }
}

/// Owns the classifier, the collaborators and the confirmation slot for one
/// conversation. Not shared: one dispatcher per session.
pub struct Dispatcher {
    classifier: IntentClassifier,
    config: DispatcherConfig,
    handlers: HashSet<Intent>,
    weather: Box<dyn WeatherProvider>,
    system: Box<dyn SystemControl>,
    clock: Box<dyn Clock>,
    confirmation: ConfirmationState,
}

impl Dispatcher {
    pub fn new(
        config: DispatcherConfig,
        weather: Box<dyn WeatherProvider>,
        system: Box<dyn SystemControl>,
    ) -> Result<Self> {
        let classifier = IntentClassifier::new()?;
        let handlers = config.enabled_intents();
        tracing::info!(
            handlers = handlers.len(),
            weather = weather.name(),
            cancel_confirms = config.cancel_confirms,
            "command dispatcher ready"
        );
        Ok(Self {
            classifier,
            config,
            handlers,
            weather,
            system,
            clock: Box::new(SystemClock),
            confirmation: ConfirmationState::Idle,
        })
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn confirmation(&self) -> &ConfirmationState {
        &self.confirmation
    }

    pub fn has_handler(&self, intent: Intent) -> bool {
        self.handlers.contains(&intent)
    }

    /// Classify an utterance and run its handler
    pub fn process(&mut self, utterance: &str) -> Response {
        let intent = self.classifier.classify(utterance);
        let keeps_confirmation = matches!(
            intent,
            Some(Intent::Shutdown | Intent::Restart | Intent::CancelOperation)
        );
        if !keeps_confirmation && self.confirmation.is_pending() {
            self.confirmation.reset();
        }

        match intent {
            Some(intent) => {
                let params = self.classifier.extract_parameters(utterance, intent);
                self.dispatch(intent, utterance, &params)
            }
            None => {
                tracing::debug!(utterance, "no intent recognized");
                Response::not_understood()
            }
        }
    }

    /// Run the handler registered for `intent`
    pub fn dispatch(&mut self, intent: Intent, utterance: &str, params: &ParameterSet) -> Response {
        if !self.has_handler(intent) {
            tracing::debug!(%intent, "no handler registered");
            return Response::not_understood();
        }
        tracing::debug!(%intent, ?params, "dispatching");

        match intent {
            Intent::Time => self.time(),
            Intent::Date => self.date(),
            Intent::Weather => self.weather(params),
            Intent::OpenBrowser => self.open_browser(),
            Intent::OpenApp => self.open_app(params),
            Intent::SystemInfo => Response::speak(self.system.system_info().message),
            Intent::Shutdown => self.critical(CriticalOperation::Shutdown),
            Intent::Restart => self.critical(CriticalOperation::Restart),
            Intent::CancelOperation => self.cancel_operation(utterance, params),
            Intent::Timer => self.timer(params),
            Intent::Volume => Response::speak("Volume control logic not implemented yet."),
            Intent::Greeting => self.greeting(),
            Intent::Exit => {
                Response::speak("Goodbye! Have a great day!").with_action(ActionTag::Exit)
            }
        }
    }

    /// Re-run the handler of the pending operation, which confirms it.
    /// `None` when nothing is pending.
    pub fn confirm_pending(&mut self, utterance: &str) -> Option<Response> {
        let operation = self.confirmation.pending()?;
        let intent = match operation {
            CriticalOperation::Shutdown => Intent::Shutdown,
            CriticalOperation::Restart => Intent::Restart,
        };
        Some(self.dispatch(intent, utterance, &ParameterSet::default()))
    }

    /// Drop any pending confirmation
    pub fn reset(&mut self) -> Option<CriticalOperation> {
        self.confirmation.reset()
    }

    fn time(&self) -> Response {
        match self
            .clock
            .now()
            .format(format_description!("[hour repr:12]:[minute] [period]"))
        {
            Ok(now) => Response::speak(format!("The current time is {now}")),
            Err(e) => {
                tracing::warn!(error = %e, "failed to format time");
                Response::speak("Sorry, I couldn't read the clock.")
            }
        }
    }

    fn date(&self) -> Response {
        match self.clock.now().format(format_description!(
            "[weekday], [month repr:long] [day], [year]"
        )) {
            Ok(today) => Response::speak(format!("Today is {today}")),
            Err(e) => {
                tracing::warn!(error = %e, "failed to format date");
                Response::speak("Sorry, I couldn't read the calendar.")
            }
        }
    }

    fn weather(&self, params: &ParameterSet) -> Response {
        let location = params.location.as_deref().unwrap_or(DEFAULT_LOCATION);
        Response::speak(self.weather.weather_simple(location))
    }

    fn open_browser(&self) -> Response {
        let outcome = self.system.open_url(&self.config.default_url);
        if outcome.success {
            Response::speak("Opening your default web browser.")
        } else {
            tracing::warn!(message = %outcome.message, "browser launch failed");
            Response::speak(format!(
                "Sorry, I couldn't open the browser. Error: {}",
                outcome.message
            ))
        }
    }

    fn open_app(&self, params: &ParameterSet) -> Response {
        let app = params.app.as_deref().unwrap_or("notepad");
        Response::speak(self.system.open_application(app).message)
    }

    fn critical(&mut self, operation: CriticalOperation) -> Response {
        match self.confirmation.advance(operation, Instant::now()) {
            Transition::AwaitingConfirmation(op) => Response::speak(format!(
                "I heard you want to {op} the computer. This is a critical operation. \
                 Please confirm by saying 'yes, {op}' or 'confirm {op}'."
            ))
            .with_confirmation(op),
            Transition::Confirmed(op) => {
                let delay = self.config.shutdown_delay_secs;
                let text = match op {
                    CriticalOperation::Shutdown => format!(
                        "Shutdown confirmed. Shutting down the system in {delay} seconds."
                    ),
                    CriticalOperation::Restart => format!(
                        "Restart confirmed. Restarting the system in {delay} seconds."
                    ),
                };
                Response::speak(text).with_action(op.into())
            }
        }
    }

    fn cancel_operation(&mut self, utterance: &str, params: &ParameterSet) -> Response {
        let name = params.operation.as_deref().unwrap_or("shutdown");
        let Some(operation) = CriticalOperation::from_name(name) else {
            tracing::debug!(utterance, name, "unknown operation to cancel");
            return Response::speak("I'm sorry, I didn't understand the operation to cancel.");
        };

        if self.config.cancel_confirms {
            return self.critical(operation);
        }

        self.confirmation.reset();
        Response::speak(format!("Cancelling any pending {operation}."))
            .with_action(ActionTag::CancelOperation)
    }

    fn timer(&self, params: &ParameterSet) -> Response {
        match params.duration {
            Some(duration) => Response::timer(
                format!("Setting a timer for {} seconds.", duration.seconds),
                duration.seconds,
            ),
            None => Response::speak(
                "Please specify the timer duration. For example, 'set timer for 30 seconds'.",
            ),
        }
    }

    fn greeting(&self) -> Response {
        let text = match self.clock.now().hour() {
            5..=11 => "Good morning! How can I help you today?",
            12..=16 => "Good afternoon! How can I help you today?",
            _ => "Good evening! How can I help you today?",
        };
        Response::speak(text)
    }
}
