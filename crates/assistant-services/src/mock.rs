use crate::{ControlOutcome, Speaker, SystemControl, WeatherProvider};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn push<T>(log: &Mutex<Vec<T>>, item: T) {
    if let Ok(mut log) = log.lock() {
        log.push(item);
    }
}

fn snapshot<T: Clone>(log: &Mutex<Vec<T>>) -> Vec<T> {
    log.lock().map(|l| l.clone()).unwrap_or_default()
}

/// Weather provider returning a fixed sentence and remembering locations.
#[derive(Clone, Default)]
pub struct MockWeather {
    locations: Arc<Mutex<Vec<String>>>,
}

impl MockWeather {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested_locations(&self) -> Vec<String> {
        snapshot(&self.locations)
    }
}

impl WeatherProvider for MockWeather {
    fn name(&self) -> &str {
        "mock"
    }

    fn weather_simple(&self, location: &str) -> String {
        push(&self.locations, location.to_string());
        format!("It is sunny in {location}.")
    }
}

/// Calls seen by [`MockSystem`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SystemCall {
    OpenUrl(String),
    OpenApplication(String),
    SystemInfo,
    Shutdown(Duration),
    Restart(Duration),
    CancelPending,
}

/// System control that records calls and never touches the host.
#[derive(Clone, Default)]
pub struct MockSystem {
    calls: Arc<Mutex<Vec<SystemCall>>>,
    fail: bool,
}

impl MockSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose every request fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<SystemCall> {
        snapshot(&self.calls)
    }

    fn record(&self, call: SystemCall, message: String) -> ControlOutcome {
        push(&self.calls, call);
        if self.fail {
            ControlOutcome::failed(format!("mock failure: {message}"))
        } else {
            ControlOutcome::ok(message)
        }
    }
}

impl SystemControl for MockSystem {
    fn open_url(&self, url: &str) -> ControlOutcome {
        self.record(
            SystemCall::OpenUrl(url.to_string()),
            format!("Opening browser to {url}"),
        )
    }

    fn open_application(&self, app: &str) -> ControlOutcome {
        self.record(
            SystemCall::OpenApplication(app.to_string()),
            format!("Opening {app}"),
        )
    }

    fn system_info(&self) -> ControlOutcome {
        self.record(
            SystemCall::SystemInfo,
            "System: Mock, Platform: mock-1.0".to_string(),
        )
    }

    fn shutdown(&self, delay: Duration) -> ControlOutcome {
        self.record(
            SystemCall::Shutdown(delay),
            format!("System will shutdown in {} seconds", delay.as_secs()),
        )
    }

    fn restart(&self, delay: Duration) -> ControlOutcome {
        self.record(
            SystemCall::Restart(delay),
            format!("System will restart in {} seconds", delay.as_secs()),
        )
    }

    fn cancel_pending(&self) -> ControlOutcome {
        self.record(
            SystemCall::CancelPending,
            "Pending system operation cancelled".to_string(),
        )
    }
}

/// Speaker that keeps everything it was asked to say.
#[derive(Clone, Default)]
pub struct RecordingSpeaker {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        snapshot(&self.lines)
    }
}

impl Speaker for RecordingSpeaker {
    fn say(&self, text: &str) {
        push(&self.lines, text.to_string());
    }
}
