use crate::ControlOutcome;
use std::time::Duration;

/// Weather lookup. Failures come back as apology text, never as errors.
pub trait WeatherProvider: Send + Sync {
    fn name(&self) -> &str;

    fn weather_simple(&self, location: &str) -> String;

    /// Whether this provider can return real data
    fn is_available(&self) -> bool {
        true
    }
}

/// Operating system control used by the dispatcher and action executor.
pub trait SystemControl: Send + Sync {
    fn open_url(&self, url: &str) -> ControlOutcome;

    fn open_application(&self, app: &str) -> ControlOutcome;

    /// One-line summary of the host
    fn system_info(&self) -> ControlOutcome;

    fn shutdown(&self, delay: Duration) -> ControlOutcome;

    fn restart(&self, delay: Duration) -> ControlOutcome;

    /// Abort a scheduled shutdown or restart
    fn cancel_pending(&self) -> ControlOutcome;
}

/// Renders response text to the user.
pub trait Speaker: Send + Sync {
    fn say(&self, text: &str);
}
