//! Carries out the action attached to each response

use assistant_services::{ControlOutcome, Speaker, SystemControl};
use command_dispatch::{ActionTag, Response};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const TIMER_FINISHED: &str = "Timer finished! Time's up!";

/// What the front end should do after a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    pub shutdown_delay: Duration,
    pub max_timer: Duration,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            shutdown_delay: Duration::from_secs(5),
            max_timer: Duration::from_secs(3600),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PowerAction {
    Shutdown,
    Restart,
}

pub struct ActionExecutor {
    speaker: Arc<dyn Speaker>,
    system: Arc<dyn SystemControl>,
    runtime: Handle,
    settings: ExecutorSettings,
    active_timer: Option<JoinHandle<()>>,
    /// Confirmed shutdown/restart waiting out its delay
    pending_power: Option<JoinHandle<()>>,
}

impl ActionExecutor {
    pub fn new(
        speaker: Arc<dyn Speaker>,
        system: Arc<dyn SystemControl>,
        runtime: Handle,
        settings: ExecutorSettings,
    ) -> Self {
        Self {
            speaker,
            system,
            runtime,
            settings,
            active_timer: None,
            pending_power: None,
        }
    }

    pub fn say(&self, text: &str) {
        self.speaker.say(text);
    }

    /// Speak the response, then run its action
    pub fn execute(&mut self, response: &Response) -> Flow {
        self.speaker.say(&response.text);

        match response.action {
            ActionTag::Speak => {}
            ActionTag::Exit => return Flow::Exit,
            ActionTag::Timer => {
                let secs = response.duration_secs.unwrap_or(30);
                self.start_timer(Duration::from_secs(secs));
            }
            ActionTag::Shutdown => self.schedule_power(PowerAction::Shutdown),
            ActionTag::Restart => self.schedule_power(PowerAction::Restart),
            ActionTag::CancelOperation => {
                if self.cancel_scheduled_power() || self.system.cancel_pending().success {
                    self.speaker.say("System operation cancelled successfully.");
                } else {
                    self.speaker.say("No pending system operations to cancel.");
                }
            }
            ActionTag::VolumeUp => self
                .speaker
                .say("Volume up functionality not fully implemented yet."),
            ActionTag::VolumeDown => self
                .speaker
                .say("Volume down functionality not fully implemented yet."),
        }
        Flow::Continue
    }

    /// Whether a confirmed shutdown/restart is still inside its delay
    pub fn power_pending(&self) -> bool {
        self.pending_power
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Wait out the delay in-process, then ask the system to act immediately.
    /// Until then a cancel aborts the task and nothing reaches the OS.
    fn schedule_power(&mut self, action: PowerAction) {
        self.cancel_scheduled_power();

        let delay = self.settings.shutdown_delay;
        let system = Arc::clone(&self.system);
        let speaker = Arc::clone(&self.speaker);
        info!(?action, delay_secs = delay.as_secs(), "power action scheduled");
        self.pending_power = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let outcome = tokio::task::spawn_blocking(move || match action {
                PowerAction::Shutdown => system.shutdown(Duration::ZERO),
                PowerAction::Restart => system.restart(Duration::ZERO),
            })
            .await
            .unwrap_or_else(|e| ControlOutcome::failed(e.to_string()));
            if !outcome.success {
                warn!(?action, message = %outcome.message, "power action failed");
                speaker.say(match action {
                    PowerAction::Shutdown => {
                        "Sorry, I couldn't shutdown the system. Please do it manually."
                    }
                    PowerAction::Restart => {
                        "Sorry, I couldn't restart the system. Please do it manually."
                    }
                });
            }
        }));
    }

    /// Abort a power action still waiting out its delay. `true` if one was
    /// aborted.
    fn cancel_scheduled_power(&mut self) -> bool {
        match self.pending_power.take() {
            Some(task) if !task.is_finished() => {
                task.abort();
                info!("scheduled power action aborted");
                true
            }
            _ => false,
        }
    }

    /// Wait for a scheduled power action, if any, to run
    pub async fn join_power(&mut self) {
        if let Some(task) = self.pending_power.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "power task failed");
                }
            }
        }
    }

    pub fn timer_active(&self) -> bool {
        self.active_timer
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    fn start_timer(&mut self, requested: Duration) {
        let duration = if requested > self.settings.max_timer {
            warn!(
                requested = requested.as_secs(),
                max = self.settings.max_timer.as_secs(),
                "timer capped"
            );
            self.settings.max_timer
        } else {
            requested
        };

        if let Some(previous) = self.active_timer.take() {
            if !previous.is_finished() {
                self.speaker
                    .say("There's already an active timer. I'll start a new one.");
                previous.abort();
            }
        }

        let speaker = Arc::clone(&self.speaker);
        self.active_timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            speaker.say(TIMER_FINISHED);
        }));
        info!(secs = duration.as_secs(), "timer started");
    }

    /// Wait for the active timer, if any, to fire
    pub async fn join_timer(&mut self) {
        if let Some(timer) = self.active_timer.take() {
            if let Err(e) = timer.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "timer task failed");
                }
            }
        }
    }

    /// Drop the active timer without firing it
    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.active_timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_services::{MockSystem, RecordingSpeaker, SystemCall};

    fn executor(speaker: &RecordingSpeaker, system: MockSystem) -> ActionExecutor {
        ActionExecutor::new(
            Arc::new(speaker.clone()),
            Arc::new(system),
            Handle::current(),
            ExecutorSettings {
                shutdown_delay: Duration::from_millis(20),
                max_timer: Duration::from_millis(50),
            },
        )
    }

    #[tokio::test]
    async fn speak_and_exit() {
        let speaker = RecordingSpeaker::new();
        let mut exec = executor(&speaker, MockSystem::new());

        assert_eq!(exec.execute(&Response::speak("hello")), Flow::Continue);
        let bye = Response::speak("Goodbye! Have a great day!").with_action(ActionTag::Exit);
        assert_eq!(exec.execute(&bye), Flow::Exit);
        assert_eq!(
            speaker.lines(),
            vec!["hello".to_string(), "Goodbye! Have a great day!".to_string()]
        );
    }

    #[tokio::test]
    async fn power_actions_wait_out_the_delay() {
        let speaker = RecordingSpeaker::new();
        let system = MockSystem::new();
        let mut exec = executor(&speaker, system.clone());
        exec.settings.shutdown_delay = Duration::from_secs(5);

        let r = Response::speak("Shutdown confirmed.").with_action(ActionTag::Shutdown);
        exec.execute(&r);
        // nothing reaches the system before the announced delay
        assert!(system.calls().is_empty());
        assert!(exec.power_pending());
        exec.cancel_scheduled_power();
    }

    #[tokio::test]
    async fn power_actions_run_immediately_after_the_delay() {
        let speaker = RecordingSpeaker::new();
        let system = MockSystem::new();
        let mut exec = executor(&speaker, system.clone());

        exec.execute(&Response::speak("Shutdown confirmed.").with_action(ActionTag::Shutdown));
        exec.join_power().await;
        exec.execute(&Response::speak("Restart confirmed.").with_action(ActionTag::Restart));
        exec.join_power().await;
        assert_eq!(
            system.calls(),
            vec![
                SystemCall::Shutdown(Duration::ZERO),
                SystemCall::Restart(Duration::ZERO),
            ]
        );
        assert_eq!(speaker.lines().len(), 2);
    }

    #[tokio::test]
    async fn cancel_inside_the_delay_aborts_the_power_action() {
        let speaker = RecordingSpeaker::new();
        let system = MockSystem::new();
        let mut exec = executor(&speaker, system.clone());
        exec.settings.shutdown_delay = Duration::from_secs(5);

        exec.execute(&Response::speak("Restart confirmed.").with_action(ActionTag::Restart));
        exec.execute(&Response::speak("Cancelling.").with_action(ActionTag::CancelOperation));
        assert!(!exec.power_pending());
        exec.join_power().await;

        assert!(system.calls().is_empty());
        assert_eq!(
            speaker.lines().last().map(String::as_str),
            Some("System operation cancelled successfully.")
        );
    }

    #[tokio::test]
    async fn failed_power_action_is_reported() {
        let speaker = RecordingSpeaker::new();
        let mut exec = executor(&speaker, MockSystem::failing());

        exec.execute(&Response::speak("Shutdown confirmed.").with_action(ActionTag::Shutdown));
        exec.join_power().await;
        exec.execute(&Response::speak("Cancelling.").with_action(ActionTag::CancelOperation));
        let lines = speaker.lines();
        assert_eq!(
            lines[1],
            "Sorry, I couldn't shutdown the system. Please do it manually."
        );
        assert_eq!(lines[3], "No pending system operations to cancel.");
    }

    #[tokio::test]
    async fn cancel_and_volume() {
        let speaker = RecordingSpeaker::new();
        let system = MockSystem::new();
        let mut exec = executor(&speaker, system.clone());

        exec.execute(&Response::speak("Cancelling.").with_action(ActionTag::CancelOperation));
        exec.execute(&Response::speak("Louder.").with_action(ActionTag::VolumeUp));
        assert_eq!(system.calls(), vec![SystemCall::CancelPending]);
        let lines = speaker.lines();
        assert_eq!(lines[1], "System operation cancelled successfully.");
        assert_eq!(lines[3], "Volume up functionality not fully implemented yet.");
    }

    #[tokio::test]
    async fn timer_fires() {
        let speaker = RecordingSpeaker::new();
        let mut exec = executor(&speaker, MockSystem::new());

        exec.execute(&Response::timer("Setting a timer for 0 seconds.", 0));
        exec.join_timer().await;
        assert_eq!(speaker.lines().last().map(String::as_str), Some(TIMER_FINISHED));
    }

    #[tokio::test]
    async fn long_timer_is_capped() {
        let speaker = RecordingSpeaker::new();
        let mut exec = executor(&speaker, MockSystem::new());

        // capped to 50ms by the test settings
        exec.execute(&Response::timer("Setting a timer for 7200 seconds.", 7200));
        let waited = tokio::time::timeout(Duration::from_secs(5), exec.join_timer()).await;
        assert!(waited.is_ok());
        assert_eq!(speaker.lines().last().map(String::as_str), Some(TIMER_FINISHED));
    }

    #[tokio::test]
    async fn new_timer_replaces_active_one() {
        let speaker = RecordingSpeaker::new();
        let mut exec = executor(&speaker, MockSystem::new());
        exec.settings.max_timer = Duration::from_secs(3600);

        exec.execute(&Response::timer("Setting a timer for 600 seconds.", 600));
        assert!(exec.timer_active());
        exec.execute(&Response::timer("Setting a timer for 0 seconds.", 0));
        exec.join_timer().await;

        let lines = speaker.lines();
        assert!(lines.contains(&"There's already an active timer. I'll start a new one.".to_string()));
        let fired = lines.iter().filter(|l| l.as_str() == TIMER_FINISHED).count();
        assert_eq!(fired, 1);
        exec.cancel_timer();
        assert!(!exec.timer_active());
    }
}
