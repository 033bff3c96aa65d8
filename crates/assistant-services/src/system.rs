//! Host system control: browser and application launch, power management and
//! a short system summary.

use crate::{ControlOutcome, SystemControl, SystemError};
use std::fmt;
use std::process::{Command, ExitStatus};
use std::thread;
use std::time::Duration;
use sysinfo::System;

const GIB: u64 = 1024 * 1024 * 1024;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            _ => Platform::Linux,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PowerAction {
    Shutdown,
    Restart,
}

/// A program invocation, kept as data so it can be logged or executed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Start the program without waiting for it. A detached thread reaps the
    /// child when it exits.
    fn spawn(&self) -> Result<thread::JoinHandle<Option<ExitStatus>>, SystemError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .spawn()
            .map_err(|source| SystemError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let program = self.program.clone();
        Ok(thread::spawn(move || match child.wait() {
            Ok(status) => {
                tracing::debug!(%program, %status, "launched program exited");
                Some(status)
            }
            Err(e) => {
                tracing::warn!(%program, error = %e, "failed to reap launched program");
                None
            }
        }))
    }

    /// Run the program to completion and check its exit status
    fn run(&self) -> Result<(), SystemError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|source| SystemError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(SystemError::ExitStatus {
                program: self.program.clone(),
                status: status.to_string(),
            })
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

pub fn open_url_command(platform: Platform, url: &str) -> CommandSpec {
    match platform {
        Platform::Windows => CommandSpec::new("cmd", &["/C", "start", "", url]),
        Platform::MacOs => CommandSpec::new("open", &[url]),
        Platform::Linux => CommandSpec::new("xdg-open", &[url]),
    }
}

pub fn open_app_command(platform: Platform, app: &str) -> CommandSpec {
    match platform {
        Platform::Windows => match app.to_lowercase().as_str() {
            "notepad" | "notepad.exe" => CommandSpec::new("notepad.exe", &[]),
            "calculator" | "calc" | "calc.exe" => CommandSpec::new("calc.exe", &[]),
            "paint" | "mspaint" | "mspaint.exe" => CommandSpec::new("mspaint.exe", &[]),
            _ => CommandSpec::new("cmd", &["/C", "start", "", app]),
        },
        Platform::MacOs => CommandSpec::new("open", &["-a", app]),
        Platform::Linux => CommandSpec::new(app, &[]),
    }
}

/// Unix `shutdown` takes whole minutes; a non-zero delay rounds up so the
/// operation never starts earlier than announced.
pub fn power_command(platform: Platform, action: PowerAction, delay: Duration) -> CommandSpec {
    let secs = delay.as_secs();
    match platform {
        Platform::Windows => {
            let flag = match action {
                PowerAction::Shutdown => "/s",
                PowerAction::Restart => "/r",
            };
            CommandSpec::new("shutdown", &[flag, "/t", &secs.to_string()])
        }
        Platform::MacOs | Platform::Linux => {
            let flag = match action {
                PowerAction::Shutdown => "-h",
                PowerAction::Restart => "-r",
            };
            let when = match secs.div_ceil(60) {
                0 => "now".to_string(),
                minutes => format!("+{minutes}"),
            };
            CommandSpec::new("shutdown", &[flag, &when])
        }
    }
}

pub fn cancel_command(platform: Platform) -> CommandSpec {
    match platform {
        Platform::Windows => CommandSpec::new("shutdown", &["/a"]),
        Platform::MacOs => CommandSpec::new("killall", &["shutdown"]),
        Platform::Linux => CommandSpec::new("shutdown", &["-c"]),
    }
}

/// One-line description of the running host
pub fn describe_system() -> String {
    let os = System::name().unwrap_or_else(|| std::env::consts::OS.to_string());
    let platform = System::long_os_version().unwrap_or_else(|| "unknown".to_string());

    let mut sys = System::new();
    sys.refresh_memory();
    let total = sys.total_memory();
    if total == 0 {
        return format!("System: {os}, Platform: {platform}");
    }
    format!(
        "System: {os}, Platform: {platform}, Memory: {} of {} GB available",
        sys.available_memory() / GIB,
        total / GIB
    )
}

fn power_message(action: PowerAction, delay: Duration) -> String {
    let (future, now) = match action {
        PowerAction::Shutdown => ("shutdown", "Shutting down system now"),
        PowerAction::Restart => ("restart", "Restarting system now"),
    };
    if delay.as_secs() > 0 {
        format!("System will {future} in {} seconds", delay.as_secs())
    } else {
        now.to_string()
    }
}

fn power_failure(action: PowerAction, e: &SystemError) -> String {
    let verb = match action {
        PowerAction::Shutdown => "shutdown",
        PowerAction::Restart => "restart",
    };
    format!("Failed to {verb} system: {e}")
}

/// Executes commands on the machine the assistant runs on.
#[derive(Debug, Clone)]
pub struct HostSystem {
    platform: Platform,
}

impl HostSystem {
    pub fn new() -> Self {
        Self {
            platform: Platform::current(),
        }
    }

    fn power(&self, action: PowerAction, delay: Duration) -> ControlOutcome {
        let cmd = power_command(self.platform, action, delay);
        tracing::warn!(command = %cmd, "executing power command");
        match cmd.run() {
            Ok(()) => ControlOutcome::ok(power_message(action, delay)),
            Err(e) => ControlOutcome::failed(power_failure(action, &e)),
        }
    }
}

impl Default for HostSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemControl for HostSystem {
    fn open_url(&self, url: &str) -> ControlOutcome {
        match open_url_command(self.platform, url).spawn() {
            Ok(_) => ControlOutcome::ok(format!("Opening browser to {url}")),
            Err(e) => ControlOutcome::failed(format!("Failed to open browser: {e}")),
        }
    }

    fn open_application(&self, app: &str) -> ControlOutcome {
        match open_app_command(self.platform, app).spawn() {
            Ok(_) => ControlOutcome::ok(format!("Opening {app}")),
            Err(e) => {
                tracing::warn!(app, error = %e, "application launch failed");
                ControlOutcome::failed(format!("Failed to open {app}: {e}"))
            }
        }
    }

    fn system_info(&self) -> ControlOutcome {
        ControlOutcome::ok(describe_system())
    }

    fn shutdown(&self, delay: Duration) -> ControlOutcome {
        self.power(PowerAction::Shutdown, delay)
    }

    fn restart(&self, delay: Duration) -> ControlOutcome {
        self.power(PowerAction::Restart, delay)
    }

    fn cancel_pending(&self) -> ControlOutcome {
        match cancel_command(self.platform).run() {
            Ok(()) => ControlOutcome::ok("Pending system operation cancelled"),
            Err(e) => ControlOutcome::failed(format!("Failed to cancel operation: {e}")),
        }
    }
}

/// Logs the commands it would run instead of running them.
#[derive(Debug, Clone)]
pub struct DryRunSystem {
    platform: Platform,
}

impl DryRunSystem {
    pub fn new() -> Self {
        Self {
            platform: Platform::current(),
        }
    }
}

impl Default for DryRunSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemControl for DryRunSystem {
    fn open_url(&self, url: &str) -> ControlOutcome {
        tracing::info!(command = %open_url_command(self.platform, url), "dry run");
        ControlOutcome::ok(format!("Opening browser to {url}"))
    }

    fn open_application(&self, app: &str) -> ControlOutcome {
        tracing::info!(command = %open_app_command(self.platform, app), "dry run");
        ControlOutcome::ok(format!("Opening {app}"))
    }

    fn system_info(&self) -> ControlOutcome {
        ControlOutcome::ok(describe_system())
    }

    fn shutdown(&self, delay: Duration) -> ControlOutcome {
        let cmd = power_command(self.platform, PowerAction::Shutdown, delay);
        tracing::info!(command = %cmd, "dry run");
        ControlOutcome::ok(power_message(PowerAction::Shutdown, delay))
    }

    fn restart(&self, delay: Duration) -> ControlOutcome {
        let cmd = power_command(self.platform, PowerAction::Restart, delay);
        tracing::info!(command = %cmd, "dry run");
        ControlOutcome::ok(power_message(PowerAction::Restart, delay))
    }

    fn cancel_pending(&self) -> ControlOutcome {
        tracing::info!(command = %cancel_command(self.platform), "dry run");
        ControlOutcome::ok("Pending system operation cancelled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_commands_per_platform() {
        let five = Duration::from_secs(5);
        assert_eq!(
            power_command(Platform::Windows, PowerAction::Shutdown, five).to_string(),
            "shutdown /s /t 5"
        );
        assert_eq!(
            power_command(Platform::Linux, PowerAction::Restart, Duration::ZERO).to_string(),
            "shutdown -r now"
        );
        assert_eq!(
            power_command(Platform::MacOs, PowerAction::Shutdown, Duration::from_secs(120))
                .to_string(),
            "shutdown -h +2"
        );
    }

    #[test]
    fn sub_minute_delay_is_not_immediate_on_unix() {
        let five = Duration::from_secs(5);
        for platform in [Platform::Linux, Platform::MacOs] {
            let cmd = power_command(platform, PowerAction::Shutdown, five).to_string();
            assert_ne!(cmd, "shutdown -h now");
            assert_eq!(cmd, "shutdown -h +1");
        }
        assert_eq!(
            power_command(Platform::Linux, PowerAction::Restart, Duration::from_secs(61))
                .to_string(),
            "shutdown -r +2"
        );
    }

    #[cfg(unix)]
    #[test]
    fn launched_programs_are_reaped() -> Result<(), SystemError> {
        let reaper = CommandSpec::new("true", &[]).spawn()?;
        let status = reaper.join().ok().flatten();
        assert_eq!(status.map(|s| s.success()), Some(true));
        Ok(())
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let result = CommandSpec::new("definitely-not-a-real-program-xyz", &[]).spawn();
        assert!(matches!(result, Err(SystemError::Spawn { .. })));
    }

    #[test]
    fn windows_apps_map_to_executables() {
        assert_eq!(
            open_app_command(Platform::Windows, "Calculator").program,
            "calc.exe"
        );
        assert_eq!(
            open_app_command(Platform::MacOs, "word").to_string(),
            "open -a word"
        );
        assert_eq!(open_app_command(Platform::Linux, "paint").program, "paint");
    }

    #[test]
    fn cancel_commands_per_platform() {
        assert_eq!(cancel_command(Platform::Windows).to_string(), "shutdown /a");
        assert_eq!(cancel_command(Platform::MacOs).to_string(), "killall shutdown");
        assert_eq!(cancel_command(Platform::Linux).to_string(), "shutdown -c");
    }

    #[test]
    fn dry_run_reports_success_without_acting() {
        let sys = DryRunSystem::new();
        let outcome = sys.shutdown(Duration::from_secs(5));
        assert!(outcome.success);
        assert_eq!(outcome.message, "System will shutdown in 5 seconds");
        assert_eq!(sys.open_application("notepad").message, "Opening notepad");
    }

    #[test]
    fn system_summary_names_the_os() {
        assert!(describe_system().starts_with("System: "));
    }
}
