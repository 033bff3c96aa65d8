//! Jarvis desktop assistant
//!
//! Typed text stands in for speech: each line read from stdin goes through
//! wake-word gating, intent classification and dispatch, and the response is
//! spoken on stdout.

mod config;
mod executor;

use anyhow::Result;
use assistant_services::plugin::{new_system_backend, SystemBackendKind};
use assistant_services::{select_weather_provider, ConsoleSpeaker, Speaker};
use clap::Parser;
use command_dispatch::{init as init_dispatch, Dispatcher, Response, Session};
use config::AssistantConfig;
use executor::{ActionExecutor, ExecutorSettings, Flow};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "jarvis")]
#[command(about = "Jarvis voice assistant (typed-text front end)")]
struct Args {
    /// Configuration file; created with defaults if missing
    #[arg(long, default_value = "jarvis.json")]
    config: PathBuf,

    /// Log system commands instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Handle a single command and exit
    #[arg(long)]
    test_command: Option<String>,

    /// Print responses as JSON instead of executing them
    #[arg(long)]
    json: bool,

    /// Accept commands without the wake word
    #[arg(long)]
    no_wake_word: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AssistantConfig::load(&args.config)?;
    config.apply_env();
    if args.no_wake_word {
        config.require_wake_word = false;
    }
    setup_tracing(&config.log_level);

    info!(config = %args.config.display(), dry_run = args.dry_run, "starting Jarvis");
    if let Err(e) = init_dispatch() {
        error!("Failed to initialize command dispatch: {}", e);
        return Err(e.into());
    }

    let backend = if args.dry_run {
        SystemBackendKind::DryRun
    } else {
        SystemBackendKind::Host
    };
    let dispatcher = Dispatcher::new(
        config.dispatcher_config(),
        select_weather_provider(&config.weather),
        new_system_backend(backend),
    )?;
    let mut session = Session::new(dispatcher, config.session_config())?;

    // Timers and delayed power actions; blocking weather lookups stay on the
    // main thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()?;

    info!(
        tts_rate = config.speech.tts_rate,
        tts_volume = config.speech.tts_volume,
        "console speech output"
    );
    let speaker: Arc<dyn Speaker> = Arc::new(ConsoleSpeaker::default());
    let mut executor = ActionExecutor::new(
        speaker,
        Arc::from(new_system_backend(backend)),
        runtime.handle().clone(),
        ExecutorSettings {
            shutdown_delay: Duration::from_secs(config.system.shutdown_delay_secs),
            max_timer: Duration::from_secs(config.system.max_timer_duration_secs),
        },
    );

    if let Some(command) = args.test_command {
        if let Some(response) = session.handle(&command) {
            if args.json {
                print_json(&response)?;
            } else {
                executor.execute(&response);
                runtime.block_on(executor.join_power());
                runtime.block_on(executor.join_timer());
            }
        }
    } else {
        run_interactive(&mut session, &mut executor, args.json)?;
        if executor.timer_active() {
            info!("discarding active timer");
        }
        executor.cancel_timer();
        if executor.power_pending() {
            info!("waiting for confirmed power action");
            runtime.block_on(executor.join_power());
        }
    }

    info!("Jarvis stopped");
    Ok(())
}

fn run_interactive(
    session: &mut Session,
    executor: &mut ActionExecutor,
    json: bool,
) -> Result<()> {
    executor.say("Jarvis is online and ready to assist you.");
    if session.config().require_wake_word {
        println!(
            "Start each command with '{}' (or 'exit' to quit):",
            session.config().wake_word
        );
    } else {
        println!("Type your commands (or 'exit' to quit):");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        print!("You: ");
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let Some(response) = session.handle(&line) else {
            continue;
        };
        if json {
            print_json(&response)?;
            if response.action == command_dispatch::ActionTag::Exit {
                break;
            }
        } else if executor.execute(&response) == Flow::Exit {
            break;
        }
    }

    Ok(())
}

fn print_json(response: &Response) -> Result<()> {
    println!("{}", serde_json::to_string(response)?);
    Ok(())
}

fn setup_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
