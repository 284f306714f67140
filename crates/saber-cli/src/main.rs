use std::{
    io::BufRead,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use saber_core::MatchSettings;
use saber_executor::{ControlMsg, Executor, ExecutorHandle, LandmarkSource};
use tokio::sync::broadcast;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod hud;
mod mock_sensor;
mod replay_sensor;

use hud::Hud;
use mock_sensor::MockSensor;
use replay_sensor::ReplaySensor;

#[derive(Debug, Clone, ValueEnum)]
pub(crate) enum SensorType {
    Mock,
    Replay,
}

#[derive(Debug, Parser)]
#[command(name = "saber-cli")]
pub(crate) struct Args {
    #[clap(long, short, default_value = "mock")]
    sensor: SensorType,

    /// JSON-lines file of sensor frames, for `--sensor replay`
    #[clap(long)]
    replay_file: Option<PathBuf>,

    #[clap(long, default_value = "1")]
    seed: u64,

    #[clap(long, short = 'f', default_value = "saber-settings.json")]
    settings_file: PathBuf,

    #[clap(long, default_value = "info")]
    log_level: String,

    #[clap(long, default_value = "auto")]
    log_file: String,
}

fn log_file_path(arg: &str) -> Result<PathBuf> {
    if arg != "auto" {
        let path = PathBuf::from(arg);
        if path.exists() {
            bail!("Log file already exists: {}", path.display());
        }
        return Ok(path);
    }

    let time = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let filename = format!("saber-{time}.log");
    let path = dirs::data_local_dir()
        .map(|p| p.join("saber").join(&filename))
        .unwrap_or_else(|| PathBuf::from(&filename));
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    Ok(path)
}

/// Human-readable logs on stdout, JSON logs in a file. Records from the `log` facade
/// are forwarded as well.
fn setup_logging(args: &Args) -> Result<WorkerGuard> {
    let path = log_file_path(&args.log_file)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let Some(file_name) = path.file_name() else {
        bail!("Invalid log file path: {}", path.display());
    };
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(appender);

    let log_level = tracing::Level::from_str(&args.log_level)
        .map_err(|_| anyhow::anyhow!("Invalid log level: {}", args.log_level))?;
    let stdout_layer = fmt::Subscriber::builder()
        .with_max_level(log_level)
        .without_time()
        .finish();
    let logfile_layer = fmt::Layer::default()
        .json()
        .with_ansi(false)
        .with_writer(non_blocking_appender);
    stdout_layer
        .with(logfile_layer)
        .try_init()
        .context("Unable to set global tracing subscriber")?;

    tracing::info!("Saving logs to {}", path.display());
    Ok(guard)
}

/// Read `reset` / `quit` commands from stdin.
///
/// Runs on a plain thread: a blocking stdin read must not hold up runtime shutdown.
fn spawn_stdin_commands(handle: ExecutorHandle, stop_tx: broadcast::Sender<()>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match line.trim() {
                "reset" => handle.send(ControlMsg::Reset),
                "quit" | "exit" => {
                    stop_tx.send(()).ok();
                    break;
                }
                "" => {}
                other => tracing::warn!("Unknown command: {} (try `reset` or `quit`)", other),
            }
        }
    });
}

fn spawn_hud(mut handle: ExecutorHandle) {
    tokio::spawn(async move {
        let mut hud = Hud::default();
        while let Some(output) = handle.recv().await {
            for line in hud.update(&output) {
                println!("{}", line);
            }
        }
    });
}

async fn run_session<S: LandmarkSource>(
    settings: &MatchSettings,
    source: S,
    stop_tx: broadcast::Sender<()>,
) -> Result<()> {
    let mut executor = Executor::new(settings, source)?;
    let stop_rx = stop_tx.subscribe();

    spawn_hud(executor.handle());
    spawn_stdin_commands(executor.handle(), stop_tx.clone());
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutting down");
                stop_tx.send(()).ok();
            }
            Err(err) => tracing::error!("Failed to listen for ctrl-c: {}", err),
        }
    });

    executor.run(stop_rx).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = setup_logging(&args)?;

    let settings = MatchSettings::load_or_insert(&args.settings_file).with_context(|| {
        format!(
            "Failed to load settings from {}",
            args.settings_file.display()
        )
    })?;

    let (stop_tx, _) = broadcast::channel(1);
    match args.sensor {
        SensorType::Mock => {
            tracing::info!("Using mock sensor (seed {})", args.seed);
            run_session(&settings, MockSensor::new(args.seed), stop_tx).await
        }
        SensorType::Replay => {
            let Some(path) = args.replay_file.as_deref() else {
                bail!("--replay-file is required with --sensor replay");
            };
            let sensor = ReplaySensor::open(path)
                .await
                .context("Sensor initialization failed")?;
            run_session(&settings, sensor, stop_tx).await
        }
    }
}
