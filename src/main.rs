mod config;
mod daemon;
mod models;
mod tracker;
mod ui;


use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command, value_parser};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::config::settings::Settings;
use crate::daemon::{Daemon, write_summary};
use crate::tracker::accumulator::UsageAccumulator;
use crate::tracker::clock::SystemClock;
use crate::tracker::monitor::AppMonitor;
use crate::ui::app::App;

/// A writer that flushes after every write to ensure logs appear immediately
struct FlushingWriter {
    inner: Arc<Mutex<File>>,
}

impl FlushingWriter {
    fn new(file: File) -> Self {
        Self {
            inner: Arc::new(Mutex::new(file)),
        }
    }
}

impl Write for FlushingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        let written = file.write(buf)?;
        file.flush()?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?
            .flush()
    }
}

fn cli() -> Command {
    Command::new("deskwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Measure how long each application keeps input focus")
        .arg(
            Arg::new("interval-ms")
                .long("interval-ms")
                .value_name("MS")
                .help("Sampling interval in milliseconds (overrides DESKWATCH_TICK_MS)")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("headless")
                .long("headless")
                .help("Track without the terminal UI; print totals on Ctrl+C")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the headless summary as JSON")
                .action(clap::ArgAction::SetTrue),
        )
}

fn apply_cli(settings: &mut Settings, matches: &ArgMatches) -> Result<()> {
    if let Some(&ms) = matches.get_one::<u64>("interval-ms") {
        settings.set_tick_ms(ms)?;
    }
    settings.headless = matches.get_flag("headless");
    settings.json_summary = matches.get_flag("json");
    Ok(())
}

fn init_logging(settings: &Settings) -> Result<()> {
    if settings.debug_logs {
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&settings.log_file)
            .with_context(|| format!("Failed to open log file {}", settings.log_file.display()))?;

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("deskwatch=debug"))
            .target(env_logger::Target::Pipe(Box::new(FlushingWriter::new(log_file))))
            .init();

        log::info!("=== DEBUG LOGGING ENABLED ===");
        log::info!("Writing logs to {}", settings.log_file.display());
    } else if settings.headless {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("deskwatch=info")).init();
    } else {
        // The terminal belongs to the UI
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let mut settings = Settings::new()?;
    apply_cli(&mut settings, &matches)?;
    init_logging(&settings)?;

    log::info!("Starting DeskWatch");
    let accumulator = UsageAccumulator::new(AppMonitor::new(), SystemClock);

    if settings.headless {
        let mut daemon = Daemon::new(accumulator, settings.tick_interval);
        let summaries = daemon.run().await?;
        write_summary(&mut io::stdout().lock(), &summaries, settings.json_summary)?;
    } else {
        let mut app = App::new(accumulator, settings.tick_interval);
        app.run().await?;
    }

    Ok(())
}
