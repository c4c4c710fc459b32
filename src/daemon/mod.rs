use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

use crate::models::usage::{UsageSummary, format_duration};
use crate::tracker::accumulator::{UsageAccumulator, UsageEvent};
use crate::tracker::clock::Clock;
use crate::tracker::identity::FocusProbe;

/// Samples without a UI until told to stop, then reports the totals.
pub struct Daemon<P, C> {
    accumulator: UsageAccumulator<P, C>,
    tick_interval: Duration,
}

impl<P: FocusProbe, C: Clock> Daemon<P, C> {
    pub fn new(accumulator: UsageAccumulator<P, C>, tick_interval: Duration) -> Self {
        Self {
            accumulator,
            tick_interval,
        }
    }

    pub async fn run(&mut self) -> Result<Vec<UsageSummary>> {
        log::info!("Starting headless monitoring (tick every {:?})...", self.tick_interval);

        // Set up signal handlers for graceful shutdown
        let shutdown_flag = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&shutdown_flag))?;
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&shutdown_flag))?;

        Ok(self.run_until(&shutdown_flag).await)
    }

    /// Ticks on a fixed interval until `shutdown_flag` is raised.
    pub async fn run_until(&mut self, shutdown_flag: &AtomicBool) -> Vec<UsageSummary> {
        let mut ticker = time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick completes immediately; start() takes that sample
        ticker.tick().await;

        self.accumulator.start();
        self.log_events();

        // Flag is checked at a finer grain than the tick so shutdown stays prompt
        let mut poll = time::interval(Duration::from_millis(100).min(self.tick_interval));
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            if shutdown_flag.load(Ordering::Relaxed) {
                log::info!("Received shutdown signal, stopping...");
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    self.accumulator.tick();
                    self.log_events();
                }
                _ = poll.tick() => {}
            }
        }

        self.accumulator.stop();
        self.log_events();
        self.accumulator.summaries()
    }

    fn log_events(&mut self) {
        for event in self.accumulator.drain_events() {
            match event {
                UsageEvent::Added { key } => log::info!("Tracking new app: {}", key),
                UsageEvent::Updated { key, total } => {
                    log::debug!("{}: {}", key, format_duration(total));
                }
                UsageEvent::Cleared => log::info!("Usage cleared"),
            }
        }
    }
}

/// Writes the exit summary, as a table or as JSON.
pub fn write_summary<W: Write>(out: &mut W, summaries: &[UsageSummary], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, summaries)?;
        writeln!(out)?;
        return Ok(());
    }

    if summaries.is_empty() {
        writeln!(out, "No application usage recorded.")?;
        return Ok(());
    }

    let mut sorted: Vec<&UsageSummary> = summaries.iter().collect();
    sorted.sort_by(|a, b| b.total_seconds.cmp(&a.total_seconds));

    writeln!(out, "{:<10} {:<24} {}", "TOTAL", "PROCESS", "NAME")?;
    for summary in sorted {
        writeln!(out, "{:<10} {:<24} {}", summary.formatted, summary.key, summary.display_name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::test_support::{ManualClock, ScriptedProbe};

    fn summary(key: &str, secs: i64) -> UsageSummary {
        UsageSummary {
            key: key.to_string(),
            display_name: key.to_uppercase(),
            total_seconds: secs,
            formatted: format_duration(chrono::Duration::seconds(secs)),
        }
    }

    #[test]
    fn test_table_summary_sorted_by_total() {
        let mut out = Vec::new();
        write_summary(&mut out, &[summary("code", 60), summary("firefox", 3600)], false).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("01:00:00"));
        assert!(lines[1].contains("firefox"));
        assert!(lines[2].contains("CODE"));
    }

    #[test]
    fn test_empty_summary() {
        let mut out = Vec::new();
        write_summary(&mut out, &[], false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No application usage recorded.\n");
    }

    #[test]
    fn test_json_summary() {
        let mut out = Vec::new();
        write_summary(&mut out, &[summary("code", 5)], true).unwrap();
        let parsed: Vec<UsageSummary> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, vec![summary("code", 5)]);
    }

    #[tokio::test]
    async fn test_stops_when_flag_raised() {
        let probe = ScriptedProbe::new();
        let clock = ManualClock::new();
        probe.focus("code");
        let mut daemon = Daemon::new(
            UsageAccumulator::new(probe.clone(), clock.clone()),
            Duration::from_secs(1),
        );

        let shutdown_flag = AtomicBool::new(true);
        clock.advance_secs(2);
        let summaries = daemon.run_until(&shutdown_flag).await;

        // Raised before the first tick: start then stop with no elapsed time
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].key, "code");
        assert_eq!(summaries[0].total_seconds, 0);
    }
}
