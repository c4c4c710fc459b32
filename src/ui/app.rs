use anyhow::{Context, Result};
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::models::usage::UsageRecord;
use crate::tracker::accumulator::{UsageAccumulator, UsageEvent};
use crate::tracker::clock::Clock;
use crate::tracker::identity::FocusProbe;
use crate::ui::icons::{AppIcon, IconCache};

const MAX_LOGS: usize = 200;
const INPUT_POLL: Duration = Duration::from_millis(50);

pub struct App<P, C> {
    pub accumulator: UsageAccumulator<P, C>,
    pub icons: IconCache,
    /// Key of the record shown in the detail pane.
    pub selected_key: Option<String>,
    pub logs: Vec<String>,
    tick_interval: Duration,
}

impl<P: FocusProbe, C: Clock> App<P, C> {
    pub fn new(accumulator: UsageAccumulator<P, C>, tick_interval: Duration) -> Self {
        Self {
            accumulator,
            icons: IconCache::new(),
            selected_key: None,
            logs: Vec::new(),
            tick_interval,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        log::info!("Starting UI...");

        let shutdown_flag = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&shutdown_flag))?;
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&shutdown_flag))?;

        enable_raw_mode().context("Terminal raw mode not supported")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(anyhow::anyhow!("Failed to setup terminal: {}", e));
        }
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                return Err(e.into());
            }
        };

        let result = self.event_loop(&mut terminal, &shutdown_flag);

        // Credit the last interval before leaving
        self.accumulator.stop();
        self.process_events();

        if let Err(e) = disable_raw_mode() {
            log::warn!("Failed to disable raw mode: {}", e);
        }
        if let Err(e) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
            log::warn!("Failed to leave alternate screen: {}", e);
        }
        if let Err(e) = terminal.show_cursor() {
            log::warn!("Failed to restore cursor: {}", e);
        }
        result
    }

    /// Draws, reads keys and ticks from one loop, so a tick never overlaps
    /// another tick or a user action.
    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        shutdown_flag: &AtomicBool,
    ) -> Result<()> {
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|f| self.draw(f))?;

            if shutdown_flag.load(Ordering::Relaxed) {
                log::info!("Received shutdown signal, exiting...");
                return Ok(());
            }

            if event::poll(INPUT_POLL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && !self.handle_key(key.code) {
                        return Ok(());
                    }
                }
            }

            if last_tick.elapsed() >= self.tick_interval {
                last_tick = Instant::now();
                self.accumulator.tick();
                self.process_events();
            }
        }
    }

    /// Applies a key press. Returns `false` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('s') => self.start(),
            KeyCode::Char('x') => self.stop(),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            _ => {}
        }
        true
    }

    pub fn start(&mut self) {
        if self.accumulator.start() {
            self.push_log("Monitoring started".to_string());
        }
        self.process_events();
    }

    pub fn stop(&mut self) {
        if self.accumulator.stop() {
            self.push_log("Monitoring stopped".to_string());
        }
        self.process_events();
    }

    /// Clears every record along with the derived icon cache and selection.
    pub fn reset(&mut self) {
        self.accumulator.reset();
        self.process_events();
        self.push_log("All usage cleared".to_string());
    }

    pub fn select_next(&mut self) {
        let records = self.accumulator.records();
        if records.is_empty() {
            return;
        }
        let next = match self.selected_index() {
            Some(i) => (i + 1).min(records.len() - 1),
            None => 0,
        };
        self.selected_key = Some(records[next].key().to_string());
    }

    pub fn select_previous(&mut self) {
        let records = self.accumulator.records();
        if records.is_empty() {
            return;
        }
        let previous = match self.selected_index() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.selected_key = Some(records[previous].key().to_string());
    }

    pub fn selected_index(&self) -> Option<usize> {
        let key = self.selected_key.as_deref()?;
        self.accumulator.records().iter().position(|r| r.key() == key)
    }

    pub fn selected_record(&self) -> Option<&UsageRecord> {
        self.accumulator.record(self.selected_key.as_deref()?)
    }

    pub fn icon(&self, key: &str) -> Option<AppIcon> {
        self.icons.get(key)
    }

    /// Reacts to accumulator notifications: resolves icons for new records,
    /// drops derived state on clear.
    pub fn process_events(&mut self) {
        for event in self.accumulator.drain_events() {
            match event {
                UsageEvent::Added { key } => {
                    self.icons.icon_for(&key);
                    let label = self
                        .accumulator
                        .record(&key)
                        .map(|r| r.display_name().to_string())
                        .unwrap_or_else(|| key.clone());
                    self.push_log(format!("New app: {}", label));
                }
                UsageEvent::Updated { key, total } => {
                    log::debug!("{} now at {}s", key, total.num_seconds());
                }
                UsageEvent::Cleared => {
                    self.icons.clear();
                    self.selected_key = None;
                }
            }
        }
    }

    fn push_log(&mut self, message: String) {
        self.logs.push(format!("[{}] {}", Local::now().format("%H:%M:%S"), message));
        if self.logs.len() > MAX_LOGS {
            let excess = self.logs.len() - MAX_LOGS;
            self.logs.drain(..excess);
        }
    }

    fn draw(&self, f: &mut Frame) {
        crate::ui::render::draw(self, f);
    }
}
