use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::usage::{UsageRecord, UsageSummary};
use crate::tracker::clock::Clock;
use crate::tracker::identity::{FocusProbe, ForegroundIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Stopped,
    Running,
}

/// Change notifications for whoever renders the records.
#[derive(Debug, Clone, PartialEq)]
pub enum UsageEvent {
    Added { key: String },
    Updated { key: String, total: Duration },
    Cleared,
}

/// Transient state of a running monitor. Dropped on stop.
#[derive(Debug, Clone)]
struct SamplingSession {
    last_observed: Option<ForegroundIdentity>,
    last_sample: DateTime<Utc>,
}

/// Samples the focused application and credits elapsed time to it.
///
/// Each tick credits the interval since the previous sample to the identity
/// observed at the *previous* sample: the window being left gets the time,
/// not the window being entered.
pub struct UsageAccumulator<P, C> {
    probe: P,
    clock: C,
    records: Vec<UsageRecord>,
    index: HashMap<String, usize>,
    session: Option<SamplingSession>,
    events: Vec<UsageEvent>,
}

impl<P: FocusProbe, C: Clock> UsageAccumulator<P, C> {
    pub fn new(probe: P, clock: C) -> Self {
        Self {
            probe,
            clock,
            records: Vec::new(),
            index: HashMap::new(),
            session: None,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> MonitorState {
        if self.session.is_some() {
            MonitorState::Running
        } else {
            MonitorState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Begins sampling. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        let current = self.probe.current_identity();
        if let Some(identity) = &current {
            self.ensure_record(identity);
        }
        log::info!(
            "Monitoring started on {}",
            current.as_ref().map_or("<none>", |identity| identity.key.as_str())
        );

        self.session = Some(SamplingSession {
            last_observed: current,
            last_sample: self.clock.now(),
        });
        true
    }

    /// Credits the final interval and stops sampling. Returns `false` if
    /// already stopped.
    pub fn stop(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };

        let now = self.clock.now();
        if let Some(previous) = &session.last_observed {
            self.attribute(previous, now - session.last_sample);
        }
        log::info!("Monitoring stopped");
        true
    }

    /// One sampling step. Ignored while stopped.
    pub fn tick(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        let now = self.clock.now();
        let current = self.probe.current_identity();

        if let Some(previous) = &session.last_observed {
            self.attribute(previous, now - session.last_sample);
        }

        if let Some(identity) = &current {
            let switched = session.last_observed.as_ref().map(|p| &p.key) != Some(&identity.key);
            if switched {
                log::debug!("Focus moved to {} ({})", identity.key, identity.label);
            }
            self.ensure_record(identity);
        }

        self.session = Some(SamplingSession {
            last_observed: current,
            last_sample: now,
        });
    }

    /// Stops if running, then forgets every record.
    pub fn reset(&mut self) {
        self.stop();
        self.records.clear();
        self.index.clear();
        self.events.push(UsageEvent::Cleared);
        log::info!("Usage records cleared");
    }

    /// Records in the order their applications were first observed.
    pub fn records(&self) -> &[UsageRecord] {
        &self.records
    }

    pub fn record(&self, key: &str) -> Option<&UsageRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    pub fn total(&self) -> Duration {
        self.records
            .iter()
            .fold(Duration::zero(), |sum, record| sum + record.total())
    }

    /// Identity seen at the last sample while running.
    pub fn current(&self) -> Option<&ForegroundIdentity> {
        self.session.as_ref()?.last_observed.as_ref()
    }

    pub fn summaries(&self) -> Vec<UsageSummary> {
        self.records.iter().map(UsageRecord::summary).collect()
    }

    pub fn drain_events(&mut self) -> Vec<UsageEvent> {
        std::mem::take(&mut self.events)
    }

    /// Credits `elapsed` to `identity`, creating its record first if it was
    /// never registered.
    fn attribute(&mut self, identity: &ForegroundIdentity, elapsed: Duration) {
        if elapsed <= Duration::zero() {
            return;
        }
        let i = self.ensure_record(identity);
        let record = &mut self.records[i];
        if record.add(elapsed) {
            self.events.push(UsageEvent::Updated {
                key: record.key().to_string(),
                total: record.total(),
            });
        }
    }

    /// Index of the record for `identity.key`. A new record takes the label
    /// available now and keeps it for good.
    fn ensure_record(&mut self, identity: &ForegroundIdentity) -> usize {
        if let Some(&i) = self.index.get(&identity.key) {
            return i;
        }

        let i = self.records.len();
        self.records
            .push(UsageRecord::new(identity.key.clone(), identity.label.clone()));
        self.index.insert(identity.key.clone(), i);
        self.events.push(UsageEvent::Added {
            key: identity.key.clone(),
        });
        log::info!("Tracking new app: {} ({})", identity.key, identity.label);
        i
    }
}
