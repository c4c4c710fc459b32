//! Deterministic stand-ins for the OS focus query and the wall clock.
//!
//! Both doubles are cheap handles over shared state, so a test keeps one clone
//! to drive the script while the accumulator owns the other.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::tracker::clock::Clock;
use crate::tracker::identity::{FocusProbe, ForegroundIdentity};

#[derive(Debug, Clone, Default)]
pub struct ScriptedProbe {
    current: Rc<RefCell<Option<ForegroundIdentity>>>,
    queries: Rc<Cell<usize>>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus `key`, labelled with the key itself.
    pub fn focus(&self, key: &str) {
        self.focus_labelled(key, key);
    }

    pub fn focus_labelled(&self, key: &str, label: &str) {
        *self.current.borrow_mut() = Some(ForegroundIdentity::new(key, label));
    }

    /// Simulate an identification failure.
    pub fn lose_focus(&self) {
        *self.current.borrow_mut() = None;
    }

    pub fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl FocusProbe for ScriptedProbe {
    fn current_identity(&self) -> Option<ForegroundIdentity> {
        self.queries.set(self.queries.get() + 1);
        self.current.borrow().clone()
    }
}

#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Starts at a fixed instant so every run sees the same timeline.
    pub fn new() -> Self {
        let epoch = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        Self {
            now: Rc::new(Cell::new(epoch)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
