//! Per-slot soft limits.
//!
//! Each triplet slot carries a [`Limit`]. `low > high` is the "unhomed"
//! sentinel; a homed slot holds its rail's full travel range.
//!
//! ## Concurrency
//!
//! The motor-off handler runs on the event-dispatch thread while the planner
//! may be validating a move. The three limits are therefore stored as one
//! `Copy` value behind a lock and only ever replaced whole; readers take a
//! single [`LimitSet`] snapshot per operation.

use std::sync::Arc;

use motion_common::consts::{UNHOMED_HIGH, UNHOMED_LOW};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::axis::{Slot, Triplet};
use crate::toolhead::EventHandler;

/// Known valid travel interval of one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    pub low: f64,
    pub high: f64,
}

impl Limit {
    pub const UNHOMED: Self = Self {
        low: UNHOMED_LOW,
        high: UNHOMED_HIGH,
    };

    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    #[inline]
    pub fn is_homed(&self) -> bool {
        self.low <= self.high
    }

    #[inline]
    pub fn contains(&self, pos: f64) -> bool {
        pos >= self.low && pos <= self.high
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::UNHOMED
    }
}

impl From<(f64, f64)> for Limit {
    fn from((low, high): (f64, f64)) -> Self {
        Self { low, high }
    }
}

/// Limits of all three slots, replaced as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LimitSet(pub Triplet<Limit>);

impl LimitSet {
    pub const UNHOMED: Self = Self(Triplet([Limit::UNHOMED; 3]));

    pub fn get(&self, slot: Slot) -> Limit {
        self.0[slot]
    }

    /// Copy with one slot replaced.
    pub fn with(mut self, slot: Slot, limit: Limit) -> Self {
        self.0[slot] = limit;
        self
    }

    pub fn is_homed(&self, slot: Slot) -> bool {
        self.0[slot].is_homed()
    }
}

/// Shared owner of the limit set.
#[derive(Debug, Clone, Default)]
pub struct LimitTracker {
    inner: Arc<RwLock<LimitSet>>,
}

impl LimitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consistent copy of all three limits.
    pub fn snapshot(&self) -> LimitSet {
        *self.inner.read()
    }

    /// Every slot back to the unhomed sentinel.
    pub fn reset(&self) {
        *self.inner.write() = LimitSet::UNHOMED;
        debug!("Limits reset to unhomed");
    }

    pub fn set_limit(&self, slot: Slot, limit: Limit) {
        let mut guard = self.inner.write();
        let next = guard.with(slot, limit);
        *guard = next;
        debug!("Slot {slot:?} limit set to ({:.3}, {:.3})", limit.low, limit.high);
    }

    pub fn mark_unhomed(&self, slot: Slot) {
        self.set_limit(slot, Limit::UNHOMED);
    }

    /// Handler for [`MachineEvent::MotorOff`](crate::toolhead::MachineEvent::MotorOff).
    /// Holds its own reference to the limit set; it cannot fail.
    pub fn motor_off_handler(&self) -> EventHandler {
        let inner = Arc::clone(&self.inner);
        Box::new(move |eventtime| {
            *inner.write() = LimitSet::UNHOMED;
            info!("Motors off at {eventtime:.3}, all axes marked unhomed");
        })
    }
}
