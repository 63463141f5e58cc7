//! Throttle delay for the admission loop.

use std::time::Duration;

/// Delay counter, in units, grown on every throttled tick:
/// `next = current + (current + 1) * 2`, so 0, 2, 8, 26, 80, ...
///
/// Reset to zero whenever a record is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    units: u64,
    unit: Duration,
    max_units: Option<u64>,
}

impl Backoff {
    pub fn new(unit: Duration, max_units: Option<u64>) -> Self {
        Self {
            units: 0,
            unit,
            max_units,
        }
    }

    /// Current delay in units.
    pub fn units(&self) -> u64 {
        self.units
    }

    /// Grows the counter and returns the delay to wait before resampling.
    pub fn grow(&mut self) -> Duration {
        let next = self
            .units
            .saturating_add(self.units.saturating_add(1).saturating_mul(2));
        self.units = match self.max_units {
            Some(cap) => next.min(cap),
            None => next,
        };
        self.delay()
    }

    pub fn reset(&mut self) {
        self.units = 0;
    }

    pub fn delay(&self) -> Duration {
        let units = u32::try_from(self.units).unwrap_or(u32::MAX);
        self.unit.saturating_mul(units)
    }
}
