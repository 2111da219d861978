//! Scaled and pausable view of a monotonic clock

use super::{Clock, SystemClock};
use crate::core::types::{MemoryError, MemoryResult};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy)]
struct ClockState {
    /// Source time at the last rate change
    real_anchor: Duration,
    /// Virtual time at the last rate change
    virtual_anchor: Duration,
    rate: f64,
    /// Rate restored by `resume`
    resume_rate: f64,
}

impl ClockState {
    fn virtual_at(&self, real: Duration) -> Duration {
        let elapsed = real.saturating_sub(self.real_anchor).as_nanos() as f64;
        let scaled = (elapsed * self.rate).round();
        let scaled = if scaled >= u64::MAX as f64 {
            u64::MAX
        } else {
            scaled as u64
        };
        self.virtual_anchor
            .saturating_add(Duration::from_nanos(scaled))
    }
}

/// Affine transform of a source clock: `virtual = anchor + (real - real_anchor) * rate`
///
/// Rate changes re-anchor at the current instant so virtual time never
/// jumps; only its slope changes. A rate of 0 freezes it.
#[derive(Debug)]
pub struct VirtualClock<C = SystemClock> {
    source: C,
    state: Mutex<ClockState>,
}

impl VirtualClock<SystemClock> {
    /// Virtual clock over the host monotonic clock at rate 1
    pub fn system() -> Self {
        Self::new(SystemClock::new())
    }
}

impl<C: Clock> VirtualClock<C> {
    /// Starts in step with `source` at rate 1
    pub fn new(source: C) -> Self {
        let start = source.now();
        VirtualClock {
            source,
            state: Mutex::new(ClockState {
                real_anchor: start,
                virtual_anchor: start,
                rate: 1.0,
                resume_rate: 1.0,
            }),
        }
    }

    /// Starts in step with `source` at `rate`
    pub fn with_rate(source: C, rate: f64) -> MemoryResult<Self> {
        let clock = Self::new(source);
        clock.set_rate(rate)?;
        Ok(clock)
    }

    fn state(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current multiplier
    pub fn rate(&self) -> f64 {
        self.state().rate
    }

    pub fn is_paused(&self) -> bool {
        self.rate() == 0.0
    }

    /// Changes the rate without a discontinuity.
    ///
    /// Virtual time at this instant is computed with the old rate before the
    /// anchors move; both use the same source reading.
    pub fn set_rate(&self, rate: f64) -> MemoryResult<()> {
        if !(rate.is_finite() && rate >= 0.0) {
            return Err(MemoryError::InvalidRate(rate));
        }

        let mut state = self.state();
        let real = self.source.now();
        let virtual_now = state.virtual_at(real);
        let previous = state.rate;

        state.real_anchor = real;
        state.virtual_anchor = virtual_now;
        state.rate = rate;
        if rate > 0.0 {
            state.resume_rate = rate;
        }
        drop(state);

        info!(
            "Clock rate {} -> {} at {:.3} ms",
            previous,
            rate,
            virtual_now.as_secs_f64() * 1000.0
        );
        Ok(())
    }

    /// Freezes virtual time, remembering the current rate for `resume`
    pub fn pause(&self) {
        // 0 always passes validation
        let _ = self.set_rate(0.0);
    }

    /// Restores the last non-zero rate
    pub fn resume(&self) {
        let rate = self.state().resume_rate;
        let _ = self.set_rate(rate);
    }
}

impl<C: Clock> Clock for VirtualClock<C> {
    fn now(&self) -> Duration {
        let state = self.state();
        state.virtual_at(self.source.now())
    }
}
