//! Single entry point bundling the memory view, scan session, watches and clock
//!
//! UIs drive everything through [`Inspector`]: attach an instance's memory,
//! forward its grow notifications, run scans and narrowing steps, manage
//! watches and change the game speed.

use crate::clock::{Clock, SystemClock, VirtualClock};
use crate::config::Config;
use crate::core::format_bytes;
use crate::core::types::{
    parse_number, Address, Comparison, MemoryError, MemoryResult, MemoryValue, ScanCandidate,
    ScanSession, ValueType,
};
use crate::memory::{
    narrow, scan, GrowListener, MemoryView, ScanCancel, ScanOptions, ScanReport, SharedMemory,
};
use crate::watch::{Watch, WatchRegistry};
use std::cell::Cell;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Memory scanner, watch list and virtual clock for one monitored instance
pub struct Inspector<C: Clock = SystemClock> {
    view: MemoryView,
    session: ScanSession,
    watches: WatchRegistry,
    clock: Arc<VirtualClock<C>>,
    options: ScanOptions,
    cancel: ScanCancel,
    display_limit: usize,
    autopause: bool,
    /// Set while the clock is frozen by auto-pause rather than by the user
    auto_paused: Cell<bool>,
}

impl Inspector<SystemClock> {
    /// Creates a detached inspector over the host monotonic clock
    pub fn new(config: &Config) -> MemoryResult<Self> {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> Inspector<C> {
    /// Creates a detached inspector whose virtual clock scales `source`
    pub fn with_clock(config: &Config, source: C) -> MemoryResult<Self> {
        let clock = VirtualClock::with_rate(source, config.clock.default_rate)?;
        let cancel = ScanCancel::new();
        let mut options = config.scanner.scan_options();
        options.cancel = Some(cancel.clone());

        Ok(Inspector {
            view: MemoryView::new(),
            session: ScanSession::new(),
            watches: WatchRegistry::new(),
            clock: Arc::new(clock),
            options,
            cancel,
            display_limit: config.scanner.display_limit,
            autopause: config.clock.autopause,
            auto_paused: Cell::new(false),
        })
    }

    // --- attachment -----------------------------------------------------

    /// Binds to an instance's memory; a second call is ignored
    pub fn attach(&mut self, handle: SharedMemory) -> MemoryResult<bool> {
        self.view.attach(handle)
    }

    /// Unbinds the memory and clears the scan session. Watches are kept.
    pub fn detach(&mut self) -> Option<SharedMemory> {
        self.session.reset();
        self.view.detach()
    }

    pub fn is_attached(&self) -> bool {
        self.view.is_attached()
    }

    /// Observed memory size in bytes
    pub fn memory_size(&self) -> usize {
        self.view.size()
    }

    /// Grow notification from the instance; must precede the next access
    pub fn on_grow(&mut self, new_size: usize) {
        self.view.notify_grow(new_size);
    }

    /// Registers a callback run after every observed growth
    pub fn subscribe_grow(&mut self, listener: GrowListener) {
        self.view.on_grow(listener);
    }

    /// Grows the attached memory through the wrapped entry point
    pub fn grow(&mut self, delta_pages: u32) -> MemoryResult<u32> {
        self.view.grow(delta_pages)
    }

    pub fn view(&self) -> &MemoryView {
        &self.view
    }

    // --- typed access ---------------------------------------------------

    pub fn read(&self, address: Address, value_type: ValueType) -> MemoryResult<MemoryValue> {
        self.view.read(address, value_type)
    }

    pub fn write(&self, address: Address, value: MemoryValue) -> MemoryResult<()> {
        self.view.write(address, value)
    }

    /// Parses `literal` into `value_type` and writes it
    pub fn write_literal(
        &self,
        address: Address,
        literal: &str,
        value_type: ValueType,
    ) -> MemoryResult<MemoryValue> {
        self.view.write_literal(address, literal, value_type)
    }

    // --- scanning -------------------------------------------------------

    /// First scan over the whole memory
    pub fn scan(
        &mut self,
        literal: &str,
        value_type: ValueType,
        comparison: Comparison,
    ) -> MemoryResult<ScanReport> {
        let literal = query_literal(literal, comparison)?;
        self.view.refresh()?;
        self.cancel.clear();
        let report = scan(
            &self.view,
            &mut self.session,
            literal,
            value_type,
            comparison,
            &self.options,
        )?;
        info!("Found {} results", report.results);
        Ok(report)
    }

    /// Narrowing step over the current candidates
    pub fn narrow(&mut self, literal: &str, comparison: Comparison) -> MemoryResult<ScanReport> {
        let literal = query_literal(literal, comparison)?;
        self.cancel.clear();
        let report = narrow(
            &self.view,
            &mut self.session,
            literal,
            comparison,
            &self.options,
        )?;
        info!("Found {} results", report.results);
        Ok(report)
    }

    /// Clears candidates and history
    pub fn reset(&mut self) {
        self.session.reset();
        debug!("Scan session reset");
    }

    /// Flag that interrupts a running scan from another thread
    pub fn cancel_handle(&self) -> ScanCancel {
        self.cancel.clone()
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    pub fn candidates(&self) -> &[ScanCandidate] {
        self.session.candidates()
    }

    /// Candidates limited to the configured display limit
    pub fn preview(&self) -> &[ScanCandidate] {
        self.session.preview(self.display_limit)
    }

    // --- watches --------------------------------------------------------

    pub fn add_watch(
        &mut self,
        address: Address,
        description: impl Into<String>,
        value_type: ValueType,
    ) -> Watch {
        self.watches
            .add(&self.view, address, description, value_type)
    }

    /// Promotes the candidate at `index` to a watch, keeping its type
    pub fn watch_candidate(
        &mut self,
        index: usize,
        description: impl Into<String>,
    ) -> MemoryResult<Watch> {
        let candidates = self.session.candidates();
        let candidate = *candidates
            .get(index)
            .ok_or(MemoryError::CandidateNotFound {
                index,
                count: candidates.len(),
            })?;
        Ok(self.add_watch(candidate.address, description, candidate.value_type))
    }

    pub fn remove_watch(&mut self, address: Address) -> Option<Watch> {
        self.watches.remove(address)
    }

    /// Watches with freshly read values, in unspecified order
    pub fn list_watches(&self) -> Vec<Watch> {
        self.watches.list(&self.view)
    }

    /// Writes `literal` through the watch's type
    pub fn edit_watch(&self, address: Address, literal: &str) -> MemoryResult<MemoryValue> {
        self.watches.write(&self.view, address, literal)
    }

    pub fn watches(&self) -> &WatchRegistry {
        &self.watches
    }

    // --- clock ----------------------------------------------------------

    /// Virtual time presented to the instance
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Sets the rate chosen by the user; it outlasts any auto-pause in progress
    pub fn set_rate(&self, rate: f64) -> MemoryResult<()> {
        self.clock.set_rate(rate)?;
        self.auto_paused.set(false);
        Ok(())
    }

    pub fn rate(&self) -> f64 {
        self.clock.rate()
    }

    pub fn pause(&self) {
        self.clock.pause();
        self.auto_paused.set(false);
    }

    pub fn resume(&self) {
        self.clock.resume();
        self.auto_paused.set(false);
    }

    /// Clock handle to hand to timer-driven code in place of the host clock
    pub fn clock(&self) -> Arc<VirtualClock<C>> {
        Arc::clone(&self.clock)
    }

    pub fn set_autopause(&mut self, enabled: bool) {
        self.autopause = enabled;
    }

    pub fn autopause(&self) -> bool {
        self.autopause
    }

    /// The user started interacting with the inspector; pauses if auto-pause is on
    pub fn interaction_started(&self) {
        if self.autopause && !self.clock.is_paused() {
            self.clock.pause();
            self.auto_paused.set(true);
        }
    }

    /// The user stopped interacting. Only a pause made by
    /// [`interaction_started`](Self::interaction_started) is lifted.
    pub fn interaction_ended(&self) {
        if self.auto_paused.replace(false) {
            self.clock.resume();
        }
    }

    // --- presentation ---------------------------------------------------

    /// One-line connection status
    pub fn status(&self) -> String {
        if self.view.is_attached() {
            format!(
                "Connected to linear memory ({})",
                format_bytes(self.view.size())
            )
        } else {
            "Waiting for linear memory...".to_string()
        }
    }
}

/// Literal operand for a query; only required by literal comparisons
fn query_literal(literal: &str, comparison: Comparison) -> MemoryResult<Option<f64>> {
    if comparison.requires_literal() {
        parse_number(literal).map(Some)
    } else {
        Ok(parse_number(literal).ok())
    }
}
