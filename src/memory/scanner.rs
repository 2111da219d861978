//! Full-range value scans and incremental narrowing
//!
//! A first scan walks the whole linear memory in steps of the value width
//! and keeps every match, up to `max_results`. Narrowing passes revisit
//! only the surviving candidates, so each step can only shrink the set.

use super::comparator::{compare, compare_values};
use super::reader::decode_at;
use super::view::MemoryView;
use crate::core::types::{
    Address, Comparison, MemoryError, MemoryResult, ScanCandidate, ScanSession, ScanStep,
    StepKind, ValueType,
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Maximum number of candidates a first scan collects
pub const DEFAULT_MAX_RESULTS: usize = 10_000;

/// Bytes covered per lock acquisition during a first scan
pub const DEFAULT_CHUNK_SIZE: usize = 65536;

/// Shared flag that interrupts a running scan between address steps
#[derive(Debug, Clone, Default)]
pub struct ScanCancel(Arc<AtomicBool>);

impl ScanCancel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the running scan to stop at the next address step
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Re-arms the flag for the next scan
    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Options for scan and narrowing passes
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Stop a first scan once this many candidates are found
    pub max_results: usize,
    /// Bytes scanned per memory lock
    pub chunk_size: usize,
    /// Optional interruption flag
    pub cancel: Option<ScanCancel>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            max_results: DEFAULT_MAX_RESULTS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            cancel: None,
        }
    }
}

impl ScanOptions {
    fn cancelled(&self) -> bool {
        self.cancel.as_ref().map_or(false, ScanCancel::is_cancelled)
    }
}

/// Summary of a finished pass; the candidates themselves live in the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub kind: StepKind,
    pub results: usize,
    /// Addresses or candidates that could not be read
    pub skipped: usize,
    pub cancelled: bool,
    /// First scan stopped at `max_results`
    pub capped: bool,
}

enum Pass {
    Continue,
    Finished,
    Capped,
    Cancelled,
}

/// Runs a first scan over the whole memory and replaces the session's candidates.
///
/// `changed` and `unchanged` have no prior observation on a first scan and
/// therefore match nothing.
pub fn scan(
    view: &MemoryView,
    session: &mut ScanSession,
    literal: Option<f64>,
    value_type: ValueType,
    comparison: Comparison,
    options: &ScanOptions,
) -> MemoryResult<ScanReport> {
    if !view.is_attached() {
        return Err(MemoryError::NotInitialized);
    }

    let started = Instant::now();
    let width = value_type.size();
    let chunk_size = options.chunk_size.max(width);
    let mut results: Vec<ScanCandidate> = Vec::new();
    let mut address = 0usize;
    let mut skipped = 0usize;

    let outcome = if comparison.requires_previous() {
        debug!("First scan with '{}' has no prior observation", comparison);
        Pass::Finished
    } else {
        loop {
            let pass = view.with_bytes(|bytes| {
                let size = bytes.len();
                let chunk_end = address.saturating_add(chunk_size);

                while address < chunk_end {
                    if address.saturating_add(width) > size {
                        return Pass::Finished;
                    }
                    if options.cancelled() {
                        return Pass::Cancelled;
                    }

                    match decode_at(bytes, Address::new(address), value_type) {
                        Ok(value) => {
                            if compare_values(comparison, &value, literal, None) {
                                results.push(ScanCandidate::new(Address::new(address), value));
                                if results.len() >= options.max_results {
                                    return Pass::Capped;
                                }
                            }
                        }
                        Err(_) => skipped += 1,
                    }
                    address += width;
                }
                Pass::Continue
            })?;

            if !matches!(pass, Pass::Continue) {
                break pass;
            }
        }
    };

    let report = ScanReport {
        kind: StepKind::First,
        results: results.len(),
        skipped,
        cancelled: matches!(outcome, Pass::Cancelled),
        capped: matches!(outcome, Pass::Capped),
    };

    if report.capped {
        warn!(
            "First scan stopped at {} results; later matches were not collected",
            options.max_results
        );
    }
    debug!(
        results = report.results,
        skipped = report.skipped,
        cancelled = report.cancelled,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "First scan for {} {} {:?}",
        value_type,
        comparison,
        literal
    );

    session.commit(
        results,
        ScanStep {
            kind: StepKind::First,
            literal,
            value_type,
            comparison,
            results: report.results,
            cancelled: report.cancelled,
        },
    );
    Ok(report)
}

/// Re-evaluates the session's candidates and keeps only those that still match.
///
/// `changed` and `unchanged` compare against each candidate's stored value.
/// Unreadable candidates are dropped. An empty session is left untouched.
/// Candidates are visited in batches of `chunk_size / width` per lock.
pub fn narrow(
    view: &MemoryView,
    session: &mut ScanSession,
    literal: Option<f64>,
    comparison: Comparison,
    options: &ScanOptions,
) -> MemoryResult<ScanReport> {
    if session.is_empty() {
        return Ok(ScanReport {
            kind: StepKind::Narrow,
            results: 0,
            skipped: 0,
            cancelled: false,
            capped: false,
        });
    }
    if !view.is_attached() {
        return Err(MemoryError::NotInitialized);
    }

    let before = session.len();
    let value_type = session.value_type();
    let batch_len = (options.chunk_size / value_type.size()).max(1);
    let mut results = Vec::new();
    let mut skipped = 0usize;
    let mut cancelled = false;

    for batch in session.candidates().chunks(batch_len) {
        view.with_bytes(|bytes| {
            for candidate in batch {
                if options.cancelled() {
                    cancelled = true;
                    return;
                }
                match decode_at(bytes, candidate.address, candidate.value_type) {
                    Ok(current) => {
                        let previous = candidate.value.as_f64();
                        if compare(comparison, current.as_f64(), literal, Some(previous)) {
                            results.push(ScanCandidate::new(candidate.address, current));
                        }
                    }
                    Err(_) => skipped += 1,
                }
            }
        })?;
        if cancelled {
            break;
        }
    }

    let report = ScanReport {
        kind: StepKind::Narrow,
        results: results.len(),
        skipped,
        cancelled,
        capped: false,
    };
    debug!(
        before,
        after = report.results,
        dropped_unreadable = report.skipped,
        cancelled = report.cancelled,
        "Narrowed with {} {:?}",
        comparison,
        literal
    );

    session.commit(
        results,
        ScanStep {
            kind: StepKind::Narrow,
            literal,
            value_type,
            comparison,
            results: report.results,
            cancelled: report.cancelled,
        },
    );
    Ok(report)
}
