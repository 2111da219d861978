//! The monitored instance's linear memory
//!
//! The instance owns its memory; the inspector only ever sees it through a
//! [`SharedMemory`] handle. A grow may hand back a completely different
//! backing buffer, so nothing here ever lends out a slice that outlives the
//! lock guard it came from.

use crate::core::types::{MemoryError, MemoryResult, MAX_PAGES, PAGE_SIZE};
use std::sync::{Arc, Mutex};

/// A growable byte buffer backing a WebAssembly instance
pub trait LinearMemory: Send {
    /// Current contents. Only valid until the next `grow`.
    fn bytes(&self) -> &[u8];

    /// Mutable contents. Only valid until the next `grow`.
    fn bytes_mut(&mut self) -> &mut [u8];

    /// Grows by `delta_pages` pages and returns the previous page count
    fn grow(&mut self, delta_pages: u32) -> MemoryResult<u32>;

    /// Current size in bytes
    fn size(&self) -> usize {
        self.bytes().len()
    }

    /// Current size in whole pages
    fn page_count(&self) -> u32 {
        (self.size() / PAGE_SIZE) as u32
    }
}

/// Opaque handle to an instance's memory, as passed to `attach`
pub type SharedMemory = Arc<Mutex<dyn LinearMemory>>;

/// Wraps a memory into a shareable handle
pub fn share<M: LinearMemory + 'static>(memory: M) -> SharedMemory {
    Arc::new(Mutex::new(memory))
}

/// In-process linear memory backed by a `Vec<u8>`
///
/// `grow` allocates a new buffer and copies the old contents over, the same
/// way a runtime may relocate memory when it grows.
#[derive(Debug, Clone)]
pub struct VecMemory {
    data: Vec<u8>,
    max_pages: u32,
}

impl VecMemory {
    /// Creates a zeroed memory of `initial_pages` pages
    pub fn new(initial_pages: u32, max_pages: u32) -> MemoryResult<Self> {
        let max_pages = max_pages.min(MAX_PAGES);
        if initial_pages > max_pages {
            return Err(MemoryError::grow_failed(
                initial_pages,
                format!("initial size exceeds maximum of {} pages", max_pages),
            ));
        }
        Ok(VecMemory {
            data: vec![0u8; initial_pages as usize * PAGE_SIZE],
            max_pages,
        })
    }

    /// Wraps raw bytes, e.g. a memory dump. The length is kept as given.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        VecMemory {
            data,
            max_pages: MAX_PAGES,
        }
    }

    /// Caps further growth at `max_pages`
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.min(MAX_PAGES);
        self
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }
}

impl LinearMemory for VecMemory {
    fn bytes(&self) -> &[u8] {
        &self.data
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn grow(&mut self, delta_pages: u32) -> MemoryResult<u32> {
        let previous = self.page_count();
        let requested = previous
            .checked_add(delta_pages)
            .filter(|pages| *pages <= self.max_pages)
            .ok_or_else(|| {
                MemoryError::grow_failed(
                    delta_pages,
                    format!("would exceed maximum of {} pages", self.max_pages),
                )
            })?;

        if delta_pages == 0 {
            return Ok(previous);
        }

        let new_len = self.data.len() + delta_pages as usize * PAGE_SIZE;
        let mut relocated = Vec::with_capacity(new_len);
        relocated.extend_from_slice(&self.data);
        relocated.resize(new_len, 0);
        self.data = relocated;

        debug_assert!(self.page_count() >= requested);
        Ok(previous)
    }
}
