//! Attachment to a linear memory and growth tracking
//!
//! Reads and writes live in [`super::reader`] and [`super::writer`]; this
//! file owns the handle and keeps the observed size in step with the
//! instance's grow operation.

use super::linear::SharedMemory;
use crate::core::format_bytes;
use crate::core::types::{MemoryError, MemoryResult};
use tracing::{debug, info, warn};

/// Notification delivered to grow listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowEvent {
    pub previous_size: usize,
    pub new_size: usize,
    /// Number of growths observed since attach, this one included
    pub generation: u64,
}

/// Callback invoked synchronously on every observed growth
pub type GrowListener = Box<dyn FnMut(&GrowEvent) + Send>;

/// Bounds-checked typed view over an attached linear memory
///
/// The view never stores a slice of the memory. Every access locks the
/// handle and borrows the buffer for the duration of that access only.
#[derive(Default)]
pub struct MemoryView {
    handle: Option<SharedMemory>,
    size: usize,
    generation: u64,
    listeners: Vec<GrowListener>,
}

impl MemoryView {
    /// Creates a detached view
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a view already attached to `handle`
    pub fn attached(handle: SharedMemory) -> MemoryResult<Self> {
        let mut view = Self::new();
        view.attach(handle)?;
        Ok(view)
    }

    /// Binds the view to an instance's memory.
    ///
    /// Returns `false` without rebinding when a memory is already attached.
    pub fn attach(&mut self, handle: SharedMemory) -> MemoryResult<bool> {
        if self.handle.is_some() {
            warn!("Linear memory already attached, ignoring attach request");
            return Ok(false);
        }

        let size = handle
            .lock()
            .map_err(|_| MemoryError::LockPoisoned)?
            .size();
        self.handle = Some(handle);
        self.size = size;
        self.generation = 0;
        info!("Attached to linear memory ({})", format_bytes(size));
        Ok(true)
    }

    /// Unbinds the view, returning the previous handle
    pub fn detach(&mut self) -> Option<SharedMemory> {
        let handle = self.handle.take();
        if handle.is_some() {
            info!("Detached from linear memory");
        }
        self.size = 0;
        handle
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    /// Size in bytes as of the last attach or grow notification
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of growths observed since attach
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Registers a callback fired after every observed growth
    pub fn on_grow(&mut self, listener: GrowListener) {
        self.listeners.push(listener);
    }

    /// Records that the instance's memory now spans `new_size` bytes.
    ///
    /// Must be called by whoever grows the memory before the next access.
    pub fn notify_grow(&mut self, new_size: usize) {
        let event = GrowEvent {
            previous_size: self.size,
            new_size,
            generation: self.generation + 1,
        };
        self.size = new_size;
        self.generation = event.generation;
        info!("Memory resized to {}", format_bytes(new_size));

        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    /// Grows the attached memory by `delta_pages` and observes the result.
    ///
    /// This is the wrapped grow entry point: listeners have run by the time
    /// it returns. Returns the previous page count.
    pub fn grow(&mut self, delta_pages: u32) -> MemoryResult<u32> {
        let (previous, new_size) = {
            let handle = self.handle.as_ref().ok_or(MemoryError::NotInitialized)?;
            let mut memory = handle.lock().map_err(|_| MemoryError::LockPoisoned)?;
            let previous = memory.grow(delta_pages)?;
            (previous, memory.size())
        };
        self.notify_grow(new_size);
        Ok(previous)
    }

    /// Picks up a size change made without a notification
    pub fn refresh(&mut self) -> MemoryResult<usize> {
        let live = self.with_bytes(|bytes| bytes.len())?;
        if live != self.size {
            debug!(observed = self.size, live, "Unannounced memory size change");
            self.notify_grow(live);
        }
        Ok(live)
    }

    /// Runs `f` against the current buffer while holding the memory lock
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> MemoryResult<R> {
        let handle = self.handle.as_ref().ok_or(MemoryError::NotInitialized)?;
        let memory = handle.lock().map_err(|_| MemoryError::LockPoisoned)?;
        Ok(f(memory.bytes()))
    }

    /// Runs `f` against the current buffer mutably while holding the memory lock
    pub fn with_bytes_mut<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> MemoryResult<R> {
        let handle = self.handle.as_ref().ok_or(MemoryError::NotInitialized)?;
        let mut memory = handle.lock().map_err(|_| MemoryError::LockPoisoned)?;
        Ok(f(memory.bytes_mut()))
    }
}

impl std::fmt::Debug for MemoryView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryView")
            .field("attached", &self.handle.is_some())
            .field("size", &self.size)
            .field("generation", &self.generation)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
