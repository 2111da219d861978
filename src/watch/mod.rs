//! Named watches over single memory locations
//!
//! Watches are keyed by address and live independently of any scan
//! session. The value stored with a watch is only the reading taken when it
//! was added; listings always read memory again.

use crate::core::types::{Address, MemoryError, MemoryResult, MemoryValue, ValueType};
use crate::memory::MemoryView;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// A named, typed location being watched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watch {
    pub address: Address,
    pub description: String,
    pub value_type: ValueType,
    /// Reading taken when the watch was added or listed; `None` if unreadable
    pub value: Option<MemoryValue>,
}

/// Address-keyed collection of watches
#[derive(Debug, Clone, Default)]
pub struct WatchRegistry {
    watches: HashMap<Address, Watch>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a watch, replacing any existing watch at the same address
    pub fn add(
        &mut self,
        view: &MemoryView,
        address: Address,
        description: impl Into<String>,
        value_type: ValueType,
    ) -> Watch {
        let value = match view.read(address, value_type) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Watch at {} added without a reading: {}", address, e);
                None
            }
        };

        let watch = Watch {
            address,
            description: description.into(),
            value_type,
            value,
        };
        if self.watches.insert(address, watch.clone()).is_some() {
            info!("Replaced watch at {}", address);
        } else {
            info!("Added watch '{}' at {}", watch.description, address);
        }
        watch
    }

    /// Removes the watch at `address`, if any
    pub fn remove(&mut self, address: Address) -> Option<Watch> {
        let removed = self.watches.remove(&address);
        if removed.is_some() {
            info!("Removed watch at {}", address);
        }
        removed
    }

    pub fn get(&self, address: Address) -> Option<&Watch> {
        self.watches.get(&address)
    }

    /// Every watch with a fresh reading, in unspecified order
    pub fn list(&self, view: &MemoryView) -> Vec<Watch> {
        let locations: Vec<(Address, ValueType)> = self
            .watches
            .values()
            .map(|w| (w.address, w.value_type))
            .collect();
        let readings = view.read_batch(&locations).ok();

        self.watches
            .values()
            .enumerate()
            .map(|(i, watch)| Watch {
                value: readings
                    .as_ref()
                    .and_then(|r| r.get(i))
                    .and_then(|reading| reading.as_ref().ok().copied()),
                ..watch.clone()
            })
            .collect()
    }

    /// [`list`](Self::list) ordered by address
    pub fn list_sorted(&self, view: &MemoryView) -> Vec<Watch> {
        let mut watches = self.list(view);
        watches.sort_by_key(|w| w.address);
        watches
    }

    /// Writes a user literal through the watch's own type
    pub fn write(
        &self,
        view: &MemoryView,
        address: Address,
        literal: &str,
    ) -> MemoryResult<MemoryValue> {
        let watch = self
            .get(address)
            .ok_or_else(|| MemoryError::WatchNotFound(address.to_string()))?;
        view.write_literal(address, literal, watch.value_type)
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    pub fn clear(&mut self) {
        self.watches.clear();
    }
}
