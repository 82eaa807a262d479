// src/classify/window.rs

use ahash::AHashSet;
use std::collections::VecDeque;

/// Number of ZMW ids kept after an insert.
pub const WINDOW_SIZE: usize = 10;

/// The most recently seen ZMW ids.
///
/// Membership stands in for "seen this molecule before", which only holds
/// because input is grouped by ZMW: a molecule's reads are contiguous, so the
/// window just has to span one cluster.
#[derive(Debug, Default, Clone)]
pub struct RecencyWindow {
    order: VecDeque<String>,
    members: AHashSet<String>,
}

impl RecencyWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen_before(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Append `id` if absent, then drop the oldest entry once past `WINDOW_SIZE`.
    pub fn record(&mut self, id: &str) {
        if self.members.contains(id) {
            return;
        }
        self.order.push_back(id.to_string());
        self.members.insert(id.to_string());
        if self.order.len() > WINDOW_SIZE {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
