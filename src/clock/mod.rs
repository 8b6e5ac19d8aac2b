//! Vector clock state and the causal join rule
//!
//! A clock is one counter per participating node. Local events raise the
//! node's own slot; received clocks are joined in with a slot-wise
//! maximum. Counters only ever move forward.

use std::fmt;

use crate::core::{Error, ProcessId, Result};

/// Per-node array of event counters deriving a partial causal order
///
/// The width is a compile-time parameter, so two clocks of different
/// widths can never meet in a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorClock<const N: usize> {
    counters: [u32; N],
}

impl<const N: usize> VectorClock<N> {
    /// Creates a zeroed clock
    pub fn new() -> Self {
        VectorClock { counters: [0; N] }
    }

    /// Number of counter slots
    pub const fn width(&self) -> usize {
        N
    }

    /// Counter for one process id, if the id is in range
    pub fn get(&self, id: ProcessId) -> Option<u32> {
        self.counters.get(id.index()).copied()
    }

    /// All counters in slot order
    pub fn counters(&self) -> &[u32; N] {
        &self.counters
    }

    /// Records a local event for `id`
    ///
    /// Saturates at `u32::MAX`: wrapping would roll the slot backwards and
    /// corrupt the causal order for every peer. Returns the updated clock.
    pub fn increment(&mut self, id: ProcessId) -> Result<&Self> {
        let slot = self.counters.get_mut(id.index()).ok_or_else(|| {
            Error::invalid_state(format!("process id {} out of range for width {}", id, N))
        })?;
        *slot = slot.saturating_add(1);
        Ok(self)
    }

    /// Joins a received clock into this one: slot-wise maximum
    ///
    /// After the call this clock dominates everything the received clock
    /// had observed. A received counter lower than the local one is simply
    /// ignored for that slot.
    pub fn merge(&mut self, received: &VectorClock<N>) {
        for (slot, other) in self.counters.iter_mut().zip(received.counters.iter()) {
            *slot = (*slot).max(*other);
        }
    }

    /// True when every slot is at least as large as `other`'s
    pub fn dominates(&self, other: &VectorClock<N>) -> bool {
        self.counters
            .iter()
            .zip(other.counters.iter())
            .all(|(a, b)| a >= b)
    }
}

impl<const N: usize> Default for VectorClock<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> From<[u32; N]> for VectorClock<N> {
    fn from(counters: [u32; N]) -> Self {
        VectorClock { counters }
    }
}

impl<const N: usize> fmt::Display for VectorClock<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, counter) in self.counters.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", counter)?;
        }
        write!(f, "]")
    }
}
