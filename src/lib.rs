//! vcbus: causal vector-clock messaging over a half-duplex bus
//!
//! Nodes sharing a single half-duplex bus exchange short text-framed events
//! and keep a causal ordering of those events with per-node vector clocks.
//! Because the medium supports only one active initiator at a time, every
//! node alternates between listening as a bus peripheral and driving the
//! bus as the controller; the [`node::NodeLoop`] state machine ties the
//! clock, the frame codec and the role-switching transport together.

pub mod clock;
pub mod core;
pub mod node;
pub mod protocol;
pub mod transport;
pub mod util;

// Re-export commonly used items
pub use crate::core::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
