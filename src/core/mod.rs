//! Core types shared across the protocol
//!
//! This module contains the error taxonomy, node configuration and the
//! constants the rest of the library builds on.

pub mod error;
pub mod serde;
pub mod types;

pub use self::error::{Error, Result};
pub use self::types::{LoopMode, NodeConfig, ProcessId};

/// Clock width of the reference three-node bus
pub const DEFAULT_CLOCK_WIDTH: usize = 3;

/// Largest inbound frame a node will accept, matching the port's receive buffer
pub const MAX_FRAME_LEN: usize = 255;

/// Default bound on a blocking receive
pub const DEFAULT_RECEIVE_TIMEOUT_MS: u64 = 100;

/// Default bound on one addressed write transaction
pub const DEFAULT_SEND_TIMEOUT_MS: u64 = 100;

/// Default externally imposed delay between loop steps
pub const DEFAULT_STEP_DELAY_MS: u64 = 100;
