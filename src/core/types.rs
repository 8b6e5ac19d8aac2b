use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Stable identifier of a node on the bus
///
/// A process id doubles as the index of the node's slot in every vector
/// clock, so it must be below the configured clock width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessId(pub u32);

impl ProcessId {
    /// Creates a new process id
    pub fn new(id: u32) -> Self {
        ProcessId(id)
    }

    /// Clock slot index for this id
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Behavior of the node loop
///
/// The three behaviors share one loop; the variant is a configuration
/// choice, not separate code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMode {
    /// Retransmit inbound bytes unchanged, without touching the clock
    Echo,
    /// Merge inbound clocks but transmit nothing (pure observer)
    MergeOnly,
    /// Merge, record the local send event, transmit the updated clock
    FullCycle,
}

/// Configuration for one bus node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// This node's process id (also its clock slot)
    pub process_id: ProcessId,
    /// Loop behavior
    pub mode: LoopMode,
    /// Bound on one blocking receive; expiry is idle, not an error
    #[serde(serialize_with = "super::serde::serialize_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_duration")]
    pub receive_timeout: Duration,
    /// Bound on one addressed write transaction
    #[serde(serialize_with = "super::serde::serialize_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_duration")]
    pub send_timeout: Duration,
    /// Externally imposed delay between loop steps (idle polling, not busy-spin)
    #[serde(serialize_with = "super::serde::serialize_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_duration")]
    pub step_delay: Duration,
    /// Largest inbound frame accepted before validation
    pub max_frame_len: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            process_id: ProcessId(0),
            mode: LoopMode::FullCycle,
            receive_timeout: Duration::from_millis(super::DEFAULT_RECEIVE_TIMEOUT_MS),
            send_timeout: Duration::from_millis(super::DEFAULT_SEND_TIMEOUT_MS),
            step_delay: Duration::from_millis(super::DEFAULT_STEP_DELAY_MS),
            max_frame_len: super::MAX_FRAME_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_id_index() {
        let id = ProcessId::new(2);
        assert_eq!(id.index(), 2);
        assert_eq!(id.to_string(), "2");
    }

    #[test]
    fn test_default_config() {
        let config = NodeConfig::default();
        assert_eq!(config.process_id, ProcessId(0));
        assert_eq!(config.mode, LoopMode::FullCycle);
        assert_eq!(config.max_frame_len, super::super::MAX_FRAME_LEN);
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = NodeConfig::default();
        config.process_id = ProcessId(1);
        config.mode = LoopMode::MergeOnly;
        config.receive_timeout = Duration::from_millis(250);

        let json = serde_json::to_string(&config).unwrap();
        let restored: NodeConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.process_id, config.process_id);
        assert_eq!(restored.mode, config.mode);
        assert_eq!(restored.receive_timeout, config.receive_timeout);
    }
}
