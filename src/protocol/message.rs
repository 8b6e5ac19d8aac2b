use crate::clock::VectorClock;
use crate::core::ProcessId;

/// One clock-carrying event as exchanged on the bus
///
/// A message is a transient value: built for a single transaction and
/// discarded once the receiver has merged or dropped it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message<const N: usize> {
    /// Process id of the node that produced the message
    pub sender: ProcessId,
    /// Snapshot of the sender's clock at send time
    pub clock: VectorClock<N>,
}

impl<const N: usize> Message<N> {
    /// Creates a new message
    pub fn new(sender: ProcessId, clock: VectorClock<N>) -> Self {
        Message { sender, clock }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let clock = VectorClock::<3>::from([0, 3, 1]);
        let message = Message::new(ProcessId(2), clock);
        assert_eq!(message.sender, ProcessId(2));
        assert_eq!(message.clock.counters(), &[0, 3, 1]);
    }
}
