//! The node loop: one sequential receive/merge/send cycle
//!
//! A node's entire behavior is a repeating pass through AwaitInbound →
//! Validate → Merge → PrepareOutbound → Transmit. The pipeline is strictly
//! sequential, so the clock never sees concurrent access and needs no
//! locking; the port is the only shared resource and the transport already
//! serializes the two roles.

use tracing::{info, warn};

use crate::clock::VectorClock;
use crate::core::{LoopMode, NodeConfig, Result};
use crate::protocol::{FrameCodec, Message};
use crate::transport::{BusPort, RoleSwitchTransport};

/// What one pass of the cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing arrived within the receive timeout
    Idle,
    /// Inbound frame failed validation and was dropped
    Discarded,
    /// Inbound bytes retransmitted unchanged ([`LoopMode::Echo`])
    Echoed,
    /// Inbound clock merged, nothing transmitted ([`LoopMode::MergeOnly`])
    Merged,
    /// Merged, local event recorded, updated clock transmitted
    RoundTrip,
    /// Merge succeeded but the outbound transaction failed; not retried
    SendFailed,
}

/// Sequential state machine driving one node on the bus
pub struct NodeLoop<P: BusPort, const N: usize> {
    config: NodeConfig,
    clock: VectorClock<N>,
    codec: FrameCodec<N>,
    transport: RoleSwitchTransport<P>,
}

impl<P: BusPort, const N: usize> NodeLoop<P, N> {
    /// Creates a node loop over a raw bus port
    ///
    /// The clock starts zeroed; there is no persisted state, so a restart
    /// resets it.
    pub fn new(config: NodeConfig, port: P) -> Self {
        NodeLoop {
            config,
            clock: VectorClock::new(),
            codec: FrameCodec::new(),
            transport: RoleSwitchTransport::new(port),
        }
    }

    /// Current clock value
    pub fn clock(&self) -> &VectorClock<N> {
        &self.clock
    }

    /// Runs the cycle until a fatal fault
    ///
    /// The configured step delay is inserted between passes so an idle bus
    /// is polled, not spun on. Returns only on a fatal role-acquisition
    /// fault; the surrounding supervisor decides what to do then,
    /// typically restarting the node.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            match self.step().await {
                Ok(_) => {}
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => warn!("step failed: {}", err),
            }
            tokio::time::sleep(self.config.step_delay).await;
        }
    }

    /// One full pass: await inbound, validate, merge, transmit
    pub async fn step(&mut self) -> Result<StepOutcome> {
        // AwaitInbound
        self.transport.acquire_as_peripheral()?;
        let frame = match self.transport.receive(self.config.receive_timeout).await {
            Ok(frame) => frame,
            Err(err) => {
                self.transport.release();
                return Err(err);
            }
        };
        let Some(frame) = frame else {
            self.transport.release();
            return Ok(StepOutcome::Idle);
        };

        if frame.len() > self.config.max_frame_len {
            warn!(len = frame.len(), "discarding oversize frame");
            self.transport.release();
            return Ok(StepOutcome::Discarded);
        }

        if self.config.mode == LoopMode::Echo {
            self.transport.release();
            let sent = self.transmit(&frame).await?;
            return Ok(if sent {
                StepOutcome::Echoed
            } else {
                StepOutcome::SendFailed
            });
        }

        // Validate: malformed input is silently dropped, never an error.
        if !self.codec.validate(&frame) {
            warn!(len = frame.len(), "discarding malformed frame");
            self.transport.release();
            return Ok(StepOutcome::Discarded);
        }

        // Merge
        let message = match self.codec.parse(&frame) {
            Ok(message) => message,
            Err(err) => {
                // Unrepresentable counters slip past the textual gate.
                warn!("discarding frame: {}", err);
                self.transport.release();
                return Ok(StepOutcome::Discarded);
            }
        };
        self.clock.merge(&message.clock);
        info!(sender = %message.sender, "Vector Clock = {{{}}}", self.clock);
        self.transport.release();

        if self.config.mode == LoopMode::MergeOnly {
            return Ok(StepOutcome::Merged);
        }

        // PrepareOutbound: record the local send event before encoding.
        self.clock.increment(self.config.process_id)?;
        let outbound = self
            .codec
            .encode(&Message::new(self.config.process_id, self.clock));
        info!("Vector Clock = {{{}}}", self.clock);

        // Transmit
        let sent = self.transmit(&outbound).await?;
        Ok(if sent {
            StepOutcome::RoundTrip
        } else {
            StepOutcome::SendFailed
        })
    }

    /// Acquires the controller role for one write and always releases it
    ///
    /// A transient send failure comes back as `Ok(false)`; only a fatal
    /// acquisition fault propagates as an error.
    async fn transmit(&mut self, frame: &[u8]) -> Result<bool> {
        self.transport.acquire_as_controller()?;
        let sent = match self.transport.send(frame, self.config.send_timeout).await {
            Ok(()) => true,
            Err(err) => {
                warn!("send failed: {}", err);
                false
            }
        };
        self.transport.release();
        Ok(sent)
    }
}
