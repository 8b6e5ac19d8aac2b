//! Role-switching access to a half-duplex bus port
//!
//! The bus can be driven by at most one side at a time, and a listening
//! peripheral cannot simultaneously act as the initiator. Both roles are
//! mutually exclusive uses of the same port resource, modeled as a strict
//! request/release discipline rather than a persistent duplex channel.

pub mod mem;

use std::time::Duration;

use bytes::Bytes;

use crate::core::{Error, Result};

/// Contract the bus driver exposes to the core
///
/// Pin assignment, pull-up configuration and clock speed live behind this
/// trait; the core only ever opens a role, moves bytes and closes.
#[allow(async_fn_in_trait)]
pub trait BusPort {
    /// Configures the port for passive listening at the node's own address
    ///
    /// Fails only on a fatal driver or configuration fault, which is not
    /// retryable from this layer.
    fn open_peripheral(&mut self) -> Result<()>;

    /// Configures the port to actively drive transactions to the fixed peer
    fn open_controller(&mut self) -> Result<()>;

    /// Frees the bus-level lock so the opposite role can bind the port
    fn close(&mut self);

    /// Waits up to `timeout` for one inbound transaction
    ///
    /// `None` means nothing arrived, which is not an error.
    async fn read(&mut self, timeout: Duration) -> Result<Option<Bytes>>;

    /// Performs one addressed write transaction
    ///
    /// Failure (peer absent, arbitration fault, timeout) is reported, not
    /// retried internally.
    async fn write(&mut self, frame: &[u8], timeout: Duration) -> Result<()>;
}

/// Which side of the bus the node currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// No role held; the port is free
    Released,
    /// Listening at the node's own address
    PeripheralActive,
    /// Driving transactions as the initiator
    ControllerActive,
}

/// Enforces the half-duplex request/release discipline over a raw port
///
/// At most one role is held at a time. Acquiring a role releases the
/// previous one first, and the port is closed again when the transport is
/// dropped, so a role cannot leak on any exit path.
pub struct RoleSwitchTransport<P: BusPort> {
    port: P,
    role: Role,
}

impl<P: BusPort> RoleSwitchTransport<P> {
    /// Wraps a raw port with no role held
    pub fn new(port: P) -> Self {
        RoleSwitchTransport {
            port,
            role: Role::Released,
        }
    }

    /// Currently held role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Binds the port as a passive listener
    pub fn acquire_as_peripheral(&mut self) -> Result<()> {
        self.release();
        self.port
            .open_peripheral()
            .map_err(|e| Error::fault(format!("peripheral acquisition failed: {}", e)))?;
        self.role = Role::PeripheralActive;
        Ok(())
    }

    /// Binds the port as the active initiator
    pub fn acquire_as_controller(&mut self) -> Result<()> {
        self.release();
        self.port
            .open_controller()
            .map_err(|e| Error::fault(format!("controller acquisition failed: {}", e)))?;
        self.role = Role::ControllerActive;
        Ok(())
    }

    /// Waits for one inbound frame; only valid while listening
    pub async fn receive(&mut self, timeout: Duration) -> Result<Option<Bytes>> {
        if self.role != Role::PeripheralActive {
            return Err(Error::invalid_state(format!(
                "receive while in role {:?}",
                self.role
            )));
        }
        self.port.read(timeout).await
    }

    /// One addressed write; only valid while holding the controller role
    pub async fn send(&mut self, frame: &[u8], timeout: Duration) -> Result<()> {
        if self.role != Role::ControllerActive {
            return Err(Error::invalid_state(format!(
                "send while in role {:?}",
                self.role
            )));
        }
        self.port.write(frame, timeout).await
    }

    /// Frees the current role, if any
    pub fn release(&mut self) {
        if self.role != Role::Released {
            self.port.close();
            self.role = Role::Released;
        }
    }
}

impl<P: BusPort> Drop for RoleSwitchTransport<P> {
    fn drop(&mut self) {
        self.release();
    }
}
