//! In-memory half-duplex bus pair for host-side simulation
//!
//! Frames written by one end arrive as whole transactions at the other,
//! mirroring a real port's transaction boundary. This is not a driver; it
//! exists so node loops can be exercised on the bench without hardware.

use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::time;

use super::BusPort;
use crate::core::{Error, Result};

/// One end of a simulated two-node bus segment
pub struct MemBus {
    tx: mpsc::Sender<Bytes>,
    rx: mpsc::Receiver<Bytes>,
    open: bool,
    peripheral_fault: bool,
    controller_fault: bool,
}

/// Creates two connected bus ends with the given per-direction capacity
pub fn pair(capacity: usize) -> (MemBus, MemBus) {
    let (a_tx, b_rx) = mpsc::channel(capacity);
    let (b_tx, a_rx) = mpsc::channel(capacity);
    (MemBus::new(a_tx, a_rx), MemBus::new(b_tx, b_rx))
}

impl MemBus {
    fn new(tx: mpsc::Sender<Bytes>, rx: mpsc::Receiver<Bytes>) -> Self {
        MemBus {
            tx,
            rx,
            open: false,
            peripheral_fault: false,
            controller_fault: false,
        }
    }

    /// Makes every subsequent peripheral acquisition fail, simulating a
    /// driver bring-up fault on the listener side
    pub fn fail_peripheral_acquire(&mut self) {
        self.peripheral_fault = true;
    }

    /// Makes every subsequent controller acquisition fail, simulating a
    /// driver bring-up fault on the initiator side
    pub fn fail_controller_acquire(&mut self) {
        self.controller_fault = true;
    }
}

impl BusPort for MemBus {
    fn open_peripheral(&mut self) -> Result<()> {
        if self.peripheral_fault {
            return Err(Error::fault("injected peripheral driver fault"));
        }
        self.open = true;
        Ok(())
    }

    fn open_controller(&mut self) -> Result<()> {
        if self.controller_fault {
            return Err(Error::fault("injected controller driver fault"));
        }
        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
    }

    async fn read(&mut self, timeout: Duration) -> Result<Option<Bytes>> {
        if !self.open {
            return Err(Error::invalid_state("read on a closed port"));
        }
        match time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(frame)) => Ok(Some(frame)),
            // Peer end dropped; nothing will ever arrive, same as silence.
            Ok(None) => Ok(None),
            Err(_) => Ok(None),
        }
    }

    async fn write(&mut self, frame: &[u8], timeout: Duration) -> Result<()> {
        if !self.open {
            return Err(Error::invalid_state("write on a closed port"));
        }
        let frame = Bytes::copy_from_slice(frame);
        match time::timeout(timeout, self.tx.send(frame)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(Error::bus("peer absent")),
            Err(_) => Err(Error::bus("write transaction timed out")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    const SHORT: Duration = Duration::from_millis(20);

    #[tokio::test]
    async fn test_frames_cross_the_pair() {
        let (mut a, mut b) = pair(4);
        a.open_controller().unwrap();
        b.open_peripheral().unwrap();

        assert_ok!(a.write(b"2-[0,3,1]", SHORT).await);
        let frame = b.read(SHORT).await.unwrap().unwrap();
        assert_eq!(&frame[..], b"2-[0,3,1]");
    }

    #[tokio::test]
    async fn test_read_timeout_is_not_an_error() {
        let (mut a, _b) = pair(4);
        a.open_peripheral().unwrap();
        assert!(a.read(SHORT).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_to_absent_peer_fails() {
        let (mut a, b) = pair(4);
        drop(b);
        a.open_controller().unwrap();
        let err = a.write(b"0-[1,0,0]", SHORT).await.unwrap_err();
        assert!(matches!(err, Error::Bus(_)));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_closed_port_rejects_io() {
        let (mut a, _b) = pair(4);
        assert!(a.read(SHORT).await.is_err());
        assert!(a.write(b"x", SHORT).await.is_err());
    }

    #[test]
    fn test_injected_acquire_fault() {
        let (mut a, _b) = pair(4);
        a.fail_controller_acquire();
        assert!(a.open_peripheral().is_ok());
        let err = a.open_controller().unwrap_err();
        assert!(err.is_fatal());
    }
}
