//! Receive-only transport handles.

use std::time::Duration;

use crate::error::Result;
use crate::loopback::LoopbackMonitor;
use crate::types::{Frame, TransportKind};
use crate::udp::UdpMonitor;

/// A receive-only attachment to a bus.
///
/// A monitor holds no node-ID of its own and never transmits, so
/// observing cannot be mistaken for an address claim. The variant set is
/// closed: the supported drivers are fixed at build time.
///
/// Dropping a monitor releases the underlying socket or channel, so an
/// abandoned observation does not hold the transport open.
pub enum Monitor {
    /// In-process broadcast bus.
    Loopback(LoopbackMonitor),
    /// Passively bound UDP socket.
    Udp(UdpMonitor),
}

impl Monitor {
    /// Receive the next unit of traffic, waiting at most `timeout`.
    ///
    /// `Ok(None)` means the budget elapsed with no traffic; the call never
    /// blocks past `timeout`. An error is an unrecoverable transport
    /// fault, not a timeout.
    pub async fn recv(&mut self, timeout: Duration) -> Result<Option<Frame>> {
        match self {
            Monitor::Loopback(m) => m.recv(timeout).await,
            Monitor::Udp(m) => m.recv(timeout).await,
        }
    }

    /// Transport family this monitor is attached to.
    pub fn kind(&self) -> TransportKind {
        match self {
            Monitor::Loopback(_) => TransportKind::Loopback,
            Monitor::Udp(_) => TransportKind::Udp,
        }
    }

    /// Release the underlying socket or channel.
    ///
    /// Equivalent to dropping; this form makes the release explicit at
    /// call sites.
    pub fn close(self) {}
}
