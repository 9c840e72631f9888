//! In-process loopback bus.
//!
//! A broadcast channel standing in for a real bus. Tests attach publisher
//! handles to simulate participants holding node-IDs; the allocator
//! attaches a [`LoopbackMonitor`] and sees exactly what a passive listener
//! on a shared medium would see.

use std::time::Duration;

use bytes::Bytes;
use tokio::sync::broadcast;
use tokio::time::{timeout_at, Instant};

use crate::error::{Result, TransportError};
use crate::types::{Frame, NodeId};

/// Frames buffered per monitor before older ones are dropped.
const BUS_CAPACITY: usize = 1024;

/// Shared in-process bus. Cloning yields another handle to the same bus.
#[derive(Clone, Debug)]
pub struct LoopbackBus {
    tx: broadcast::Sender<Frame>,
}

impl LoopbackBus {
    /// Create a new, initially silent bus.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    /// Attach a publisher transmitting as `node_id`.
    pub fn publisher(&self, node_id: NodeId) -> LoopbackPublisher {
        LoopbackPublisher {
            tx: self.tx.clone(),
            source: Some(node_id),
        }
    }

    /// Attach a publisher transmitting anonymous frames.
    pub fn anonymous_publisher(&self) -> LoopbackPublisher {
        LoopbackPublisher {
            tx: self.tx.clone(),
            source: None,
        }
    }

    /// Attach a receive-only monitor.
    ///
    /// The monitor sees frames published after this call, not before.
    pub fn monitor(&self) -> LoopbackMonitor {
        LoopbackMonitor {
            rx: self.tx.subscribe(),
            _bus: self.clone(),
        }
    }
}

impl Default for LoopbackBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Transmitting handle used to simulate bus participants.
pub struct LoopbackPublisher {
    tx: broadcast::Sender<Frame>,
    source: Option<NodeId>,
}

impl LoopbackPublisher {
    /// Publish one frame to every attached monitor.
    pub fn publish(&self, payload: Bytes) {
        // A send error only means no monitor is attached right now, which
        // is normal on a real bus too.
        let _ = self.tx.send(Frame::new(self.source, payload));
    }
}

/// Receive-only attachment to a [`LoopbackBus`].
pub struct LoopbackMonitor {
    rx: broadcast::Receiver<Frame>,
    // Keeps the channel open so a silent bus reads as idle, not closed.
    _bus: LoopbackBus,
}

impl LoopbackMonitor {
    /// Receive the next frame, waiting at most `timeout`.
    ///
    /// Returns `Ok(None)` when the budget elapses without traffic.
    pub(crate) async fn recv(&mut self, timeout: Duration) -> Result<Option<Frame>> {
        let deadline = Instant::now() + timeout;
        loop {
            match timeout_at(deadline, self.rx.recv()).await {
                Err(_) => return Ok(None),
                Ok(Ok(frame)) => return Ok(Some(frame)),
                Ok(Err(broadcast::error::RecvError::Lagged(missed))) => {
                    // Older frames were overwritten; keep draining within
                    // the same deadline.
                    tracing::warn!(missed, "loopback monitor lagged");
                    continue;
                }
                Ok(Err(broadcast::error::RecvError::Closed)) => {
                    return Err(TransportError::Closed)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = LoopbackBus::new();
        let mut monitor = bus.monitor();
        let publisher = bus.publisher(7);

        publisher.publish(Bytes::from_static(b"heartbeat"));

        let frame = monitor
            .recv(Duration::from_millis(100))
            .await
            .unwrap()
            .expect("frame should arrive");
        assert_eq!(frame.source, Some(7));
        assert_eq!(&frame.payload[..], b"heartbeat");
    }

    #[tokio::test]
    async fn anonymous_frames_carry_no_origin() {
        let bus = LoopbackBus::new();
        let mut monitor = bus.monitor();
        bus.anonymous_publisher()
            .publish(Bytes::from_static(b"anon"));

        let frame = monitor
            .recv(Duration::from_millis(100))
            .await
            .unwrap()
            .expect("frame should arrive");
        assert!(frame.is_anonymous());
    }

    #[tokio::test(start_paused = true)]
    async fn silent_bus_times_out() {
        let bus = LoopbackBus::new();
        let mut monitor = bus.monitor();

        let got = monitor.recv(Duration::from_secs(5)).await.unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn monitor_misses_frames_published_before_attach() {
        let bus = LoopbackBus::new();
        bus.publisher(1).publish(Bytes::from_static(b"early"));

        let mut monitor = bus.monitor();
        let got = monitor.recv(Duration::from_millis(10)).await.unwrap();
        assert!(got.is_none());
    }
}
