//! Passive UDP driver.
//!
//! Binds a datagram socket in observe-only mode. The socket never sends;
//! the origin node-ID of each received datagram is derived from the low
//! 16 bits of the sender's IPv4 address (the host part of a /16), the
//! same mapping participants use when claiming an address on this kind
//! of network. The all-ones host value is subnet broadcast and maps to
//! an anonymous frame.

use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};

use crate::error::Result;
use crate::types::{Frame, NodeId};

/// Receive buffer size in bytes.
const RCVBUF_SIZE: usize = 4 * 1024 * 1024;

/// Largest datagram we accept (jumbo-frame ceiling).
const MAX_DATAGRAM: usize = 9000;

/// Host value addressing every node on the subnet.
const BROADCAST_HOST: u16 = 0xFFFF;

/// Passively bound UDP socket yielding observed datagrams as frames.
pub struct UdpMonitor {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl UdpMonitor {
    /// Bind `addr` for passive reception.
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        // Configure buffers and address reuse with socket2 before handing
        // the socket to tokio.
        let domain = if addr.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };
        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_recv_buffer_size(RCVBUF_SIZE)?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.set_nonblocking(true)?;

        let std_socket: std::net::UdpSocket = socket.into();
        let socket = UdpSocket::from_std(std_socket)?;

        tracing::info!("udp monitor bound to {}", socket.local_addr()?);

        Ok(Self {
            socket,
            buf: vec![0u8; MAX_DATAGRAM],
        })
    }

    /// Local address the monitor is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive the next datagram, waiting at most `timeout`.
    ///
    /// Returns `Ok(None)` when the budget elapses without traffic.
    pub(crate) async fn recv(&mut self, timeout: Duration) -> Result<Option<Frame>> {
        let deadline = Instant::now() + timeout;
        match timeout_at(deadline, self.socket.recv_from(&mut self.buf)).await {
            Err(_) => Ok(None),
            Ok(Ok((len, from))) => {
                let payload = Bytes::copy_from_slice(&self.buf[..len]);
                Ok(Some(Frame::new(origin_of(from), payload)))
            }
            Ok(Err(e)) => Err(e.into()),
        }
    }
}

/// Origin node-ID of a datagram sender, when determinable.
fn origin_of(from: SocketAddr) -> Option<NodeId> {
    match from {
        SocketAddr::V4(v4) => {
            let [_, _, c, d] = v4.ip().octets();
            let host = u16::from_be_bytes([c, d]);
            (host != BROADCAST_HOST).then_some(NodeId::from(host))
        }
        // IPv6 senders have no node-ID mapping; treat as anonymous.
        SocketAddr::V6(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_low_16_bits_of_sender_ip() {
        let from: SocketAddr = "192.168.100.7:9382".parse().unwrap();
        assert_eq!(origin_of(from), Some(100 * 256 + 7));

        let from: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        assert_eq!(origin_of(from), Some(1));
    }

    #[test]
    fn broadcast_and_ipv6_senders_are_anonymous() {
        let from: SocketAddr = "10.0.255.255:9382".parse().unwrap();
        assert_eq!(origin_of(from), None);

        let from: SocketAddr = "[::1]:9382".parse().unwrap();
        assert_eq!(origin_of(from), None);
    }

    #[tokio::test]
    async fn observes_datagram_with_origin() {
        let mut monitor = UdpMonitor::bind("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        let dest = monitor.local_addr().unwrap();

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(b"heartbeat", dest).await.unwrap();

        let frame = monitor
            .recv(Duration::from_secs(2))
            .await
            .unwrap()
            .expect("datagram should arrive");
        // 127.0.0.1 -> host part 0x0001
        assert_eq!(frame.source, Some(1));
        assert_eq!(&frame.payload[..], b"heartbeat");
    }

    #[tokio::test(start_paused = true)]
    async fn idle_socket_times_out() {
        let mut monitor = UdpMonitor::bind("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        let got = monitor.recv(Duration::from_secs(3)).await.unwrap();
        assert!(got.is_none());
    }
}
