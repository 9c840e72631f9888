//! Core types shared across transport drivers.

use std::fmt;

use bytes::Bytes;

/// Node identifier.
///
/// The valid range is transport-dependent; see the address-space policy
/// in `berth-alloc`. 64 bits covers the widest supported space.
pub type NodeId = u64;

/// Transport families with distinct address-space policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// CAN-style bus with a 7-bit node-ID space.
    Can,
    /// Host-addressed UDP with a 16-bit node-ID space.
    Udp,
    /// In-process bus spanning the full 64-bit space.
    Loopback,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Can => write!(f, "can"),
            TransportKind::Udp => write!(f, "udp"),
            TransportKind::Loopback => write!(f, "loopback"),
        }
    }
}

/// One unit of observed bus traffic.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Originating node, when the transport can determine one.
    /// Anonymous and broadcast traffic carries `None`.
    pub source: Option<NodeId>,
    /// Opaque payload bytes. Observation never decodes these.
    pub payload: Bytes,
}

impl Frame {
    /// Create a frame attributed to `source`.
    pub fn new(source: Option<NodeId>, payload: Bytes) -> Self {
        Self { source, payload }
    }

    /// Create a frame with no determinable origin.
    pub fn anonymous(payload: Bytes) -> Self {
        Self {
            source: None,
            payload,
        }
    }

    /// Whether this frame lacks a determinable origin.
    pub fn is_anonymous(&self) -> bool {
        self.source.is_none()
    }
}
