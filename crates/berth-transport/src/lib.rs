//! Berth transport layer - receive-only attachments to bus-style networks.
//!
//! A [`Monitor`] is an anonymous, observe-only handle on a bus: it yields
//! each unit of traffic as a [`Frame`] carrying the origin [`NodeId`] when
//! the transport can determine one, and it never transmits, so attaching a
//! monitor cannot be mistaken for an address claim by other participants.
//!
//! # Drivers
//!
//! - **loopback**: an in-process broadcast bus, used by tests and smoke
//!   runs to simulate traffic without touching the network
//! - **udp**: a passively bound datagram socket; the origin node-ID is
//!   derived from the low 16 bits of the sender's IPv4 address
//!
//! The set of drivers is closed by design: a [`Monitor`] is an enum over
//! them, not a trait object, because the supported transport kinds are
//! fixed at build time.

pub mod config;
pub mod error;
pub mod loopback;
pub mod monitor;
pub mod types;
pub mod udp;

pub use config::TransportConfig;
pub use error::{Result, TransportError};
pub use loopback::{LoopbackBus, LoopbackPublisher};
pub use monitor::Monitor;
pub use types::{Frame, NodeId, TransportKind};
