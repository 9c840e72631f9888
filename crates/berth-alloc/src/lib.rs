//! Plug-and-play node-ID allocation for bus-style pub/sub networks.
//!
//! Every participant on a bus must hold a numeric node-ID that is unique
//! among the participants currently active. This crate picks one for a
//! joining node by passive observation: attach to the bus in receive-only
//! mode, listen for a bounded window, and choose an ID nobody was seen
//! using.
//!
//! There is no central allocator, no registry and no handshake - only
//! evidence of presence. Two joiners racing the same window can still pick
//! the same ID; that residual risk is inherent to decentralized claiming
//! and is accepted, not worked around. Each allocation attempt owns its
//! transport handle and working state exclusively, so concurrent attempts
//! never share anything.
//!
//! # Pipeline
//!
//! ```text
//! transport -> observe (SeenSet) -> select (free candidate) -> caller
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use berth_alloc::{allocate, AllocateOptions};
//!
//! let options = AllocateOptions::new("udp:0.0.0.0:9382".parse()?, Duration::from_secs(5));
//! let node_id = allocate(options).await?;
//! println!("{node_id}");
//! ```

pub mod allocate;
pub mod error;
pub mod observe;
pub mod select;
pub mod space;

pub use allocate::{allocate, AllocateOptions};
pub use error::{Error, Result};
pub use observe::{observe, ObservationWindow, SeenSet};
pub use select::select_node_id;
pub use space::AddressSpace;
