//! Per-transport address-space policy.
//!
//! Which node-IDs a joining node may claim depends on the transport
//! family. The policies are fixed at build time, one per
//! [`TransportKind`]:
//!
//! - `can`: 7-bit IDs, the top two reserved for diagnostic tools
//! - `udp`: 16-bit IDs, the zero host and the subnet broadcast excluded,
//!   leaving `[1, 65534]`
//! - `loopback`: the full 64-bit space, nothing reserved

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use berth_transport::{NodeId, TransportKind};

const CAN_MAX: NodeId = 127;
/// Diagnostic-tool IDs on the CAN profile.
const CAN_RESERVED: [NodeId; 2] = [126, 127];

const UDP_MAX: NodeId = 0xFFFF;

/// The set of node-IDs a joining node may claim on a given transport.
///
/// Immutable once constructed. Invariants: `min <= max` and every
/// reserved ID lies within `[min, max]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressSpace {
    min: NodeId,
    max: NodeId,
    reserved: BTreeSet<NodeId>,
}

impl AddressSpace {
    /// Address-space policy for `kind`. Total over the closed kind set.
    pub fn for_kind(kind: TransportKind) -> Self {
        match kind {
            TransportKind::Can => Self::new(0, CAN_MAX, CAN_RESERVED.into()),
            TransportKind::Udp => Self::new(0, UDP_MAX, [0, UDP_MAX].into()),
            TransportKind::Loopback => Self::new(0, NodeId::MAX, BTreeSet::new()),
        }
    }

    pub(crate) fn new(min: NodeId, max: NodeId, reserved: BTreeSet<NodeId>) -> Self {
        debug_assert!(min <= max);
        debug_assert!(reserved.iter().all(|id| (min..=max).contains(id)));
        Self { min, max, reserved }
    }

    /// Smallest valid ID (reserved or not).
    pub fn min(&self) -> NodeId {
        self.min
    }

    /// Largest valid ID (reserved or not).
    pub fn max(&self) -> NodeId {
        self.max
    }

    /// The full valid range, including reserved IDs.
    pub fn range(&self) -> RangeInclusive<NodeId> {
        self.min..=self.max
    }

    /// Whether `id` is a reserved sentinel on this transport.
    pub fn is_reserved(&self, id: NodeId) -> bool {
        self.reserved.contains(&id)
    }

    /// Whether `id` may be claimed on this transport.
    pub fn contains(&self, id: NodeId) -> bool {
        self.range().contains(&id) && !self.is_reserved(id)
    }

    /// Number of claimable IDs.
    ///
    /// Saturates at `u64::MAX` for the full-width space, where the exact
    /// count does not fit and never matters.
    pub fn usable_len(&self) -> u64 {
        match (self.max - self.min).checked_add(1) {
            Some(total) => total - self.reserved.len() as u64,
            None => u64::MAX,
        }
    }
}
