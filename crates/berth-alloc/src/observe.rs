//! Passive observation of bus traffic.
//!
//! The observer collects evidence of in-use node-IDs without transmitting
//! anything itself - any transmission would be a claim and could collide.
//! It listens until its window's deadline, then hands the accumulated
//! [`SeenSet`] to the selector. Bus silence is a valid outcome: an empty
//! set means every ID is free as far as this window could tell.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use berth_transport::{Monitor, NodeId};

use crate::error::{Error, Result};
use crate::space::AddressSpace;

/// Bounded time budget of one allocation attempt.
#[derive(Clone, Copy, Debug)]
pub struct ObservationWindow {
    duration: Duration,
    deadline: Instant,
}

impl ObservationWindow {
    /// Open a window of `duration` starting now.
    ///
    /// A zero duration is rejected: a window that cannot observe anything
    /// is a configuration mistake, not a fast path.
    pub fn new(duration: Duration) -> Result<Self> {
        if duration.is_zero() {
            return Err(Error::InvalidConfiguration(
                "observation window must be positive".into(),
            ));
        }
        Ok(Self {
            duration,
            deadline: Instant::now() + duration,
        })
    }

    /// Configured length of the window.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time left before the deadline; zero once elapsed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Whether the deadline has passed.
    pub fn has_elapsed(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// Node-IDs observed transmitting within one window.
///
/// Set semantics over IDs - re-observing a node is idempotent. The
/// timestamp of the latest sighting is kept for diagnostics. Owned by a
/// single allocation attempt; never shared.
#[derive(Debug, Default)]
pub struct SeenSet {
    inner: HashMap<NodeId, Instant>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sighting of `id`, updating its last-seen time.
    pub fn record(&mut self, id: NodeId) {
        self.inner.insert(id, Instant::now());
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.inner.contains_key(&id)
    }

    /// Number of distinct nodes observed.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over the observed IDs in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.keys().copied()
    }

    /// When `id` was last observed, if at all.
    pub fn last_seen(&self, id: NodeId) -> Option<Instant> {
        self.inner.get(&id).copied()
    }
}

impl FromIterator<NodeId> for SeenSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        let now = Instant::now();
        Self {
            inner: iter.into_iter().map(|id| (id, now)).collect(),
        }
    }
}

/// Listen on `monitor` until the window elapses, accumulating origin IDs.
///
/// Frames with no determinable origin (anonymous or broadcast traffic)
/// and origins outside `space` are non-informative and skipped; the
/// observer must tolerate unrelated traffic on a shared bus. Never fails
/// on silence - an idle bus yields an empty set. Errors surface only on
/// an unrecoverable transport fault.
pub async fn observe(
    monitor: &mut Monitor,
    space: &AddressSpace,
    window: &ObservationWindow,
) -> Result<SeenSet> {
    let mut seen = SeenSet::new();
    loop {
        let remaining = window.remaining();
        if remaining.is_zero() {
            break;
        }
        // The receive is bounded by the remaining budget, so a silent bus
        // cannot block us past the deadline.
        match monitor.recv(remaining).await? {
            None => break,
            Some(frame) => {
                let Some(id) = frame.source else {
                    tracing::trace!("skipping frame with no determinable origin");
                    continue;
                };
                if !space.contains(id) {
                    tracing::trace!(id, "skipping origin outside the address space");
                    continue;
                }
                if !seen.contains(id) {
                    tracing::debug!(id, "node observed on the bus");
                }
                seen.record(id);
            }
        }
    }
    tracing::debug!(
        nodes = seen.len(),
        window = ?window.duration(),
        "observation complete"
    );
    Ok(seen)
}
