//! One-shot allocation attempts.
//!
//! The orchestrator ties the pipeline together: open the transport in
//! observe-only mode, listen for the full window, pick a free ID, report
//! it. Each invocation is single-shot - opening, observing and selecting
//! happen exactly once, and retrying is the caller's decision, made as a
//! fresh attempt with its own window.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use berth_transport::{NodeId, TransportConfig};

use crate::error::Result;
use crate::observe::{observe, ObservationWindow};
use crate::select::select_node_id;
use crate::space::AddressSpace;

/// Options for a single allocation attempt.
#[derive(Clone, Debug)]
pub struct AllocateOptions {
    /// Bus to observe.
    pub transport: TransportConfig,
    /// How long to listen before deciding.
    pub window: Duration,
    /// Pin the selection RNG for reproducible runs. `None` seeds from
    /// entropy.
    pub seed: Option<u64>,
}

impl AllocateOptions {
    /// Options with an entropy-seeded selector.
    pub fn new(transport: TransportConfig, window: Duration) -> Self {
        Self {
            transport,
            window,
            seed: None,
        }
    }

    /// Pin the selection RNG.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Run one allocation attempt: observe the bus for the full window, then
/// pick a node-ID that was not seen transmitting.
///
/// From the bus's point of view the whole attempt is side-effect free:
/// the monitor holds no node-ID and never transmits. Failures come back
/// as typed [`Error`](crate::Error) values - a transport fault, a
/// misconfigured window, or a genuinely exhausted address space. Bus
/// silence is success: with nothing observed, any claimable ID is free.
///
/// Cancelling the returned future drops the monitor and releases the
/// transport immediately.
pub async fn allocate(options: AllocateOptions) -> Result<NodeId> {
    let window = ObservationWindow::new(options.window)?;
    let space = AddressSpace::for_kind(options.transport.kind());

    tracing::debug!(kind = %options.transport.kind(), "opening transport");
    let mut monitor = options.transport.open().await?;

    tracing::debug!(window = ?window.duration(), "observing");
    let seen = observe(&mut monitor, &space, &window).await?;
    monitor.close();

    tracing::debug!(nodes = seen.len(), "selecting a free node-ID");
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let id = select_node_id(&space, &seen, &mut rng)?;

    tracing::info!(id, "node-ID allocated");
    Ok(id)
}
