//! Free-candidate selection.
//!
//! Given an address space and the set of IDs seen transmitting, pick one
//! claimable ID that was not seen. Selection is uniformly random among
//! the free candidates so that two joiners racing the same window are
//! unlikely to land on the same choice; determinism for tests comes from
//! injecting a seeded RNG rather than from the algorithm.
//!
//! Small spaces are enumerated exactly, so exhaustion is reported
//! precisely when every slot is taken. Spaces too large to enumerate are
//! sampled with a bounded draw budget; spending the whole budget on a
//! 64-bit space means the bus is carrying close to every possible ID,
//! which we treat as exhaustion.

use rand::Rng;

use berth_transport::NodeId;

use crate::error::{Error, Result};
use crate::observe::SeenSet;
use crate::space::AddressSpace;

/// Spaces with at most this many claimable IDs are enumerated exactly.
const ENUMERATION_LIMIT: u64 = 1 << 16;

/// Draw budget for sampled spaces before concluding exhaustion.
const MAX_SAMPLE_DRAWS: u32 = 128;

/// Pick one claimable node-ID not present in `seen`.
///
/// Deterministic given `rng`. Fails with
/// [`Error::AddressSpaceExhausted`] when no free candidate exists (small
/// spaces) or none was found within the draw budget (sampled spaces).
pub fn select_node_id<R: Rng>(
    space: &AddressSpace,
    seen: &SeenSet,
    rng: &mut R,
) -> Result<NodeId> {
    if space.usable_len() <= ENUMERATION_LIMIT {
        select_exact(space, seen, rng)
    } else {
        select_sampled(space, seen, rng)
    }
}

fn select_exact<R: Rng>(space: &AddressSpace, seen: &SeenSet, rng: &mut R) -> Result<NodeId> {
    let free: Vec<NodeId> = space
        .range()
        .filter(|&id| !space.is_reserved(id) && !seen.contains(id))
        .collect();
    if free.is_empty() {
        return Err(exhausted(space));
    }
    Ok(free[rng.gen_range(0..free.len())])
}

fn select_sampled<R: Rng>(space: &AddressSpace, seen: &SeenSet, rng: &mut R) -> Result<NodeId> {
    for _ in 0..MAX_SAMPLE_DRAWS {
        let candidate = rng.gen_range(space.min()..=space.max());
        if space.contains(candidate) && !seen.contains(candidate) {
            return Ok(candidate);
        }
    }
    Err(exhausted(space))
}

fn exhausted(space: &AddressSpace) -> Error {
    Error::AddressSpaceExhausted {
        min: space.min(),
        max: space.max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeSet;

    use berth_transport::TransportKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xBE27)
    }

    #[test]
    fn full_coverage_reports_exhaustion_precisely() {
        let space = AddressSpace::for_kind(TransportKind::Can);
        let seen: SeenSet = (0..=125).collect();

        let err = select_node_id(&space, &seen, &mut rng()).unwrap_err();
        assert!(matches!(
            err,
            Error::AddressSpaceExhausted { min: 0, max: 127 }
        ));
    }

    #[test]
    fn proper_subset_always_yields_a_free_candidate() {
        let space = AddressSpace::for_kind(TransportKind::Can);
        // Everything taken except 77.
        let seen: SeenSet = (0..=125).filter(|&id| id != 77).collect();

        let id = select_node_id(&space, &seen, &mut rng()).unwrap();
        assert_eq!(id, 77);
    }

    #[test]
    fn candidates_are_in_range_unreserved_and_unseen() {
        let space = AddressSpace::for_kind(TransportKind::Can);
        let seen: SeenSet = (0..10).collect();
        let mut rng = rng();

        for _ in 0..200 {
            let id = select_node_id(&space, &seen, &mut rng).unwrap();
            assert!(space.contains(id));
            assert!(!seen.contains(id));
            assert!(id >= 10);
        }
    }

    #[test]
    fn host_style_space_never_yields_zero_or_broadcast() {
        let space = AddressSpace::for_kind(TransportKind::Udp);
        let seen = SeenSet::new();
        let mut rng = rng();

        for _ in 0..200 {
            let id = select_node_id(&space, &seen, &mut rng).unwrap();
            assert!((1..=65534).contains(&id));
        }
    }

    #[test]
    fn sampling_avoids_seen_ids_in_huge_spaces() {
        let space = AddressSpace::for_kind(TransportKind::Loopback);
        let seen: SeenSet = (0..10).collect();
        let mut rng = rng();

        for _ in 0..200 {
            let id = select_node_id(&space, &seen, &mut rng).unwrap();
            assert!(!seen.contains(id));
        }
    }

    #[test]
    fn sampled_path_gives_up_after_the_draw_budget() {
        // Just past the enumeration limit, with every ID taken, so each
        // draw must collide and the budget runs out.
        let space = AddressSpace::new(0, ENUMERATION_LIMIT, BTreeSet::new());
        let seen: SeenSet = (0..=ENUMERATION_LIMIT).collect();

        let err = select_node_id(&space, &seen, &mut rng()).unwrap_err();
        assert!(matches!(err, Error::AddressSpaceExhausted { .. }));
    }

    #[test]
    fn selection_is_deterministic_for_a_fixed_seed() {
        let space = AddressSpace::for_kind(TransportKind::Udp);
        let seen: SeenSet = (1..100).collect();

        let a = select_node_id(&space, &seen, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = select_node_id(&space, &seen, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }
}
