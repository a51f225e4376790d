//! Bounded breadth-first reachability over road connectivity.

use std::collections::{HashMap, VecDeque};

use citygrid_common::{CityGridError, ExternalId, NodeKind};

use crate::snapshot::{GraphSnapshot, Handle};

/// Result of one bounded traversal: road id → minimal hop count from the
/// root (0 for the root itself). Ephemeral, owned by the request.
#[derive(Debug, Clone)]
pub struct HopMap {
    root: ExternalId,
    max_hops: u32,
    hops: HashMap<ExternalId, u32>,
}

impl HopMap {
    pub fn root(&self) -> ExternalId {
        self.root
    }

    pub fn max_hops(&self) -> u32 {
        self.max_hops
    }

    pub fn hop(&self, road: ExternalId) -> Option<u32> {
        self.hops.get(&road).copied()
    }

    pub fn contains(&self, road: ExternalId) -> bool {
        self.hops.contains_key(&road)
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Reached `(road_id, hop)` pairs. Iteration order is not part of the
    /// contract; callers needing a stable ordering must sort.
    pub fn iter(&self) -> impl Iterator<Item = (ExternalId, u32)> + '_ {
        self.hops.iter().map(|(&id, &hop)| (id, hop))
    }

    pub fn road_ids(&self) -> impl Iterator<Item = ExternalId> + '_ {
        self.hops.keys().copied()
    }
}

/// Breadth-first reachability from `root` over CONNECTS_TO edges, bounded
/// at `max_hops`. Each node keeps its first-discovered hop, which BFS
/// guarantees is the minimal distance. `max_hops = 0` yields only the root.
///
/// Fails only when the root is not a Road node in the snapshot; hop-limit
/// policy is the caller's concern.
pub fn traverse(
    snapshot: &GraphSnapshot,
    root: ExternalId,
    max_hops: u32,
) -> Result<HopMap, CityGridError> {
    let root_handle = snapshot
        .lookup(NodeKind::Road, root)
        .ok_or(CityGridError::NotFound {
            kind: NodeKind::Road,
            id: root,
        })?;

    let mut discovered: HashMap<Handle, u32> = HashMap::new();
    let mut queue: VecDeque<Handle> = VecDeque::new();
    discovered.insert(root_handle, 0);
    queue.push_back(root_handle);

    while let Some(current) = queue.pop_front() {
        let hop = discovered[&current];
        if hop == max_hops {
            continue;
        }
        for &next in snapshot.connected_roads(current) {
            if !discovered.contains_key(&next) {
                discovered.insert(next, hop + 1);
                queue.push_back(next);
            }
        }
    }

    let hops = discovered
        .into_iter()
        .map(|(handle, hop)| (snapshot.node(handle).id, hop))
        .collect();

    Ok(HopMap {
        root,
        max_hops,
        hops,
    })
}
