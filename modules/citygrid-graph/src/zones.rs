//! Zone-level aggregation of traversal results.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use citygrid_common::{ExternalId, NodeKind};

use crate::snapshot::{GraphSnapshot, Handle};
use crate::traverse::HopMap;

/// Severity of impact on one administrative zone.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ZoneImpact {
    pub zone_id: ExternalId,
    pub zone_name: String,
    /// Reached roads located in this zone.
    pub affected_roads: u32,
    /// The zone's full road inventory, independent of reachability.
    pub total_roads: u32,
    /// `affected_roads / total_roads`, rounded to three decimals. Always in [0, 1].
    pub severity: f64,
}

/// Group the reached roads by owning zone and compute severity ratios.
/// Ordered by severity descending, ties by zone id ascending.
///
/// Roads with no owning zone contribute to nothing; zones with an empty
/// road inventory never appear.
pub fn aggregate(snapshot: &GraphSnapshot, hop_map: &HopMap) -> Vec<ZoneImpact> {
    let mut affected: HashMap<Handle, u32> = HashMap::new();
    for road_id in hop_map.road_ids() {
        let Some(road) = snapshot.lookup(NodeKind::Road, road_id) else {
            continue;
        };
        if let Some(zone) = snapshot.zone_of_road(road) {
            *affected.entry(zone).or_insert(0) += 1;
        }
    }

    let mut impacts: Vec<ZoneImpact> = affected
        .into_iter()
        .filter_map(|(zone, affected_roads)| {
            let total_roads = snapshot.zone_road_total(zone);
            if total_roads == 0 {
                return None;
            }
            let node = snapshot.node(zone);
            Some(ZoneImpact {
                zone_id: node.id,
                zone_name: node.name.clone().unwrap_or_default(),
                affected_roads,
                total_roads,
                severity: round3(f64::from(affected_roads) / f64::from(total_roads)),
            })
        })
        .collect();

    impacts.sort_by(|a, b| {
        b.severity
            .total_cmp(&a.severity)
            .then(a.zone_id.cmp(&b.zone_id))
    });
    impacts
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
