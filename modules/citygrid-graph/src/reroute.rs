//! Reroute candidate selection for affected hospitals.

use std::collections::HashSet;

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use citygrid_common::{ExternalId, GeoPoint};

use crate::traits::SpatialStore;

/// Alternative access suggestion for a hospital cut off by the failure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RerouteSuggestion {
    pub suggested_road_id: ExternalId,
    pub reason: String,
}

/// Nearest road to `location` outside the affected set.
///
/// `None` means every candidate is affected or the store has no roads at
/// all; that is a valid terminal state, not an error, and no reason text is
/// fabricated for it.
pub async fn select_reroute(
    spatial: &dyn SpatialStore,
    location: GeoPoint,
    affected: &HashSet<ExternalId>,
) -> Result<Option<RerouteSuggestion>> {
    let candidate = spatial.nearest_road_excluding(location, affected).await?;
    Ok(candidate.map(|road_id| RerouteSuggestion {
        suggested_road_id: road_id,
        reason: "Nearest unaffected road providing alternative access".to_string(),
    }))
}
