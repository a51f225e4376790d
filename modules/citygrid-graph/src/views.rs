//! Response shapes for the impact views.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use citygrid_common::{ExternalId, GeoPoint, RiskTier};

use crate::reroute::RerouteSuggestion;
use crate::zones::ZoneImpact;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AffectedRoad {
    pub road_id: ExternalId,
    pub hop: u32,
    pub name: Option<String>,
}

/// One CONNECTS_TO edge with both endpoints reached, emitted once per pair.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AffectedEdge {
    pub from: ExternalId,
    pub to: ExternalId,
}

/// Affected node/edge sets from a bounded traversal.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RoadImpactView {
    pub root: ExternalId,
    pub max_hops: u32,
    pub roads: Vec<AffectedRoad>,
    pub edges: Vec<AffectedEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ZoneImpactEntry {
    #[serde(flatten)]
    pub impact: ZoneImpact,
    /// GeoJSON polygon from the spatial store. Absent in degraded responses.
    pub geometry: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ZoneImpactView {
    pub root: ExternalId,
    pub max_hops: u32,
    pub zones: Vec<ZoneImpactEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HospitalImpactEntry {
    pub hospital_id: ExternalId,
    pub name: String,
    pub location: GeoPoint,
    pub hop: u32,
    pub risk_tier: RiskTier,
    pub reason: String,
    pub priority_score: u32,
    pub reroute: Option<RerouteSuggestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HospitalImpactView {
    pub root: ExternalId,
    pub max_hops: u32,
    pub hospitals: Vec<HospitalImpactEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummaryEntry {
    pub name: String,
    pub hop: u32,
    pub priority_score: u32,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImpactSummaryView {
    pub root: ExternalId,
    pub top_hospitals: Vec<SummaryEntry>,
}

/// Roads meeting at a junction; severity is simply their count.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JunctionImpactView {
    pub junction_id: ExternalId,
    pub connected_roads: Vec<ExternalId>,
    pub severity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProjectImpact {
    pub project_id: ExternalId,
    pub name: Option<String>,
    pub severity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConstructionImpactView {
    pub road_id: ExternalId,
    pub projects: Vec<ProjectImpact>,
    pub risk_level: RiskTier,
}
