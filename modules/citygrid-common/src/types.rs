use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stable external identifier from the authoritative source (OSM-style).
/// Unique only within a node kind; identity is the `(kind, id)` pair.
pub type ExternalId = i64;

// --- Geo Types ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Haversine great-circle distance between two lat/lon points in kilometers.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();
    let lat1_r = from.lat.to_radians();
    let lat2_r = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1_r.cos() * lat2_r.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c
}

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Road,
    Junction,
    Zone,
    Hospital,
    ConstructionProject,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Road => write!(f, "Road"),
            NodeKind::Junction => write!(f, "Junction"),
            NodeKind::Zone => write!(f, "Zone"),
            NodeKind::Hospital => write!(f, "Hospital"),
            NodeKind::ConstructionProject => write!(f, "ConstructionProject"),
        }
    }
}

/// Edge relation kinds. Only CONNECTS_TO participates in traversal;
/// the rest are aggregation-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKind {
    ConnectsTo,
    LocatedIn,
    MeetsAt,
    Affects,
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationKind::ConnectsTo => write!(f, "CONNECTS_TO"),
            RelationKind::LocatedIn => write!(f, "LOCATED_IN"),
            RelationKind::MeetsAt => write!(f, "MEETS_AT"),
            RelationKind::Affects => write!(f, "AFFECTS"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "LOW"),
            RiskTier::Medium => write!(f, "MEDIUM"),
            RiskTier::High => write!(f, "HIGH"),
            RiskTier::Critical => write!(f, "CRITICAL"),
        }
    }
}
