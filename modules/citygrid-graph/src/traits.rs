//! Collaborator traits for the impact engine.
//!
//! The engine never talks to a concrete graph or geometry store. It reads
//! node/edge records from a `GraphSource` when rebuilding a snapshot, and
//! issues nearest-neighbor and geometry lookups against a `SpatialStore`
//! when enriching query results.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use citygrid_common::{ExternalId, GeoPoint, NodeKind, RelationKind};

/// A node as delivered by the authoritative graph source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: ExternalId,
    pub kind: NodeKind,
    pub name: Option<String>,
    /// Surface area. Only meaningful for `Zone` nodes.
    pub area: Option<f64>,
    /// Risk factor. Only meaningful for `ConstructionProject` nodes.
    pub risk_factor: Option<f64>,
}

impl NodeRecord {
    pub fn road(id: ExternalId) -> Self {
        Self {
            id,
            kind: NodeKind::Road,
            name: None,
            area: None,
            risk_factor: None,
        }
    }

    pub fn junction(id: ExternalId) -> Self {
        Self {
            id,
            kind: NodeKind::Junction,
            name: None,
            area: None,
            risk_factor: None,
        }
    }

    pub fn zone(id: ExternalId, name: &str, area: f64) -> Self {
        Self {
            id,
            kind: NodeKind::Zone,
            name: Some(name.to_string()),
            area: Some(area),
            risk_factor: None,
        }
    }

    pub fn hospital(id: ExternalId, name: &str) -> Self {
        Self {
            id,
            kind: NodeKind::Hospital,
            name: Some(name.to_string()),
            area: None,
            risk_factor: None,
        }
    }

    pub fn construction_project(id: ExternalId, name: &str, risk_factor: f64) -> Self {
        Self {
            id,
            kind: NodeKind::ConstructionProject,
            name: Some(name.to_string()),
            area: None,
            risk_factor: Some(risk_factor),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

/// An edge as delivered by the authoritative graph source.
/// Endpoints are `(kind, id)` identities resolved against the node set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: (NodeKind, ExternalId),
    pub to: (NodeKind, ExternalId),
    pub relation: RelationKind,
    /// Only AFFECTS edges carry a severity, copied from the project's risk factor.
    pub severity: Option<f64>,
}

impl EdgeRecord {
    /// Road↔road connectivity. Stored symmetrically regardless of direction here.
    pub fn connects(a: ExternalId, b: ExternalId) -> Self {
        Self {
            from: (NodeKind::Road, a),
            to: (NodeKind::Road, b),
            relation: RelationKind::ConnectsTo,
            severity: None,
        }
    }

    pub fn located_in(road: ExternalId, zone: ExternalId) -> Self {
        Self {
            from: (NodeKind::Road, road),
            to: (NodeKind::Zone, zone),
            relation: RelationKind::LocatedIn,
            severity: None,
        }
    }

    pub fn meets_at(road: ExternalId, junction: ExternalId) -> Self {
        Self {
            from: (NodeKind::Road, road),
            to: (NodeKind::Junction, junction),
            relation: RelationKind::MeetsAt,
            severity: None,
        }
    }

    pub fn affects(project: ExternalId, road: ExternalId, severity: f64) -> Self {
        Self {
            from: (NodeKind::ConstructionProject, project),
            to: (NodeKind::Road, road),
            relation: RelationKind::Affects,
            severity: Some(severity),
        }
    }
}

/// Read-only access to the authoritative graph. The engine pulls the full
/// node and edge sets during a rebuild and never writes back.
///
/// Implemented by the production store adapter and by `MemoryGraphSource`
/// (tests).
#[async_trait]
pub trait GraphSource: Send + Sync {
    async fn fetch_nodes(&self) -> Result<Vec<NodeRecord>>;
    async fn fetch_edges(&self) -> Result<Vec<EdgeRecord>>;
}

/// A hospital row from the spatial store's hospital → nearest-road join.
/// The nearest road is precomputed by the store; it is not a graph edge.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HospitalSite {
    pub id: ExternalId,
    pub name: String,
    pub location: GeoPoint,
    pub nearest_road: ExternalId,
}

/// Nearest-neighbor and geometry lookups against the spatial store.
/// Distance comparison is the store's job; the engine only supplies points
/// and exclusion sets and never computes geometric distance itself.
#[async_trait]
pub trait SpatialStore: Send + Sync {
    /// All hospitals with their precomputed nearest road.
    async fn hospital_sites(&self) -> Result<Vec<HospitalSite>>;

    /// Nearest road to a point.
    async fn nearest_road(&self, point: GeoPoint) -> Result<Option<ExternalId>>;

    /// Nearest road to a point whose id is not in `excluded`.
    async fn nearest_road_excluding(
        &self,
        point: GeoPoint,
        excluded: &HashSet<ExternalId>,
    ) -> Result<Option<ExternalId>>;

    /// GeoJSON polygon for a zone, if the store has one.
    async fn zone_geometry(&self, zone_id: ExternalId) -> Result<Option<serde_json::Value>>;

    /// GeoJSON geometry for a road, if the store has one.
    async fn road_geometry(&self, road_id: ExternalId) -> Result<Option<serde_json::Value>>;
}
