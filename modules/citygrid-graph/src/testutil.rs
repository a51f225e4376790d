//! In-memory collaborator doubles for tests. No database required.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use citygrid_common::{haversine_km, ExternalId, GeoPoint};

use crate::traits::{EdgeRecord, GraphSource, HospitalSite, NodeRecord, SpatialStore};

/// Serves a fixed set of node and edge records.
pub struct MemoryGraphSource {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

impl MemoryGraphSource {
    pub fn new(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Self {
        Self { nodes, edges }
    }
}

#[async_trait]
impl GraphSource for MemoryGraphSource {
    async fn fetch_nodes(&self) -> Result<Vec<NodeRecord>> {
        Ok(self.nodes.clone())
    }

    async fn fetch_edges(&self) -> Result<Vec<EdgeRecord>> {
        Ok(self.edges.clone())
    }
}

/// Graph source that always fails, for rebuild-failure tests.
pub struct FailingGraphSource;

#[async_trait]
impl GraphSource for FailingGraphSource {
    async fn fetch_nodes(&self) -> Result<Vec<NodeRecord>> {
        Err(anyhow!("graph store unreachable"))
    }

    async fn fetch_edges(&self) -> Result<Vec<EdgeRecord>> {
        Err(anyhow!("graph store unreachable"))
    }
}

/// Brute-force spatial index over road points and hospital sites.
///
/// Distance is haversine over each road's representative point. Ties break
/// toward the smaller road id so lookups are deterministic. The production
/// store would use a real geometry index; tests only need the contract.
#[derive(Default)]
pub struct MemorySpatialIndex {
    roads: HashMap<ExternalId, GeoPoint>,
    hospitals: Vec<HospitalSite>,
    zone_geometries: HashMap<ExternalId, serde_json::Value>,
    road_geometries: HashMap<ExternalId, serde_json::Value>,
}

impl MemorySpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_road(mut self, id: ExternalId, lat: f64, lon: f64) -> Self {
        self.roads.insert(id, GeoPoint { lat, lon });
        self
    }

    pub fn with_hospital(
        mut self,
        id: ExternalId,
        name: &str,
        lat: f64,
        lon: f64,
        nearest_road: ExternalId,
    ) -> Self {
        self.hospitals.push(HospitalSite {
            id,
            name: name.to_string(),
            location: GeoPoint { lat, lon },
            nearest_road,
        });
        self
    }

    pub fn with_zone_geometry(mut self, id: ExternalId, geometry: serde_json::Value) -> Self {
        self.zone_geometries.insert(id, geometry);
        self
    }

    pub fn with_road_geometry(mut self, id: ExternalId, geometry: serde_json::Value) -> Self {
        self.road_geometries.insert(id, geometry);
        self
    }

    fn nearest(
        &self,
        point: GeoPoint,
        excluded: Option<&HashSet<ExternalId>>,
    ) -> Option<ExternalId> {
        self.roads
            .iter()
            .filter(|(id, _)| excluded.map_or(true, |set| !set.contains(*id)))
            .min_by(|a, b| {
                haversine_km(point, *a.1)
                    .total_cmp(&haversine_km(point, *b.1))
                    .then(a.0.cmp(b.0))
            })
            .map(|(&id, _)| id)
    }
}

#[async_trait]
impl SpatialStore for MemorySpatialIndex {
    async fn hospital_sites(&self) -> Result<Vec<HospitalSite>> {
        Ok(self.hospitals.clone())
    }

    async fn nearest_road(&self, point: GeoPoint) -> Result<Option<ExternalId>> {
        Ok(self.nearest(point, None))
    }

    async fn nearest_road_excluding(
        &self,
        point: GeoPoint,
        excluded: &HashSet<ExternalId>,
    ) -> Result<Option<ExternalId>> {
        Ok(self.nearest(point, Some(excluded)))
    }

    async fn zone_geometry(&self, zone_id: ExternalId) -> Result<Option<serde_json::Value>> {
        Ok(self.zone_geometries.get(&zone_id).cloned())
    }

    async fn road_geometry(&self, road_id: ExternalId) -> Result<Option<serde_json::Value>> {
        Ok(self.road_geometries.get(&road_id).cloned())
    }
}

/// Spatial store that always fails, for collaborator-outage tests.
pub struct UnavailableSpatialStore;

#[async_trait]
impl SpatialStore for UnavailableSpatialStore {
    async fn hospital_sites(&self) -> Result<Vec<HospitalSite>> {
        Err(anyhow!("spatial store unreachable"))
    }

    async fn nearest_road(&self, _point: GeoPoint) -> Result<Option<ExternalId>> {
        Err(anyhow!("spatial store unreachable"))
    }

    async fn nearest_road_excluding(
        &self,
        _point: GeoPoint,
        _excluded: &HashSet<ExternalId>,
    ) -> Result<Option<ExternalId>> {
        Err(anyhow!("spatial store unreachable"))
    }

    async fn zone_geometry(&self, _zone_id: ExternalId) -> Result<Option<serde_json::Value>> {
        Err(anyhow!("spatial store unreachable"))
    }

    async fn road_geometry(&self, _road_id: ExternalId) -> Result<Option<serde_json::Value>> {
        Err(anyhow!("spatial store unreachable"))
    }
}

/// Wraps an inner store and delays every call, for timeout tests.
pub struct DelayedSpatialStore {
    inner: MemorySpatialIndex,
    delay: Duration,
}

impl DelayedSpatialStore {
    pub fn new(inner: MemorySpatialIndex, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl SpatialStore for DelayedSpatialStore {
    async fn hospital_sites(&self) -> Result<Vec<HospitalSite>> {
        tokio::time::sleep(self.delay).await;
        self.inner.hospital_sites().await
    }

    async fn nearest_road(&self, point: GeoPoint) -> Result<Option<ExternalId>> {
        tokio::time::sleep(self.delay).await;
        self.inner.nearest_road(point).await
    }

    async fn nearest_road_excluding(
        &self,
        point: GeoPoint,
        excluded: &HashSet<ExternalId>,
    ) -> Result<Option<ExternalId>> {
        tokio::time::sleep(self.delay).await;
        self.inner.nearest_road_excluding(point, excluded).await
    }

    async fn zone_geometry(&self, zone_id: ExternalId) -> Result<Option<serde_json::Value>> {
        tokio::time::sleep(self.delay).await;
        self.inner.zone_geometry(zone_id).await
    }

    async fn road_geometry(&self, road_id: ExternalId) -> Result<Option<serde_json::Value>> {
        tokio::time::sleep(self.delay).await;
        self.inner.road_geometry(road_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn nearest_road_orders_by_distance() {
        let index = MemorySpatialIndex::new()
            .with_road(1, 23.01, 72.5)
            .with_road(2, 23.02, 72.5)
            .with_road(3, 23.03, 72.5);
        let point = GeoPoint {
            lat: 23.021,
            lon: 72.5,
        };

        assert_eq!(index.nearest_road(point).await.unwrap(), Some(2));

        let excluded: HashSet<i64> = [2].into_iter().collect();
        assert_eq!(
            index
                .nearest_road_excluding(point, &excluded)
                .await
                .unwrap(),
            Some(3)
        );
    }

    #[tokio::test]
    async fn geometry_lookups_return_only_stored_rows() {
        let geometry = serde_json::json!({ "type": "LineString", "coordinates": [] });
        let index = MemorySpatialIndex::new().with_road_geometry(5, geometry.clone());

        assert_eq!(index.road_geometry(5).await.unwrap(), Some(geometry));
        assert_eq!(index.road_geometry(6).await.unwrap(), None);
        assert_eq!(index.zone_geometry(5).await.unwrap(), None);
    }
}
