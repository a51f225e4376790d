//! The impact service: validates requests, composes traversal, aggregation,
//! classification, and reroute selection into the per-endpoint views.
//!
//! Every query acquires the current snapshot exactly once at entry and
//! computes against that version end-to-end. Spatial store calls run under
//! a per-call timeout; where the data is an enrichment (zone geometry,
//! reroute suggestions) a failure degrades the response, where it is
//! essential (the hospital nearest-road join) it fails the request.
//!
//! Cancellation is by drop: spatial calls are awaited sequentially, so a
//! dropped request future issues no further lookups and its partial results
//! are discarded with it.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use citygrid_common::{CityGridError, Config, ExternalId, NodeKind, RiskTier};

use crate::hospitals::{priority_score, risk_tier, summary_explanation, tier_reason};
use crate::reroute::select_reroute;
use crate::store::SnapshotStore;
use crate::traits::SpatialStore;
use crate::traverse::traverse;
use crate::views::{
    AffectedEdge, AffectedRoad, ConstructionImpactView, HospitalImpactEntry, HospitalImpactView,
    ImpactSummaryView, JunctionImpactView, ProjectImpact, RoadImpactView, SummaryEntry,
    ZoneImpactEntry, ZoneImpactView,
};
use crate::zones;

pub struct ImpactService {
    store: Arc<SnapshotStore>,
    spatial: Arc<dyn SpatialStore>,
    config: Config,
}

impl ImpactService {
    pub fn new(store: Arc<SnapshotStore>, spatial: Arc<dyn SpatialStore>, config: Config) -> Self {
        Self {
            store,
            spatial,
            config,
        }
    }

    /// Affected roads and connectivity edges within the hop horizon.
    pub async fn road_impact(
        &self,
        root: ExternalId,
        hops: Option<i64>,
    ) -> Result<RoadImpactView, CityGridError> {
        let max_hops = self.resolve_hops(hops, self.config.default_hops_road)?;
        let snapshot = self.store.current();
        info!(
            request = %Uuid::new_v4(),
            root,
            max_hops,
            version = snapshot.version(),
            "Road impact query"
        );

        let hop_map = traverse(&snapshot, root, max_hops)?;

        let mut roads: Vec<AffectedRoad> = hop_map
            .iter()
            .map(|(road_id, hop)| {
                let name = snapshot
                    .lookup(NodeKind::Road, road_id)
                    .and_then(|handle| snapshot.node(handle).name.clone());
                AffectedRoad { road_id, hop, name }
            })
            .collect();
        roads.sort_by_key(|road| (road.hop, road.road_id));

        let mut edges = Vec::new();
        for road in &roads {
            let Some(handle) = snapshot.lookup(NodeKind::Road, road.road_id) else {
                continue;
            };
            for &next in snapshot.connected_roads(handle) {
                let neighbor = snapshot.node(next).id;
                if road.road_id < neighbor && hop_map.contains(neighbor) {
                    edges.push(AffectedEdge {
                        from: road.road_id,
                        to: neighbor,
                    });
                }
            }
        }
        edges.sort_by_key(|edge| (edge.from, edge.to));

        Ok(RoadImpactView {
            root,
            max_hops,
            roads,
            edges,
        })
    }

    /// Zone severities for the reached roads, enriched with zone geometry.
    pub async fn zone_impact(
        &self,
        root: ExternalId,
        hops: Option<i64>,
    ) -> Result<ZoneImpactView, CityGridError> {
        let max_hops = self.resolve_hops(hops, self.config.default_hops_impact)?;
        let snapshot = self.store.current();
        info!(
            request = %Uuid::new_v4(),
            root,
            max_hops,
            version = snapshot.version(),
            "Zone impact query"
        );

        let hop_map = traverse(&snapshot, root, max_hops)?;
        let impacts = zones::aggregate(&snapshot, &hop_map);

        let mut entries = Vec::with_capacity(impacts.len());
        let mut degraded = false;
        for impact in impacts {
            if degraded {
                entries.push(ZoneImpactEntry {
                    impact,
                    geometry: None,
                });
                continue;
            }
            match self
                .spatial_call("zone geometry", self.spatial.zone_geometry(impact.zone_id))
                .await
            {
                Ok(Some(geometry)) => entries.push(ZoneImpactEntry {
                    impact,
                    geometry: Some(geometry),
                }),
                // No geometry row for this zone: the entry is excluded.
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        error = %e,
                        zone_id = impact.zone_id,
                        "Zone geometry unavailable, degrading to geometry-less entries"
                    );
                    degraded = true;
                    entries.push(ZoneImpactEntry {
                        impact,
                        geometry: None,
                    });
                }
            }
        }

        Ok(ZoneImpactView {
            root,
            max_hops,
            zones: entries,
        })
    }

    /// Hospitals whose nearest road was reached, classified by hop distance
    /// and given a reroute suggestion. Sorted by ascending hop.
    pub async fn hospital_impact(
        &self,
        root: ExternalId,
        hops: Option<i64>,
    ) -> Result<HospitalImpactView, CityGridError> {
        let max_hops = self.resolve_hops(hops, self.config.default_hops_impact)?;
        let snapshot = self.store.current();
        info!(
            request = %Uuid::new_v4(),
            root,
            max_hops,
            version = snapshot.version(),
            "Hospital impact query"
        );

        let hop_map = traverse(&snapshot, root, max_hops)?;

        // The nearest-road join is essential: without it no hospital can be
        // placed relative to the failure, so a spatial failure fails the request.
        let sites = self
            .spatial_call("hospital sites", self.spatial.hospital_sites())
            .await?;

        let affected: HashSet<ExternalId> = hop_map.road_ids().collect();

        let mut hospitals = Vec::new();
        for site in sites {
            let Some(hop) = hop_map.hop(site.nearest_road) else {
                continue;
            };
            let tier = risk_tier(hop);
            let reroute = match self
                .spatial_call(
                    "reroute candidate",
                    select_reroute(self.spatial.as_ref(), site.location, &affected),
                )
                .await
            {
                Ok(candidate) => candidate,
                Err(e) => {
                    warn!(
                        error = %e,
                        hospital_id = site.id,
                        "Reroute lookup unavailable, omitting suggestion"
                    );
                    None
                }
            };
            hospitals.push(HospitalImpactEntry {
                hospital_id: site.id,
                name: site.name,
                location: site.location,
                hop,
                risk_tier: tier,
                reason: tier_reason(tier).to_string(),
                priority_score: priority_score(max_hops, hop),
                reroute,
            });
        }
        hospitals.sort_by_key(|hospital| (hospital.hop, hospital.hospital_id));

        Ok(HospitalImpactView {
            root,
            max_hops,
            hospitals,
        })
    }

    /// Top affected hospitals by priority score. Score only, no reroute.
    pub async fn impact_summary(
        &self,
        root: ExternalId,
        hops: Option<i64>,
    ) -> Result<ImpactSummaryView, CityGridError> {
        let max_hops = self.resolve_hops(hops, self.config.default_hops_impact)?;
        let snapshot = self.store.current();
        info!(
            request = %Uuid::new_v4(),
            root,
            max_hops,
            version = snapshot.version(),
            "Impact summary query"
        );

        let hop_map = traverse(&snapshot, root, max_hops)?;
        let sites = self
            .spatial_call("hospital sites", self.spatial.hospital_sites())
            .await?;

        let mut ranked: Vec<(u32, u32, ExternalId, String)> = sites
            .into_iter()
            .filter_map(|site| {
                let hop = hop_map.hop(site.nearest_road)?;
                Some((priority_score(max_hops, hop), hop, site.id, site.name))
            })
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));
        ranked.truncate(self.config.summary_limit);

        let top_hospitals = ranked
            .into_iter()
            .map(|(score, hop, _, name)| SummaryEntry {
                name,
                hop,
                priority_score: score,
                explanation: summary_explanation(hop).to_string(),
            })
            .collect();

        Ok(ImpactSummaryView {
            root,
            top_hospitals,
        })
    }

    /// Roads meeting at a junction. Snapshot-only, no spatial calls.
    pub fn junction_impact(
        &self,
        junction_id: ExternalId,
    ) -> Result<JunctionImpactView, CityGridError> {
        let snapshot = self.store.current();
        let junction =
            snapshot
                .lookup(NodeKind::Junction, junction_id)
                .ok_or(CityGridError::NotFound {
                    kind: NodeKind::Junction,
                    id: junction_id,
                })?;

        let mut connected_roads: Vec<ExternalId> = snapshot
            .roads_at_junction(junction)
            .iter()
            .map(|&handle| snapshot.node(handle).id)
            .collect();
        connected_roads.sort_unstable();
        let severity = connected_roads.len();

        Ok(JunctionImpactView {
            junction_id,
            connected_roads,
            severity,
        })
    }

    /// Construction projects affecting a road. Snapshot-only, no spatial calls.
    pub fn construction_impact(
        &self,
        road_id: ExternalId,
    ) -> Result<ConstructionImpactView, CityGridError> {
        let snapshot = self.store.current();
        let road = snapshot
            .lookup(NodeKind::Road, road_id)
            .ok_or(CityGridError::NotFound {
                kind: NodeKind::Road,
                id: road_id,
            })?;

        let mut projects: Vec<ProjectImpact> = snapshot
            .projects_affecting(road)
            .iter()
            .map(|&(handle, severity)| {
                let node = snapshot.node(handle);
                ProjectImpact {
                    project_id: node.id,
                    name: node.name.clone(),
                    severity,
                }
            })
            .collect();
        projects.sort_by_key(|project| project.project_id);

        let risk_level = if projects.is_empty() {
            RiskTier::Low
        } else {
            RiskTier::High
        };

        Ok(ConstructionImpactView {
            road_id,
            projects,
            risk_level,
        })
    }

    /// Requested hops must sit in `[0, max_hops]`; out-of-range values are a
    /// client error and never reach the traversal engine.
    fn resolve_hops(&self, requested: Option<i64>, default: u32) -> Result<u32, CityGridError> {
        let Some(hops) = requested else {
            return Ok(default);
        };
        if hops < 0 {
            return Err(CityGridError::Validation(format!(
                "hops must be non-negative, got {hops}"
            )));
        }
        if hops > i64::from(self.config.max_hops) {
            return Err(CityGridError::Validation(format!(
                "hops must be at most {}, got {hops}",
                self.config.max_hops
            )));
        }
        Ok(hops as u32)
    }

    async fn spatial_call<T, F>(&self, what: &str, call: F) -> Result<T, CityGridError>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        let timeout = Duration::from_millis(self.config.spatial_timeout_ms);
        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(CityGridError::SpatialStore(format!("{what}: {e}"))),
            Err(_) => Err(CityGridError::SpatialStore(format!("{what}: timed out"))),
        }
    }
}
