//! Immutable in-memory graph snapshot and its builder.
//!
//! A snapshot is an arena of nodes indexed by integer handles, with
//! adjacency keyed by handle. It is built out-of-place by `SnapshotBuilder`
//! and never mutated afterwards; readers traverse one snapshot end-to-end.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use citygrid_common::{ExternalId, NodeKind, RelationKind};

use crate::traits::{EdgeRecord, NodeRecord};

/// Arena index of a node within one snapshot. Never crosses snapshots.
pub type Handle = usize;

/// Immutable, versioned view of the road network.
pub struct GraphSnapshot {
    version: u64,
    nodes: Vec<NodeRecord>,
    by_identity: HashMap<(NodeKind, ExternalId), Handle>,
    /// Road↔road adjacency (CONNECTS_TO). Symmetric, deduplicated.
    connects: Vec<Vec<Handle>>,
    /// Road → owning zone (LOCATED_IN). At most one per road.
    zone_of_road: HashMap<Handle, Handle>,
    /// Zone → total roads located in it, over the whole snapshot.
    zone_road_totals: HashMap<Handle, u32>,
    /// Junction → roads meeting at it (MEETS_AT).
    junction_roads: HashMap<Handle, Vec<Handle>>,
    /// Road → construction projects affecting it, with edge severity.
    affecting_projects: HashMap<Handle, Vec<(Handle, f64)>>,
    built_at: DateTime<Utc>,
}

impl GraphSnapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn node(&self, handle: Handle) -> &NodeRecord {
        &self.nodes[handle]
    }

    pub fn lookup(&self, kind: NodeKind, id: ExternalId) -> Option<Handle> {
        self.by_identity.get(&(kind, id)).copied()
    }

    pub fn connected_roads(&self, handle: Handle) -> &[Handle] {
        &self.connects[handle]
    }

    pub fn zone_of_road(&self, road: Handle) -> Option<Handle> {
        self.zone_of_road.get(&road).copied()
    }

    /// Full road inventory of a zone, independent of any traversal.
    pub fn zone_road_total(&self, zone: Handle) -> u32 {
        self.zone_road_totals.get(&zone).copied().unwrap_or(0)
    }

    pub fn roads_at_junction(&self, junction: Handle) -> &[Handle] {
        self.junction_roads
            .get(&junction)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn projects_affecting(&self, road: Handle) -> &[(Handle, f64)] {
        self.affecting_projects
            .get(&road)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn road_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Road)
            .count()
    }
}

/// Accumulates node and edge records, then freezes them into a `GraphSnapshot`.
///
/// Inconsistent input never aborts a build: dangling endpoints, endpoint-kind
/// mismatches, and duplicate identities are logged and skipped.
pub struct SnapshotBuilder {
    version: u64,
    nodes: Vec<NodeRecord>,
    by_identity: HashMap<(NodeKind, ExternalId), Handle>,
    connects: Vec<Vec<Handle>>,
    connect_seen: HashSet<(Handle, Handle)>,
    zone_of_road: HashMap<Handle, Handle>,
    junction_roads: HashMap<Handle, Vec<Handle>>,
    affecting_projects: HashMap<Handle, Vec<(Handle, f64)>>,
    skipped_edges: u64,
}

impl SnapshotBuilder {
    pub fn new(version: u64) -> Self {
        Self {
            version,
            nodes: Vec::new(),
            by_identity: HashMap::new(),
            connects: Vec::new(),
            connect_seen: HashSet::new(),
            zone_of_road: HashMap::new(),
            junction_roads: HashMap::new(),
            affecting_projects: HashMap::new(),
            skipped_edges: 0,
        }
    }

    pub fn insert_node(&mut self, node: NodeRecord) {
        let key = (node.kind, node.id);
        if self.by_identity.contains_key(&key) {
            warn!(kind = %node.kind, id = node.id, "Duplicate node identity, keeping first");
            return;
        }
        let handle = self.nodes.len();
        self.by_identity.insert(key, handle);
        self.nodes.push(node);
        self.connects.push(Vec::new());
    }

    pub fn insert_edge(&mut self, edge: EdgeRecord) {
        let Some(&from) = self.by_identity.get(&edge.from) else {
            self.skip_edge(&edge, "dangling from endpoint");
            return;
        };
        let Some(&to) = self.by_identity.get(&edge.to) else {
            self.skip_edge(&edge, "dangling to endpoint");
            return;
        };

        match edge.relation {
            RelationKind::ConnectsTo => self.insert_connects(&edge, from, to),
            RelationKind::LocatedIn => self.insert_located_in(&edge, from, to),
            RelationKind::MeetsAt => self.insert_meets_at(&edge, from, to),
            RelationKind::Affects => self.insert_affects(&edge, from, to),
        }
    }

    fn insert_connects(&mut self, edge: &EdgeRecord, from: Handle, to: Handle) {
        if !self.check_kinds(edge, from, to, NodeKind::Road, NodeKind::Road) {
            return;
        }
        if from == to {
            debug!(id = edge.from.1, "Self-referential CONNECTS_TO edge skipped");
            self.skipped_edges += 1;
            return;
        }
        // Inserted symmetrically; duplicates from a symmetric source dump collapse here.
        for (a, b) in [(from, to), (to, from)] {
            if self.connect_seen.insert((a, b)) {
                self.connects[a].push(b);
            }
        }
    }

    fn insert_located_in(&mut self, edge: &EdgeRecord, from: Handle, to: Handle) {
        if !self.check_kinds(edge, from, to, NodeKind::Road, NodeKind::Zone) {
            return;
        }
        if let Some(&existing) = self.zone_of_road.get(&from) {
            if existing != to {
                warn!(
                    road = edge.from.1,
                    zone = edge.to.1,
                    "Road already located in a zone, keeping first"
                );
                self.skipped_edges += 1;
            }
            return;
        }
        self.zone_of_road.insert(from, to);
    }

    fn insert_meets_at(&mut self, edge: &EdgeRecord, from: Handle, to: Handle) {
        if !self.check_kinds(edge, from, to, NodeKind::Road, NodeKind::Junction) {
            return;
        }
        let roads = self.junction_roads.entry(to).or_default();
        if !roads.contains(&from) {
            roads.push(from);
        }
    }

    fn insert_affects(&mut self, edge: &EdgeRecord, from: Handle, to: Handle) {
        if !self.check_kinds(edge, from, to, NodeKind::ConstructionProject, NodeKind::Road) {
            return;
        }
        let severity = edge.severity.or(self.nodes[from].risk_factor);
        let Some(severity) = severity else {
            self.skip_edge(edge, "AFFECTS edge with no severity or project risk factor");
            return;
        };
        let projects = self.affecting_projects.entry(to).or_default();
        if !projects.iter().any(|(project, _)| *project == from) {
            projects.push((from, severity));
        }
    }

    fn check_kinds(
        &mut self,
        edge: &EdgeRecord,
        from: Handle,
        to: Handle,
        expected_from: NodeKind,
        expected_to: NodeKind,
    ) -> bool {
        if self.nodes[from].kind != expected_from || self.nodes[to].kind != expected_to {
            self.skip_edge(edge, "endpoint kind mismatch");
            return false;
        }
        true
    }

    fn skip_edge(&mut self, edge: &EdgeRecord, why: &str) {
        warn!(
            relation = %edge.relation,
            from_kind = %edge.from.0,
            from_id = edge.from.1,
            to_kind = %edge.to.0,
            to_id = edge.to.1,
            "Edge skipped: {why}"
        );
        self.skipped_edges += 1;
    }

    pub fn finish(self) -> GraphSnapshot {
        let mut zone_road_totals: HashMap<Handle, u32> = HashMap::new();
        for &zone in self.zone_of_road.values() {
            *zone_road_totals.entry(zone).or_insert(0) += 1;
        }

        let snapshot = GraphSnapshot {
            version: self.version,
            nodes: self.nodes,
            by_identity: self.by_identity,
            connects: self.connects,
            zone_of_road: self.zone_of_road,
            zone_road_totals,
            junction_roads: self.junction_roads,
            affecting_projects: self.affecting_projects,
            built_at: Utc::now(),
        };

        info!(
            version = snapshot.version,
            nodes = snapshot.node_count(),
            roads = snapshot.road_count(),
            connect_edges = self.connect_seen.len() / 2,
            skipped_edges = self.skipped_edges,
            "Graph snapshot built"
        );

        snapshot
    }
}
