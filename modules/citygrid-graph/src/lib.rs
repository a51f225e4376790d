//! Impact propagation and risk scoring over a road-connectivity graph.
//!
//! A `SnapshotStore` holds an immutable, versioned `GraphSnapshot` built
//! from a `GraphSource` and published by atomic pointer swap. The
//! `ImpactService` answers impact queries against whichever snapshot it
//! acquires at entry: bounded BFS reachability, zone severity aggregation,
//! hospital risk classification, and reroute selection via a `SpatialStore`.

pub mod hospitals;
pub mod reroute;
pub mod service;
pub mod snapshot;
pub mod store;
pub mod testutil;
pub mod traits;
pub mod traverse;
pub mod views;
pub mod zones;

pub use reroute::RerouteSuggestion;
pub use service::ImpactService;
pub use snapshot::{GraphSnapshot, SnapshotBuilder};
pub use store::SnapshotStore;
pub use traits::{EdgeRecord, GraphSource, HospitalSite, NodeRecord, SpatialStore};
pub use traverse::{traverse, HopMap};
pub use zones::{aggregate, ZoneImpact};
