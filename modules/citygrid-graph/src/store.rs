//! Atomic publication of graph snapshots.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{error, info};

use citygrid_common::CityGridError;

use crate::snapshot::{GraphSnapshot, SnapshotBuilder};
use crate::traits::GraphSource;

/// Holds the current `GraphSnapshot` behind an atomic pointer swap.
///
/// Readers take an owned `Arc` and keep a consistent view for their whole
/// request even if a rebuild publishes a newer version meanwhile. Only one
/// rebuild runs at a time; rebuilds never block readers.
pub struct SnapshotStore {
    inner: ArcSwap<GraphSnapshot>,
    rebuilding: AtomicBool,
    next_version: AtomicU64,
}

impl SnapshotStore {
    /// Start with an empty version-0 snapshot; the first rebuild publishes
    /// version 1.
    pub fn empty() -> Self {
        Self {
            inner: ArcSwap::new(Arc::new(SnapshotBuilder::new(0).finish())),
            rebuilding: AtomicBool::new(false),
            next_version: AtomicU64::new(1),
        }
    }

    pub fn with_initial(initial: GraphSnapshot) -> Self {
        let next_version = initial.version() + 1;
        Self {
            inner: ArcSwap::new(Arc::new(initial)),
            rebuilding: AtomicBool::new(false),
            next_version: AtomicU64::new(next_version),
        }
    }

    /// Current snapshot as an owned `Arc`.
    pub fn current(&self) -> Arc<GraphSnapshot> {
        self.inner.load_full()
    }

    /// Rebuild the snapshot out-of-place from the source, then publish it
    /// with a single pointer swap. A failed fetch keeps the previous
    /// snapshot current. Returns the published version.
    pub async fn rebuild(&self, source: &dyn GraphSource) -> Result<u64, CityGridError> {
        if self
            .rebuilding
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CityGridError::RebuildConflict);
        }

        let result = self.rebuild_inner(source).await;
        self.rebuilding.store(false, Ordering::SeqCst);
        result
    }

    async fn rebuild_inner(&self, source: &dyn GraphSource) -> Result<u64, CityGridError> {
        let start = std::time::Instant::now();
        let version = self.next_version.load(Ordering::SeqCst);

        let nodes = source.fetch_nodes().await.map_err(|e| {
            error!(error = %e, "Graph source node fetch failed, keeping current snapshot");
            CityGridError::GraphSource(e.to_string())
        })?;
        let edges = source.fetch_edges().await.map_err(|e| {
            error!(error = %e, "Graph source edge fetch failed, keeping current snapshot");
            CityGridError::GraphSource(e.to_string())
        })?;

        let mut builder = SnapshotBuilder::new(version);
        for node in nodes {
            builder.insert_node(node);
        }
        for edge in edges {
            builder.insert_edge(edge);
        }
        let snapshot = builder.finish();

        info!(
            version,
            nodes = snapshot.node_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Graph snapshot published"
        );

        self.inner.store(Arc::new(snapshot));
        self.next_version.store(version + 1, Ordering::SeqCst);
        Ok(version)
    }
}
