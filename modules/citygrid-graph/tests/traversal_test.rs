use citygrid_common::{CityGridError, NodeKind};
use citygrid_graph::snapshot::SnapshotBuilder;
use citygrid_graph::traits::{EdgeRecord, NodeRecord};
use citygrid_graph::traverse::traverse;
use citygrid_graph::GraphSnapshot;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Roads 1–2–3–4 in a line.
fn chain_snapshot() -> GraphSnapshot {
    let mut builder = SnapshotBuilder::new(1);
    for id in [1, 2, 3, 4] {
        builder.insert_node(NodeRecord::road(id));
    }
    builder.insert_edge(EdgeRecord::connects(1, 2));
    builder.insert_edge(EdgeRecord::connects(2, 3));
    builder.insert_edge(EdgeRecord::connects(3, 4));
    builder.finish()
}

#[test]
fn zero_hops_yields_only_the_root() {
    let snapshot = chain_snapshot();
    let hop_map = traverse(&snapshot, 1, 0).unwrap();

    assert_eq!(hop_map.len(), 1);
    assert_eq!(hop_map.hop(1), Some(0));
}

#[test]
fn chain_bounded_at_two_hops_excludes_the_far_end() {
    let snapshot = chain_snapshot();
    let hop_map = traverse(&snapshot, 1, 2).unwrap();

    assert_eq!(hop_map.hop(1), Some(0));
    assert_eq!(hop_map.hop(2), Some(1));
    assert_eq!(hop_map.hop(3), Some(2));
    assert_eq!(hop_map.hop(4), None);
    assert_eq!(hop_map.len(), 3);
}

#[test]
fn hop_counts_are_minimal_over_multiple_paths() {
    // Ring 1–2–3–4–1: road 3 is reachable in two hops both ways,
    // road 4 directly.
    let mut builder = SnapshotBuilder::new(1);
    for id in [1, 2, 3, 4] {
        builder.insert_node(NodeRecord::road(id));
    }
    builder.insert_edge(EdgeRecord::connects(1, 2));
    builder.insert_edge(EdgeRecord::connects(2, 3));
    builder.insert_edge(EdgeRecord::connects(3, 4));
    builder.insert_edge(EdgeRecord::connects(4, 1));
    let snapshot = builder.finish();

    let hop_map = traverse(&snapshot, 1, 3).unwrap();
    assert_eq!(hop_map.hop(2), Some(1));
    assert_eq!(hop_map.hop(4), Some(1));
    assert_eq!(hop_map.hop(3), Some(2));
}

#[test]
fn expanding_the_horizon_only_adds_roads() {
    let snapshot = chain_snapshot();
    let narrow = traverse(&snapshot, 1, 1).unwrap();
    let wide = traverse(&snapshot, 1, 3).unwrap();

    assert!(narrow.len() <= wide.len());
    for (road_id, hop) in narrow.iter() {
        assert_eq!(wide.hop(road_id), Some(hop));
    }
}

#[test]
fn repeated_traversal_is_identical() {
    let snapshot = chain_snapshot();
    let first = traverse(&snapshot, 2, 2).unwrap();
    let second = traverse(&snapshot, 2, 2).unwrap();

    assert_eq!(first.len(), second.len());
    for (road_id, hop) in first.iter() {
        assert_eq!(second.hop(road_id), Some(hop));
    }
}

#[test]
fn unknown_root_is_not_found() {
    let snapshot = chain_snapshot();
    let err = traverse(&snapshot, 99, 2).unwrap_err();

    match err {
        CityGridError::NotFound { kind, id } => {
            assert_eq!(kind, NodeKind::Road);
            assert_eq!(id, 99);
        }
        other => panic!("expected NotFound, got {other}"),
    }
}

#[test]
fn a_zone_sharing_the_roots_id_is_not_a_road() {
    // Identity is (kind, id); a Zone with the same numeric id must not
    // satisfy a Road lookup.
    let mut builder = SnapshotBuilder::new(1);
    builder.insert_node(NodeRecord::zone(7, "Riverside", 1250.0));
    let snapshot = builder.finish();

    assert!(matches!(
        traverse(&snapshot, 7, 1),
        Err(CityGridError::NotFound { .. })
    ));
}

#[test]
fn dangling_edges_are_skipped_without_aborting_the_build() {
    init_tracing();

    let mut builder = SnapshotBuilder::new(1);
    builder.insert_node(NodeRecord::road(1));
    builder.insert_node(NodeRecord::road(2));
    builder.insert_edge(EdgeRecord::connects(1, 2));
    // Endpoint 42 was never inserted.
    builder.insert_edge(EdgeRecord::connects(2, 42));
    let snapshot = builder.finish();

    let hop_map = traverse(&snapshot, 1, 5).unwrap();
    assert_eq!(hop_map.len(), 2);
    assert!(!hop_map.contains(42));
}

#[test]
fn traversal_ignores_non_connectivity_relations() {
    // A road linked to its zone must not leak the zone into the hop map.
    let mut builder = SnapshotBuilder::new(1);
    builder.insert_node(NodeRecord::road(1));
    builder.insert_node(NodeRecord::road(2));
    builder.insert_node(NodeRecord::zone(10, "Old Town", 800.0));
    builder.insert_edge(EdgeRecord::connects(1, 2));
    builder.insert_edge(EdgeRecord::located_in(1, 10));
    builder.insert_edge(EdgeRecord::located_in(2, 10));
    let snapshot = builder.finish();

    let hop_map = traverse(&snapshot, 1, 5).unwrap();
    assert_eq!(hop_map.len(), 2);
    assert!(!hop_map.contains(10));
}

#[test]
fn isolated_root_reaches_nothing_beyond_itself() {
    let mut builder = SnapshotBuilder::new(1);
    builder.insert_node(NodeRecord::road(1));
    let snapshot = builder.finish();

    let hop_map = traverse(&snapshot, 1, 10).unwrap();
    assert_eq!(hop_map.len(), 1);
    assert_eq!(hop_map.hop(1), Some(0));
}
