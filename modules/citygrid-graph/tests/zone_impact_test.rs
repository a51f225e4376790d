use citygrid_graph::snapshot::SnapshotBuilder;
use citygrid_graph::traits::{EdgeRecord, NodeRecord};
use citygrid_graph::traverse::traverse;
use citygrid_graph::zones::aggregate;
use citygrid_graph::GraphSnapshot;

/// Roads 1–2–3 in a line plus isolated road 5; zone 10 owns {1, 2, 5},
/// zone 20 owns {3}.
fn two_zone_snapshot() -> GraphSnapshot {
    let mut builder = SnapshotBuilder::new(1);
    for id in [1, 2, 3, 5] {
        builder.insert_node(NodeRecord::road(id));
    }
    builder.insert_node(NodeRecord::zone(10, "Harbor District", 2400.0));
    builder.insert_node(NodeRecord::zone(20, "Mill Quarter", 900.0));
    builder.insert_edge(EdgeRecord::connects(1, 2));
    builder.insert_edge(EdgeRecord::connects(2, 3));
    builder.insert_edge(EdgeRecord::located_in(1, 10));
    builder.insert_edge(EdgeRecord::located_in(2, 10));
    builder.insert_edge(EdgeRecord::located_in(5, 10));
    builder.insert_edge(EdgeRecord::located_in(3, 20));
    builder.finish()
}

#[test]
fn severity_is_the_affected_share_of_the_zone_inventory() {
    let snapshot = two_zone_snapshot();
    // One hop from road 1 reaches {1, 2}; road 5 stays unreached but still
    // counts toward the zone's inventory.
    let hop_map = traverse(&snapshot, 1, 1).unwrap();
    let impacts = aggregate(&snapshot, &hop_map);

    assert_eq!(impacts.len(), 1);
    let zone = &impacts[0];
    assert_eq!(zone.zone_id, 10);
    assert_eq!(zone.zone_name, "Harbor District");
    assert_eq!(zone.affected_roads, 2);
    assert_eq!(zone.total_roads, 3);
    assert_eq!(zone.severity, 0.667);
}

#[test]
fn zones_are_ordered_by_severity_then_zone_id() {
    let snapshot = two_zone_snapshot();
    // Two hops from road 1 reaches {1, 2, 3}: zone 20 is fully affected
    // (1/1), zone 10 partially (2/3).
    let hop_map = traverse(&snapshot, 1, 2).unwrap();
    let impacts = aggregate(&snapshot, &hop_map);

    assert_eq!(impacts.len(), 2);
    assert_eq!(impacts[0].zone_id, 20);
    assert_eq!(impacts[0].severity, 1.0);
    assert_eq!(impacts[1].zone_id, 10);
    assert_eq!(impacts[1].severity, 0.667);
}

#[test]
fn equal_severity_ties_break_by_ascending_zone_id() {
    let mut builder = SnapshotBuilder::new(1);
    for id in [1, 2] {
        builder.insert_node(NodeRecord::road(id));
    }
    builder.insert_node(NodeRecord::zone(30, "East Bank", 100.0));
    builder.insert_node(NodeRecord::zone(20, "West Bank", 100.0));
    builder.insert_edge(EdgeRecord::connects(1, 2));
    builder.insert_edge(EdgeRecord::located_in(1, 30));
    builder.insert_edge(EdgeRecord::located_in(2, 20));
    let snapshot = builder.finish();

    let hop_map = traverse(&snapshot, 1, 1).unwrap();
    let impacts = aggregate(&snapshot, &hop_map);

    assert_eq!(impacts.len(), 2);
    assert_eq!(impacts[0].severity, impacts[1].severity);
    assert_eq!(impacts[0].zone_id, 20);
    assert_eq!(impacts[1].zone_id, 30);
}

#[test]
fn roads_without_a_zone_are_silently_skipped() {
    let mut builder = SnapshotBuilder::new(1);
    for id in [1, 2] {
        builder.insert_node(NodeRecord::road(id));
    }
    builder.insert_edge(EdgeRecord::connects(1, 2));
    let snapshot = builder.finish();

    let hop_map = traverse(&snapshot, 1, 1).unwrap();
    let impacts = aggregate(&snapshot, &hop_map);

    assert!(impacts.is_empty());
}

#[test]
fn severity_stays_within_unit_interval() {
    let snapshot = two_zone_snapshot();
    let hop_map = traverse(&snapshot, 1, 4).unwrap();

    for zone in aggregate(&snapshot, &hop_map) {
        assert!(zone.severity >= 0.0);
        assert!(zone.severity <= 1.0);
    }
}

#[test]
fn unreached_zones_do_not_appear() {
    let snapshot = two_zone_snapshot();
    let hop_map = traverse(&snapshot, 1, 0).unwrap();
    let impacts = aggregate(&snapshot, &hop_map);

    assert_eq!(impacts.len(), 1);
    assert_eq!(impacts[0].zone_id, 10);
    assert_eq!(impacts[0].affected_roads, 1);
}
