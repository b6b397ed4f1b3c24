use std::collections::HashSet;
use std::sync::Arc;

use storage_testing::harness::{self, TestRef};
use storage_testing::spec;

pub mod allocation;
pub mod common;
pub mod graph;
pub mod mount;
pub mod topology;

pub fn instantiate_tests() -> Vec<TestRef> {
    vec![
        Arc::new(topology::expected_counts::ExpectedCounts {
            id: "topology.expected_counts.two_slots",
            spec: "two-slots",
        }),
        Arc::new(topology::expected_counts::ExpectedCounts {
            id: "topology.expected_counts.full_disk",
            spec: "full-disk",
        }),
        Arc::new(topology::expected_counts::ExpectedCounts {
            id: "topology.expected_counts.msdos_extended",
            spec: "msdos-extended",
        }),
        Arc::new(topology::expected_counts::ExpectedCounts {
            id: "topology.expected_counts.lvm_on_md",
            spec: "lvm-on-md",
        }),
        Arc::new(topology::partitions_in_cylinder_order::PartitionsInCylinderOrder),
        Arc::new(topology::used_by_aggregates::UsedByAggregates),
        Arc::new(topology::container_listing::ContainerListing),
        Arc::new(allocation::next_free_primary::NextFreePrimary),
        Arc::new(allocation::full_disk_rejects::FullDiskRejects),
        Arc::new(allocation::logical_in_extended::LogicalInExtended),
        Arc::new(allocation::next_free_md::NextFreeMd),
        Arc::new(mount::fstab_spec_by_scheme::FstabSpecByScheme),
        Arc::new(mount::change_mount_by_rules::ChangeMountByRules),
        Arc::new(mount::mount_point_overrides::MountPointOverrides),
        Arc::new(graph::dot_edge_counts::DotEdgeCounts),
        Arc::new(graph::neighbors_follow_stack::NeighborsFollowStack),
    ]
}

#[test]
fn registered_ids_are_unique() {
    let tests = instantiate_tests();
    let ids: HashSet<_> = tests.iter().map(|test| test.id()).collect();
    assert_eq!(ids.len(), tests.len());
}

#[test]
fn every_fixture_has_a_case() {
    let required: HashSet<_> = instantiate_tests()
        .iter()
        .map(|test| test.required_spec())
        .collect();

    for name in spec::list_specs().unwrap() {
        assert!(required.contains(name.as_str()), "fixture {name} is unused");
    }
}

#[test]
fn registered_cases_pass() {
    let outcomes = harness::run(&instantiate_tests());
    let failures: Vec<String> = outcomes
        .iter()
        .filter(|outcome| !outcome.passed())
        .map(|outcome| {
            format!(
                "[{}] {}: {}",
                outcome.suite,
                outcome.id,
                outcome.error.as_deref().unwrap_or_default()
            )
        })
        .collect();

    assert!(failures.is_empty(), "failed cases:\n{}", failures.join("\n"));
}
