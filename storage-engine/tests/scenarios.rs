//! End-to-end query scenarios against loaded snapshots

use storage_engine::{
    AllocationQuery, EngineConfig, MountPolicyQuery, StorageEngine, StorageErrorKind,
    TopologyQuery,
};
use storage_testing::builder::TopologyBuilder;
use storage_testing::spec::load_by_name;
use storage_types::{DiskLabel, FsType, MountByType, PartitionType, StorageObject};

fn engine(default_mount_by: MountByType) -> StorageEngine {
    StorageEngine::new(&EngineConfig {
        default_mount_by,
        ..EngineConfig::default()
    })
}

#[test]
fn full_table_replaces_free_slot() {
    let engine = StorageEngine::default();
    engine
        .load(load_by_name("two-slots").unwrap().facts)
        .unwrap();

    let slot = engine
        .next_free_partition("/dev/sda", PartitionType::Primary)
        .unwrap();
    assert_eq!(slot.number, 2);

    let full = TopologyBuilder::new()
        .disk("sda", DiskLabel::Msdos, 1000)
        .partition("sda", 1, 0, 250, PartitionType::Primary)
        .partition("sda", 2, 250, 250, PartitionType::Primary)
        .partition("sda", 3, 500, 250, PartitionType::Primary)
        .partition("sda", 4, 750, 250, PartitionType::Primary)
        .build();
    engine.load(full).unwrap();

    let err = engine
        .next_free_partition("/dev/sda", PartitionType::Primary)
        .unwrap_err();
    assert_eq!(err.kind(), StorageErrorKind::DiskFull);
}

#[test]
fn override_replaces_process_default() {
    let engine = engine(MountByType::Uuid);
    engine
        .load(
            TopologyBuilder::new()
                .disk("sda", DiskLabel::Gpt, 1000)
                .partition("sda", 1, 0, 500, PartitionType::Primary)
                .mount("sda1", FsType::Ext4, "/")
                .build(),
        )
        .unwrap();

    assert_eq!(engine.get_mount_by("/dev/sda1").unwrap(), MountByType::Uuid);

    engine
        .change_mount_by("/dev/sda1", MountByType::Label)
        .unwrap();
    assert_eq!(engine.get_mount_by("/dev/sda1").unwrap(), MountByType::Label);

    // a changed default does not replace the override
    engine.set_default_mount_by(MountByType::Device);
    assert_eq!(engine.get_mount_by("/dev/sda1").unwrap(), MountByType::Label);
}

#[test]
fn rejected_batch_keeps_previous_snapshot() {
    let engine = StorageEngine::default();
    let first = engine
        .load(load_by_name("msdos-extended").unwrap().facts)
        .unwrap();

    let overlapping = TopologyBuilder::new()
        .disk("sda", DiskLabel::Gpt, 100)
        .partition("sda", 1, 0, 60, PartitionType::Primary)
        .partition("sda", 2, 50, 50, PartitionType::Primary)
        .build();
    let err = engine.load(overlapping).unwrap_err();
    assert_eq!(err.kind(), StorageErrorKind::InconsistentTopology);

    assert_eq!(engine.snapshot().id(), first.id());
    assert!(engine.get_disk_info("nvme0n1").is_ok());
}

#[test]
fn dangling_references_are_rejected() {
    let engine = StorageEngine::default();

    let orphan_lv = TopologyBuilder::new()
        .disk("sda", DiskLabel::Gpt, 100)
        .lv("system", "root", 1024)
        .build();
    let err = engine.load(orphan_lv).unwrap_err();
    assert_eq!(err.kind(), StorageErrorKind::InconsistentTopology);

    let missing_member = TopologyBuilder::new()
        .disk("sda", DiskLabel::Gpt, 100)
        .md(0, storage_types::MdLevel::Raid1, &["sda1", "sdb1"])
        .build();
    let err = engine.load(missing_member).unwrap_err();
    assert_eq!(err.kind(), StorageErrorKind::InconsistentTopology);

    assert!(engine.get_containers().is_empty());
}

#[test]
fn every_parent_resolves_after_load() {
    let engine = StorageEngine::default();
    let snapshot = engine
        .load(load_by_name("lvm-on-md").unwrap().facts)
        .unwrap();

    for object in snapshot.objects() {
        if let Some(parent) = object.parent() {
            assert!(snapshot.lookup(parent).is_some(), "{parent} is dangling");
        }
        for member in object.members() {
            assert!(snapshot.lookup(member).is_some(), "{member} is dangling");
        }
    }
}

#[test]
fn md_arrays_answer_volume_queries() {
    let engine = StorageEngine::default();
    engine
        .load(load_by_name("lvm-on-md").unwrap().facts)
        .unwrap();

    assert!(matches!(
        engine.get_volume("/dev/md2").unwrap(),
        StorageObject::Md(_)
    ));
    assert_eq!(
        engine.get_mount_point("md2").unwrap().as_deref(),
        Some("/backup")
    );
    // arrays are containers, never listed twice
    assert!(
        engine
            .get_volumes()
            .iter()
            .all(|v| !matches!(v, StorageObject::Md(_)))
    );
}

#[test]
fn queries_before_first_load_see_an_empty_catalog() {
    let engine = StorageEngine::default();

    assert!(engine.get_containers().is_empty());
    assert_eq!(engine.next_free_md().number, 0);
    assert_eq!(
        engine.get_disk_info("sda").unwrap_err().kind(),
        StorageErrorKind::NotFound
    );
}

#[test]
fn human_sizes_follow_the_unit_base() {
    assert_eq!(
        StorageEngine::byte_to_human_string(1024u64, true, 1, false).unwrap(),
        "1 KiB"
    );
    assert_eq!(
        StorageEngine::byte_to_human_string(1000u64, false, 1, false).unwrap(),
        "1 K"
    );
    assert_eq!(
        StorageEngine::byte_to_human_string(-1i64, true, 1, false)
            .unwrap_err()
            .kind(),
        StorageErrorKind::InvalidArgument
    );
}
