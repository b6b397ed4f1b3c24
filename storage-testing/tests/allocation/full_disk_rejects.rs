use storage_contracts::StorageErrorKind;
use storage_engine::AllocationQuery;
use storage_testing::errors::Result;
use storage_testing::harness::{HarnessContext, HarnessTest, ensure};
use storage_types::PartitionType;

use crate::common::fixtures;

pub struct FullDiskRejects;

impl HarnessTest for FullDiskRejects {
    fn id(&self) -> &'static str {
        "allocation.next_free_partition.disk_full"
    }

    fn suite(&self) -> &'static str {
        "allocation"
    }

    fn required_spec(&self) -> &'static str {
        "full-disk"
    }

    fn execute(&self, ctx: &HarnessContext) -> Result<()> {
        let engine = fixtures::engine_for(ctx)?;

        fixtures::expect_kind(
            engine.next_free_partition("sdb", PartitionType::Primary),
            StorageErrorKind::DiskFull,
            "primary on a full table",
        )?;
        fixtures::expect_kind(
            engine.next_free_partition("sdb", PartitionType::Extended),
            StorageErrorKind::DiskFull,
            "extended on a full table",
        )?;
        fixtures::expect_kind(
            engine.next_free_partition("sdc", PartitionType::Primary),
            StorageErrorKind::NotFound,
            "unknown disk",
        )?;

        let slots = engine
            .unused_partition_slots("sdb")
            .map_err(fixtures::engine_error)?;
        ensure(slots.is_empty(), format!("no free regions, got {slots:?}"))
    }
}
