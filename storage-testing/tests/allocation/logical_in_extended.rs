use storage_contracts::StorageErrorKind;
use storage_engine::AllocationQuery;
use storage_testing::errors::Result;
use storage_testing::harness::{HarnessContext, HarnessTest, ensure, ensure_eq};
use storage_types::{CylRegion, PartitionType};

use crate::common::fixtures;

pub struct LogicalInExtended;

impl HarnessTest for LogicalInExtended {
    fn id(&self) -> &'static str {
        "allocation.next_free_partition.logical"
    }

    fn suite(&self) -> &'static str {
        "allocation"
    }

    fn required_spec(&self) -> &'static str {
        "msdos-extended"
    }

    fn execute(&self, ctx: &HarnessContext) -> Result<()> {
        let engine = fixtures::engine_for(ctx)?;

        let logical = engine
            .next_free_partition("nvme0n1", PartitionType::Logical)
            .map_err(fixtures::engine_error)?;
        ensure_eq(logical.number, 7, "logical number")?;
        ensure_eq(logical.device.as_str(), "/dev/nvme0n1p7", "logical device")?;

        let primary = engine
            .next_free_partition("nvme0n1", PartitionType::Primary)
            .map_err(fixtures::engine_error)?;
        ensure_eq(primary.device.as_str(), "/dev/nvme0n1p3", "primary device")?;

        fixtures::expect_kind(
            engine.next_free_partition("nvme0n1", PartitionType::Extended),
            StorageErrorKind::InvalidArgument,
            "second extended partition",
        )?;

        let slots = engine
            .unused_partition_slots("nvme0n1")
            .map_err(fixtures::engine_error)?;
        ensure(
            slots.iter().all(|slot| slot.logical_slot && slot.logical_possible),
            "only logical regions are free",
        )?;
        let regions: Vec<CylRegion> = slots.iter().map(|slot| slot.region).collect();
        ensure_eq(
            regions,
            vec![CylRegion::new(800, 200), CylRegion::new(1600, 400)],
            "free regions inside the extended partition",
        )
    }
}
