use storage_contracts::StorageErrorKind;
use storage_engine::AllocationQuery;
use storage_testing::errors::Result;
use storage_testing::harness::{HarnessContext, HarnessTest, ensure_eq};
use storage_types::{CylRegion, PartitionType};

use crate::common::fixtures;

pub struct NextFreePrimary;

impl HarnessTest for NextFreePrimary {
    fn id(&self) -> &'static str {
        "allocation.next_free_partition.fills_gap"
    }

    fn suite(&self) -> &'static str {
        "allocation"
    }

    fn required_spec(&self) -> &'static str {
        "two-slots"
    }

    fn execute(&self, ctx: &HarnessContext) -> Result<()> {
        let engine = fixtures::engine_for(ctx)?;

        let slot = engine
            .next_free_partition("sda", PartitionType::Primary)
            .map_err(fixtures::engine_error)?;
        ensure_eq(slot.number, 2, "primary number")?;
        ensure_eq(slot.device.as_str(), "/dev/sda2", "primary device")?;

        let extended = engine
            .next_free_partition("/dev/sda", PartitionType::Extended)
            .map_err(fixtures::engine_error)?;
        ensure_eq(extended.number, 2, "extended number")?;

        fixtures::expect_kind(
            engine.next_free_partition("sda", PartitionType::Logical),
            StorageErrorKind::NoExtendedPartition,
            "logical without extended",
        )?;

        let regions: Vec<CylRegion> = engine
            .unused_partition_slots("sda")
            .map_err(fixtures::engine_error)?
            .iter()
            .map(|slot| slot.region)
            .collect();
        ensure_eq(
            regions,
            vec![CylRegion::new(250, 250), CylRegion::new(750, 250)],
            "unused regions",
        )
    }
}
