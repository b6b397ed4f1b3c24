use storage_engine::TopologyQuery;
use storage_testing::errors::Result;
use storage_testing::harness::{HarnessContext, HarnessTest, ensure, ensure_eq};

use crate::common::fixtures;

pub struct PartitionsInCylinderOrder;

impl HarnessTest for PartitionsInCylinderOrder {
    fn id(&self) -> &'static str {
        "topology.partitions.cylinder_order"
    }

    fn suite(&self) -> &'static str {
        "topology"
    }

    fn required_spec(&self) -> &'static str {
        "msdos-extended"
    }

    fn execute(&self, ctx: &HarnessContext) -> Result<()> {
        let engine = fixtures::engine_for(ctx)?;

        let by_name = engine
            .get_partition_info("nvme0n1")
            .map_err(fixtures::engine_error)?;
        let by_device = engine
            .get_partition_info("/dev/nvme0n1")
            .map_err(fixtures::engine_error)?;
        ensure_eq(&by_name, &by_device, "lookup by name and by device")?;

        let numbers: Vec<u32> = by_name.iter().map(|p| p.number).collect();
        ensure_eq(numbers, vec![1, 2, 5, 6], "partition order")?;

        let extended = &by_name[1];
        ensure(extended.is_extended(), "second partition is the extended one")?;
        for logical in by_name.iter().filter(|p| p.is_logical()) {
            ensure(
                extended.region().contains(&logical.region()),
                format!("{} inside the extended partition", logical.volume.name),
            )?;
        }

        Ok(())
    }
}
