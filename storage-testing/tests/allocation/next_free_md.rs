use storage_engine::AllocationQuery;
use storage_testing::errors::Result;
use storage_testing::harness::{HarnessContext, HarnessTest, ensure_eq};

use crate::common::fixtures;

pub struct NextFreeMd;

impl HarnessTest for NextFreeMd {
    fn id(&self) -> &'static str {
        "allocation.next_free_md.lowest_gap"
    }

    fn suite(&self) -> &'static str {
        "allocation"
    }

    fn required_spec(&self) -> &'static str {
        "lvm-on-md"
    }

    fn execute(&self, ctx: &HarnessContext) -> Result<()> {
        let engine = fixtures::engine_for(ctx)?;

        let slot = engine.next_free_md();
        ensure_eq(slot.number, 1, "md number")?;
        ensure_eq(slot.device.as_str(), "/dev/md1", "md device")
    }
}
