use storage_contracts::StorageErrorKind;
use storage_engine::TopologyQuery;
use storage_testing::errors::Result;
use storage_testing::harness::{HarnessContext, HarnessTest, ensure_eq};
use storage_types::{UsedBy, UsedByKind};

use crate::common::fixtures;

pub struct UsedByAggregates;

fn used(kind: UsedByKind, name: &str) -> Option<UsedBy> {
    Some(UsedBy {
        kind,
        name: name.to_string(),
    })
}

impl HarnessTest for UsedByAggregates {
    fn id(&self) -> &'static str {
        "topology.used_by.aggregates"
    }

    fn suite(&self) -> &'static str {
        "topology"
    }

    fn required_spec(&self) -> &'static str {
        "lvm-on-md"
    }

    fn execute(&self, ctx: &HarnessContext) -> Result<()> {
        let engine = fixtures::engine_for(ctx)?;
        let used_by = |name: &str| engine.used_by(name).map_err(fixtures::engine_error);

        ensure_eq(used_by("sda2")?, used(UsedByKind::Md, "md0"), "sda2")?;
        ensure_eq(used_by("/dev/sdb4")?, used(UsedByKind::Md, "md2"), "sdb4")?;
        ensure_eq(used_by("md0")?, used(UsedByKind::Lvm, "system"), "md0")?;
        ensure_eq(used_by("sdb3")?, used(UsedByKind::Filesystem, "data"), "sdb3")?;
        ensure_eq(used_by("sda1")?, None, "sda1")?;
        ensure_eq(used_by("system/root")?, None, "system/root")?;

        fixtures::expect_kind(
            engine.used_by("sdc1"),
            StorageErrorKind::NotFound,
            "unknown device",
        )
    }
}
