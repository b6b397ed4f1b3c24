use storage_engine::Direction;
use storage_testing::errors::Result;
use storage_testing::harness::{HarnessContext, HarnessTest, ensure, ensure_eq};

use crate::common::fixtures;

pub struct NeighborsFollowStack;

impl HarnessTest for NeighborsFollowStack {
    fn id(&self) -> &'static str {
        "graph.neighbors.follow_stack"
    }

    fn suite(&self) -> &'static str {
        "graph"
    }

    fn required_spec(&self) -> &'static str {
        "lvm-on-md"
    }

    fn execute(&self, ctx: &HarnessContext) -> Result<()> {
        let engine = fixtures::engine_for(ctx)?;
        let snapshot = engine.snapshot();
        let graph = snapshot.graph();

        ensure_eq(
            graph.neighbors("md0", Direction::Incoming),
            vec!["sda2", "sdb2"],
            "md0 members",
        )?;
        ensure_eq(
            graph.neighbors("/dev/md0", Direction::Outgoing),
            vec!["system"],
            "md0 consumer",
        )?;
        ensure_eq(
            graph.neighbors("system", Direction::Outgoing),
            vec!["system/root", "system/home", "system/swap"],
            "volume group children",
        )?;
        ensure_eq(
            graph.neighbors("data", Direction::Outgoing),
            vec!["/srv/data"],
            "btrfs mount point",
        )?;
        ensure(
            graph.neighbors("sdz", Direction::Incoming).is_empty(),
            "unknown key has no neighbors",
        )?;
        ensure(graph.find_cycle().is_none(), "stack is acyclic")
    }
}
