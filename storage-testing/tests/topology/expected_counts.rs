use storage_engine::TopologyQuery;
use storage_testing::errors::Result;
use storage_testing::harness::{HarnessContext, HarnessTest, ensure_eq};

use crate::common::fixtures;

/// Loads a fixture and compares the snapshot shape with its `[expect]` table
pub struct ExpectedCounts {
    pub id: &'static str,
    pub spec: &'static str,
}

impl HarnessTest for ExpectedCounts {
    fn id(&self) -> &'static str {
        self.id
    }

    fn suite(&self) -> &'static str {
        "topology"
    }

    fn required_spec(&self) -> &'static str {
        self.spec
    }

    fn execute(&self, ctx: &HarnessContext) -> Result<()> {
        let engine = fixtures::engine_for(ctx)?;
        let snapshot = engine.snapshot();
        let graph = snapshot.graph();
        let expect = &ctx.spec.expect;

        let containers = engine.get_containers().len();
        let volumes = engine.get_volumes().len();
        let device_nodes = graph
            .nodes()
            .iter()
            .filter(|node| !node.is_mount_point())
            .count();
        ensure_eq(device_nodes, containers + volumes, "device nodes")?;

        if let Some(expected) = expect.containers {
            ensure_eq(containers, expected, "containers")?;
        }
        if let Some(expected) = expect.volumes {
            ensure_eq(volumes, expected, "volumes")?;
        }

        let structural = graph
            .edges()
            .iter()
            .filter(|edge| edge.relation.is_structural())
            .count();
        if let Some(expected) = expect.structural_edges {
            ensure_eq(structural, expected, "structural edges")?;
        }
        if let Some(expected) = expect.mount_edges {
            ensure_eq(graph.edge_count() - structural, expected, "mount edges")?;
        }

        Ok(())
    }
}
