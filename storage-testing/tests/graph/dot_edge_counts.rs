use storage_engine::{GraphView, StorageEngine};
use storage_testing::errors::Result;
use storage_testing::harness::{HarnessContext, HarnessTest, ensure, ensure_eq};

use crate::common::fixtures;

pub struct DotEdgeCounts;

/// (node statements, edge statements) of a rendered view
fn statement_counts(engine: &StorageEngine, view: GraphView) -> Result<(usize, usize)> {
    let dot = engine
        .render_graph_string(view)
        .map_err(fixtures::engine_error)?;

    let edges = dot.lines().filter(|line| line.contains(" -> ")).count();
    let nodes = dot
        .lines()
        .filter(|line| line.contains("[label=") && !line.contains(" -> "))
        .count();
    Ok((nodes, edges))
}

impl HarnessTest for DotEdgeCounts {
    fn id(&self) -> &'static str {
        "graph.dot.statement_counts"
    }

    fn suite(&self) -> &'static str {
        "graph"
    }

    fn required_spec(&self) -> &'static str {
        "lvm-on-md"
    }

    fn execute(&self, ctx: &HarnessContext) -> Result<()> {
        let engine = fixtures::engine_for(ctx)?;

        ensure_eq(
            statement_counts(&engine, GraphView::Device)?,
            (18, 18),
            "device view",
        )?;
        ensure_eq(
            statement_counts(&engine, GraphView::Mount)?,
            (14, 7),
            "mount view",
        )?;
        ensure_eq(
            statement_counts(&engine, GraphView::Combined)?,
            (25, 25),
            "combined view",
        )?;

        let dot = engine
            .render_graph_string(GraphView::Combined)
            .map_err(fixtures::engine_error)?;
        ensure(
            dot.contains("\"device:/dev/md0\" -> \"device:/dev/system\" [label=\"in-vg\""),
            "vg on md edge",
        )?;
        ensure(
            dot.contains("\"device:/dev/system/swap\" -> \"mountpoint:/dev/system/swap\""),
            "swap mount edge",
        )
    }
}
