//! Graphviz rendering of a snapshot's topology graph

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use storage_contracts::{GraphView, StorageError};
use storage_types::{StorageKind, kib_to_human_string};
use tracing::debug;

use crate::catalog::Snapshot;
use crate::topology::{Edge, Node, NodeKind, Relation, TopologyGraph};

const EDGE_COLOR: &str = "#444444";

/// Rank groups, in output order
const RANKS: [(NodeKind, &str); 5] = [
    (NodeKind::Object(StorageKind::Disk), "source"),
    (NodeKind::Object(StorageKind::Partition), "same"),
    (NodeKind::Object(StorageKind::LvmVg), "same"),
    (NodeKind::Object(StorageKind::LvmLv), "same"),
    (NodeKind::MountPoint, "sink"),
];

#[derive(Debug, Clone, Copy)]
pub struct DotExporter {
    header: bool,
}

impl Default for DotExporter {
    fn default() -> Self {
        Self { header: true }
    }
}

impl DotExporter {
    pub fn new(header: bool) -> Self {
        Self { header }
    }

    pub fn render(
        &self,
        snapshot: &Snapshot,
        view: GraphView,
        out: &mut dyn Write,
    ) -> Result<(), StorageError> {
        let graph = select_view(snapshot.graph(), view);
        debug!(
            view = view.as_str(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "rendering graph"
        );

        if self.header {
            writeln!(out, "// generated by storage-engine {}", env!("CARGO_PKG_VERSION"))?;
            writeln!(
                out,
                "// snapshot {}, {}",
                snapshot.id(),
                snapshot.loaded_at().to_rfc3339()
            )?;
            writeln!(out)?;
        }

        writeln!(out, "digraph storage")?;
        writeln!(out, "{{")?;
        writeln!(
            out,
            "    node [shape=rectangle, style=filled, fontname=\"Arial\"];"
        )?;
        writeln!(out)?;

        for node in graph.nodes() {
            writeln!(out, "    {}", node_statement(node))?;
        }
        writeln!(out)?;

        for (kind, rank) in RANKS {
            let ids: Vec<String> = graph
                .nodes()
                .iter()
                .filter(|node| node.kind == kind)
                .map(|node| dot_quote(&node.id))
                .collect();
            if !ids.is_empty() {
                writeln!(out, "    {{ rank={rank}; {} }};", ids.join(" "))?;
            }
        }
        writeln!(out)?;

        for edge in graph.edges() {
            writeln!(out, "    {}", edge_statement(&graph, edge))?;
        }
        writeln!(out, "}}")?;

        Ok(())
    }

    pub fn render_to_string(
        &self,
        snapshot: &Snapshot,
        view: GraphView,
    ) -> Result<String, StorageError> {
        let mut buf = Vec::new();
        self.render(snapshot, view, &mut buf)?;
        String::from_utf8(buf).map_err(|err| StorageError::invalid(err.to_string()))
    }

    /// Write one view to a file, replacing it
    pub fn save(
        &self,
        snapshot: &Snapshot,
        path: &Path,
        view: GraphView,
    ) -> Result<(), StorageError> {
        let mut out = BufWriter::new(File::create(path)?);
        self.render(snapshot, view, &mut out)?;
        out.flush()?;
        debug!(path = %path.display(), view = view.as_str(), "graph saved");
        Ok(())
    }
}

/// The part of `graph` a view shows
pub fn select_view(graph: &TopologyGraph, view: GraphView) -> TopologyGraph {
    match view {
        GraphView::Device => graph.subgraph(|node| !node.is_mount_point()),
        GraphView::Mount => graph.edge_subgraph(|edge| edge.relation == Relation::MountedAt),
        GraphView::Combined => graph.clone(),
    }
}

fn dot_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn dot_quote(text: &str) -> String {
    format!("\"{}\"", dot_escape(text))
}

fn node_style(kind: NodeKind) -> (&'static str, &'static str, &'static str) {
    let (color, fillcolor) = match kind {
        NodeKind::Object(StorageKind::Disk) => ("#ff0000", "#ffaaaa"),
        NodeKind::Object(StorageKind::Partition) => ("#cc33cc", "#eeaaee"),
        NodeKind::Object(StorageKind::Md) => ("#aaaa00", "#ffffaa"),
        NodeKind::Object(StorageKind::LvmVg) => ("#0000ff", "#aaaaff"),
        NodeKind::Object(StorageKind::LvmLv) => ("#6622dd", "#bb99ff"),
        NodeKind::Object(StorageKind::Filesystem) => ("#885511", "#ddbb99"),
        NodeKind::MountPoint => ("#008800", "#99ee99"),
    };
    let text = match kind {
        NodeKind::Object(kind) => kind.display_name(),
        NodeKind::MountPoint => "Mount Point",
    };
    (color, fillcolor, text)
}

fn tooltip(text: &str, label: &str, size_k: u64) -> String {
    let size = kib_to_human_string(size_k, true, 2, false)
        .unwrap_or_else(|_| format!("{size_k} KiB"));
    let lines = [text, label, size.as_str()].map(dot_escape);
    // `\n` is a line break for graphviz
    format!("\"{}\"", lines.join("\\n"))
}

fn node_statement(node: &Node) -> String {
    let (color, fillcolor, text) = node_style(node.kind);
    let tooltip_label = if node.is_mount_point() {
        &node.name
    } else {
        &node.device
    };

    format!(
        "{} [label={}, color=\"{color}\", fillcolor=\"{fillcolor}\", tooltip={}];",
        dot_quote(&node.id),
        dot_quote(&node.name),
        tooltip(text, tooltip_label, node.size_k)
    )
}

fn edge_statement(graph: &TopologyGraph, edge: &Edge) -> String {
    let id = |idx: usize| graph.node(idx).map(|n| dot_quote(&n.id)).unwrap_or_default();
    let style = match edge.relation {
        Relation::OnDisk => "solid",
        Relation::InVg | Relation::InMdArray => "dotted",
        Relation::HoldsFs => "bold",
        Relation::MountedAt => "dashed",
    };

    format!(
        "{} -> {} [label=\"{}\", color=\"{EDGE_COLOR}\", style={style}];",
        id(edge.parent),
        id(edge.child),
        edge.relation.as_str()
    )
}
