//! Dependency graph derived from a catalog snapshot
//!
//! Nodes are the snapshot's objects plus one node per mounted volume. Edges
//! point from the object something is built on to the object built on it
//! (disk → partition, pv → vg → lv, member → md, device → filesystem,
//! volume → mount point).

use std::collections::HashMap;

use serde::Serialize;
use storage_types::{StorageKind, StorageObject};

/// Kind of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    OnDisk,
    InVg,
    InMdArray,
    HoldsFs,
    MountedAt,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnDisk => "on-disk",
            Self::InVg => "in-vg",
            Self::InMdArray => "in-md-array",
            Self::HoldsFs => "holds-fs",
            Self::MountedAt => "mounted-at",
        }
    }

    /// Everything except mount relations
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::MountedAt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the objects built on this node
    Outgoing,
    /// Towards the objects this node is built on
    Incoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Object(StorageKind),
    MountPoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Unique id, `device:<path>` or `mountpoint:<device>`
    pub id: String,
    /// Object name, or the mount path for mount points
    pub name: String,
    pub device: String,
    pub kind: NodeKind,
    pub size_k: u64,
}

impl Node {
    fn object(object: &StorageObject) -> Self {
        Self {
            id: format!("device:{}", object.device()),
            name: object.name().to_string(),
            device: object.device().to_string(),
            kind: NodeKind::Object(object.kind()),
            size_k: object.size_k(),
        }
    }

    fn mount_point(object: &StorageObject, path: &str) -> Self {
        Self {
            id: format!("mountpoint:{}", object.device()),
            name: path.to_string(),
            device: object.device().to_string(),
            kind: NodeKind::MountPoint,
            size_k: object.size_k(),
        }
    }

    pub fn is_mount_point(&self) -> bool {
        self.kind == NodeKind::MountPoint
    }
}

/// Edge between two node indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub parent: usize,
    pub child: usize,
    pub relation: Relation,
}

/// Read-only graph; rebuilt for every snapshot, never mutated afterwards
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// Object names, object devices and node ids → node index
    index: HashMap<String, usize>,
}

impl TopologyGraph {
    /// Derive the graph from objects in discovery order.
    ///
    /// Object references that do not resolve are skipped; the catalog
    /// rejects such batches before building the graph.
    pub fn build(objects: &[StorageObject]) -> Self {
        let mut graph = Self::default();

        for object in objects {
            graph.push_node(Node::object(object));
        }

        // Same key precedence as the catalog: names win over devices.
        for (idx, object) in objects.iter().enumerate() {
            graph.index.entry(object.device().to_string()).or_insert(idx);
        }
        for (idx, object) in objects.iter().enumerate() {
            graph.index.insert(object.name().to_string(), idx);
        }

        for object in objects {
            let Some(child) = graph.lookup(object.name()) else {
                continue;
            };

            let parents: Vec<(&str, Relation)> = match object {
                StorageObject::Disk(_) => Vec::new(),
                StorageObject::Partition(p) => vec![(p.disk.as_str(), Relation::OnDisk)],
                StorageObject::LvmLv(lv) => vec![(lv.vg.as_str(), Relation::InVg)],
                StorageObject::LvmVg(vg) => {
                    vg.pvs.iter().map(|pv| (pv.as_str(), Relation::InVg)).collect()
                }
                StorageObject::Md(md) => md
                    .all_devices()
                    .map(|member| (member.as_str(), Relation::InMdArray))
                    .collect(),
                StorageObject::Filesystem(fs) => fs
                    .devices
                    .iter()
                    .map(|device| (device.as_str(), Relation::HoldsFs))
                    .collect(),
            };

            for (parent, relation) in parents {
                if let Some(parent) = graph.lookup(parent) {
                    graph.edges.push(Edge {
                        parent,
                        child,
                        relation,
                    });
                }
            }
        }

        for object in objects {
            let Some(path) = object.volume().and_then(|v| v.mount_point.as_deref()) else {
                continue;
            };
            let Some(parent) = graph.lookup(object.name()) else {
                continue;
            };

            let child = graph.push_node(Node::mount_point(object, path));
            graph.edges.push(Edge {
                parent,
                child,
                relation: Relation::MountedAt,
            });
        }

        graph
    }

    fn push_node(&mut self, node: Node) -> usize {
        let idx = self.nodes.len();
        self.index.insert(node.id.clone(), idx);
        self.nodes.push(node);
        idx
    }

    /// Node index by object name, object device or node id
    pub fn lookup(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn node(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(idx)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges as `(parent name, child name, relation)`
    pub fn named_edges(&self) -> impl Iterator<Item = (&str, &str, Relation)> {
        self.edges.iter().map(|edge| {
            (
                self.nodes[edge.parent].name.as_str(),
                self.nodes[edge.child].name.as_str(),
                edge.relation,
            )
        })
    }

    /// Names of the adjacent nodes, in edge order; empty for unknown keys
    pub fn neighbors(&self, key: &str, direction: Direction) -> Vec<&str> {
        let Some(idx) = self.lookup(key) else {
            return Vec::new();
        };

        self.edges
            .iter()
            .filter_map(|edge| match direction {
                Direction::Outgoing if edge.parent == idx => Some(edge.child),
                Direction::Incoming if edge.child == idx => Some(edge.parent),
                _ => None,
            })
            .map(|n| self.nodes[n].name.as_str())
            .collect()
    }

    /// Induced subgraph over the nodes matching `keep`
    pub fn subgraph(&self, keep: impl Fn(&Node) -> bool) -> TopologyGraph {
        let selected: Vec<bool> = self.nodes.iter().map(&keep).collect();
        self.project(&selected, |edge| selected[edge.parent] && selected[edge.child])
    }

    /// The edges matching `keep` together with their endpoints
    pub fn edge_subgraph(&self, keep: impl Fn(&Edge) -> bool) -> TopologyGraph {
        let mut selected = vec![false; self.nodes.len()];
        for edge in self.edges.iter().filter(|e| keep(e)) {
            selected[edge.parent] = true;
            selected[edge.child] = true;
        }
        self.project(&selected, keep)
    }

    fn project(&self, selected: &[bool], keep_edge: impl Fn(&Edge) -> bool) -> TopologyGraph {
        let mut graph = TopologyGraph::default();
        let mut remap = vec![None; self.nodes.len()];

        for (idx, node) in self.nodes.iter().enumerate() {
            if !selected[idx] {
                continue;
            }
            let new_idx = graph.nodes.len();
            remap[idx] = Some(new_idx);
            graph.nodes.push(node.clone());
        }

        for (key, idx) in &self.index {
            if let Some(new_idx) = remap[*idx] {
                graph.index.insert(key.clone(), new_idx);
            }
        }

        for edge in self.edges.iter().filter(|e| keep_edge(e)) {
            if let (Some(parent), Some(child)) = (remap[edge.parent], remap[edge.child]) {
                graph.edges.push(Edge {
                    parent,
                    child,
                    relation: edge.relation,
                });
            }
        }

        graph
    }

    /// Names along one cycle, if the graph has any
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            Active,
            Done,
        }

        let mut children = vec![Vec::new(); self.nodes.len()];
        for edge in &self.edges {
            children[edge.parent].push(edge.child);
        }

        let mut marks = vec![Mark::Unvisited; self.nodes.len()];

        for root in 0..self.nodes.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }

            // (node, next child position)
            let mut stack = vec![(root, 0_usize)];
            marks[root] = Mark::Active;

            while let Some((node, pos)) = stack.last().copied() {
                if let Some(&child) = children[node].get(pos) {
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    match marks[child] {
                        Mark::Unvisited => {
                            marks[child] = Mark::Active;
                            stack.push((child, 0));
                        }
                        Mark::Active => {
                            let start = stack.iter().position(|(n, _)| *n == child).unwrap_or(0);
                            let mut cycle: Vec<String> = stack[start..]
                                .iter()
                                .map(|(n, _)| self.nodes[*n].name.clone())
                                .collect();
                            cycle.push(self.nodes[child].name.clone());
                            return Some(cycle);
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[node] = Mark::Done;
                    stack.pop();
                }
            }
        }

        None
    }
}
