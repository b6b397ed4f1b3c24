// SPDX-License-Identifier: GPL-3.0-only

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::StorageError;

/// Which part of the topology graph to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphView {
    /// Containers, volumes and their structural relations
    Device,
    /// Mount relations and their endpoints
    Mount,
    Combined,
}

impl GraphView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Device => "device",
            Self::Mount => "mount",
            Self::Combined => "combined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "device" => Some(Self::Device),
            "mount" => Some(Self::Mount),
            "combined" | "all" => Some(Self::Combined),
            _ => None,
        }
    }
}

pub trait GraphExport: Send + Sync {
    /// Write one view of the current snapshot to `sink`
    fn render_graph(&self, view: GraphView, sink: &mut dyn Write) -> Result<(), StorageError>;

    fn save_graph(&self, path: &Path, view: GraphView) -> Result<(), StorageError>;
}
