// SPDX-License-Identifier: GPL-3.0-only

pub mod allocation;
pub mod capabilities;
pub mod graph;
pub mod mount;
pub mod topology;

pub use allocation::AllocationQuery;
pub use capabilities::CapabilityQuery;
pub use graph::{GraphExport, GraphView};
pub use mount::MountPolicyQuery;
pub use topology::TopologyQuery;
