// SPDX-License-Identifier: GPL-3.0-only

pub mod protocol;
pub mod traits;

pub use protocol::{ErrorReport, SnapshotId, StorageError, StorageErrorKind};
pub use traits::{
    AllocationQuery, CapabilityQuery, GraphExport, GraphView, MountPolicyQuery, TopologyQuery,
};
