// SPDX-License-Identifier: GPL-3.0-only

//! In-memory storage topology engine
//!
//! Probed facts are installed into a [`DeviceCatalog`] as an immutable
//! [`Snapshot`]; the [`TopologyGraph`] is derived from each snapshot.
//! Allocation, mount policy, capability and graph queries all read one
//! snapshot and never mutate it. [`StorageEngine`] bundles the pieces behind
//! the `storage-contracts` traits.

pub mod allocation;
pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod export;
pub mod logging;
pub mod mount_policy;
pub mod topology;
mod validate;

pub use allocation::AllocationPlanner;
pub use capabilities::{
    CAPABILITY_TABLE_VERSION, get_fs_capabilities, get_fs_capabilities_by_name,
    supported_filesystems,
};
pub use catalog::{DeviceCatalog, Snapshot};
pub use config::{ConfigError, EngineConfig, GraphConfig, LoggingLevel};
pub use engine::StorageEngine;
pub use export::{DotExporter, select_view};
pub use mount_policy::MountPolicyResolver;
pub use topology::{Direction, Edge, Node, NodeKind, Relation, TopologyGraph};

pub use storage_contracts::{
    AllocationQuery, CapabilityQuery, GraphExport, GraphView, MountPolicyQuery, StorageError,
    StorageErrorKind, TopologyQuery,
};
