// SPDX-License-Identifier: GPL-3.0-only

//! Canonical domain models for the storage topology engine
//!
//! This crate defines the single source of truth for all storage domain types.
//! These models are used throughout the stack:
//!
//! - **storage-engine**: Builds catalog snapshots and answers queries with these types
//! - **storage-contracts**: Query-surface traits are expressed in these types
//! - **storage-testing**: Topology fixtures deserialize into [`ProbeFacts`]
//!
//! ## Architecture
//!
//! Objects form a closed tagged variant, [`StorageObject`]:
//!
//! ### Containers
//! - `DiskInfo` → physical disk and its partition table limits
//! - `LvmVgInfo` → volume group built on physical volumes
//! - `MdInfo` → software RAID array (also usable as a volume)
//!
//! ### Volumes
//! - `PartitionInfo` → cylinder extent on a disk
//! - `LvmLvInfo` → logical volume in a volume group
//! - `FilesystemInfo` → filesystem spanning several devices, or none
//!
//! Every volume embeds a `VolumeInfo` with the shared filesystem and mount
//! facts. Cross-references between objects are names, never embedded records.

pub mod common;
pub mod disk;
pub mod filesystem;
pub mod lvm;
pub mod md;
pub mod object;
pub mod probe;
pub mod volume;

pub use common::{
    CylRegion, HumanSizeError, MAX_PRECISION, byte_to_human_string, human_string_to_byte,
    kib_to_human_string,
};
pub use disk::{
    DEFAULT_MAX_PARTITIONS, DiskInfo, DiskLabel, LabelCapabilities, PartitionInfo, PartitionSlot,
    PartitionType, UnusedSlot, partition_device_name,
};
pub use filesystem::{FilesystemInfo, FsCapabilities, FsType};
pub use lvm::{LvmLvInfo, LvmVgInfo};
pub use md::{MdInfo, MdLevel, MdParity, MdSlot};
pub use object::{ContainerInfo, StorageKind, StorageObject, UsedBy, UsedByKind};
pub use probe::{ContainerRecord, ProbeFacts, ProbeFactsError, VolumeRecord};
pub use volume::{MountByType, MountPolicy, VolumeInfo};
