// SPDX-License-Identifier: GPL-3.0-only

use storage_types::{
    ContainerInfo, DiskInfo, FilesystemInfo, LvmLvInfo, LvmVgInfo, MdInfo, PartitionInfo,
    StorageObject, UsedBy,
};

use crate::StorageError;

/// Read access to the current catalog snapshot.
///
/// Every `name` argument accepts either the object name or its device path.
pub trait TopologyQuery: Send + Sync {
    fn get_containers(&self) -> Vec<ContainerInfo>;

    fn get_container_info(&self, name: &str) -> Result<ContainerInfo, StorageError>;

    fn get_disk_info(&self, name: &str) -> Result<DiskInfo, StorageError>;

    /// Partitions of a disk, ordered by first cylinder
    fn get_partition_info(&self, disk: &str) -> Result<Vec<PartitionInfo>, StorageError>;

    fn get_lvm_vg_info(&self, name: &str) -> Result<LvmVgInfo, StorageError>;

    /// Logical volumes of a volume group, in discovery order
    fn get_lvm_lv_info(&self, vg: &str) -> Result<Vec<LvmLvInfo>, StorageError>;

    fn get_md_info(&self, name: &str) -> Result<MdInfo, StorageError>;

    fn get_md_infos(&self) -> Vec<MdInfo>;

    fn get_filesystem_info(&self, name: &str) -> Result<FilesystemInfo, StorageError>;

    /// All volumes in discovery order
    fn get_volumes(&self) -> Vec<StorageObject>;

    fn get_volume(&self, device: &str) -> Result<StorageObject, StorageError>;

    /// Who consumes an object, if anyone
    fn used_by(&self, name: &str) -> Result<Option<UsedBy>, StorageError>;
}
