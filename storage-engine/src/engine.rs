// SPDX-License-Identifier: GPL-3.0-only

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use storage_contracts::{
    AllocationQuery, CapabilityQuery, GraphExport, GraphView, MountPolicyQuery, StorageError,
    TopologyQuery,
};
use storage_types::{
    ContainerInfo, DiskInfo, FilesystemInfo, FsCapabilities, FsType, LvmLvInfo, LvmVgInfo, MdInfo,
    MdSlot, MountByType, MountPolicy, PartitionInfo, PartitionSlot, PartitionType, ProbeFacts,
    StorageObject, UnusedSlot, UsedBy, byte_to_human_string,
};

use crate::allocation::AllocationPlanner;
use crate::capabilities::get_fs_capabilities;
use crate::catalog::{DeviceCatalog, Snapshot};
use crate::config::EngineConfig;
use crate::export::DotExporter;
use crate::mount_policy::MountPolicyResolver;

/// The query surface over the current snapshot.
///
/// Every query reads the snapshot current at call time; a concurrent
/// [`StorageEngine::load`] never changes the answer of a query in flight.
#[derive(Debug)]
pub struct StorageEngine {
    catalog: DeviceCatalog,
    mount_policy: MountPolicyResolver,
    exporter: DotExporter,
}

impl Default for StorageEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl StorageEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            catalog: DeviceCatalog::new(),
            mount_policy: MountPolicyResolver::new(config.default_mount_by),
            exporter: DotExporter::new(config.graph.header),
        }
    }

    /// Install a new probing batch; the previous snapshot stays on error
    pub fn load(&self, facts: ProbeFacts) -> Result<Arc<Snapshot>, StorageError> {
        self.catalog.load(facts)
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.catalog.snapshot()
    }

    pub fn catalog(&self) -> &DeviceCatalog {
        &self.catalog
    }

    pub fn render_graph_string(&self, view: GraphView) -> Result<String, StorageError> {
        self.exporter.render_to_string(&self.snapshot(), view)
    }

    /// Human-readable size, see [`byte_to_human_string`]
    pub fn byte_to_human_string<B: TryInto<u64>>(
        bytes: B,
        base2: bool,
        precision: usize,
        exact: bool,
    ) -> Result<String, StorageError> {
        Ok(byte_to_human_string(bytes, base2, precision, exact)?)
    }
}

impl TopologyQuery for StorageEngine {
    fn get_containers(&self) -> Vec<ContainerInfo> {
        self.snapshot().get_containers()
    }

    fn get_container_info(&self, name: &str) -> Result<ContainerInfo, StorageError> {
        self.snapshot().get_container_info(name)
    }

    fn get_disk_info(&self, name: &str) -> Result<DiskInfo, StorageError> {
        self.snapshot().get_disk_info(name)
    }

    fn get_partition_info(&self, disk: &str) -> Result<Vec<PartitionInfo>, StorageError> {
        self.snapshot().get_partition_info(disk)
    }

    fn get_lvm_vg_info(&self, name: &str) -> Result<LvmVgInfo, StorageError> {
        self.snapshot().get_lvm_vg_info(name)
    }

    fn get_lvm_lv_info(&self, vg: &str) -> Result<Vec<LvmLvInfo>, StorageError> {
        self.snapshot().get_lvm_lv_info(vg)
    }

    fn get_md_info(&self, name: &str) -> Result<MdInfo, StorageError> {
        self.snapshot().get_md_info(name)
    }

    fn get_md_infos(&self) -> Vec<MdInfo> {
        self.snapshot().get_md_infos()
    }

    fn get_filesystem_info(&self, name: &str) -> Result<FilesystemInfo, StorageError> {
        self.snapshot().get_filesystem_info(name)
    }

    fn get_volumes(&self) -> Vec<StorageObject> {
        self.snapshot().get_volumes()
    }

    fn get_volume(&self, device: &str) -> Result<StorageObject, StorageError> {
        self.snapshot().get_volume(device)
    }

    fn used_by(&self, name: &str) -> Result<Option<UsedBy>, StorageError> {
        self.snapshot().used_by(name)
    }
}

impl AllocationQuery for StorageEngine {
    fn next_free_partition(
        &self,
        disk: &str,
        requested: PartitionType,
    ) -> Result<PartitionSlot, StorageError> {
        AllocationPlanner::new(&self.snapshot()).next_free_partition(disk, requested)
    }

    fn next_free_md(&self) -> MdSlot {
        AllocationPlanner::new(&self.snapshot()).next_free_md()
    }

    fn unused_partition_slots(&self, disk: &str) -> Result<Vec<UnusedSlot>, StorageError> {
        AllocationPlanner::new(&self.snapshot()).unused_partition_slots(disk)
    }
}

impl MountPolicyQuery for StorageEngine {
    fn get_mount_point(&self, device: &str) -> Result<Option<String>, StorageError> {
        self.mount_policy.get_mount_point(&self.snapshot(), device)
    }

    fn get_mount_by(&self, device: &str) -> Result<MountByType, StorageError> {
        self.mount_policy.get_mount_by(&self.snapshot(), device)
    }

    fn get_crypt(&self, device: &str) -> Result<bool, StorageError> {
        self.mount_policy.get_crypt(&self.snapshot(), device)
    }

    fn get_ignore_fstab(&self, device: &str) -> Result<bool, StorageError> {
        self.mount_policy.get_ignore_fstab(&self.snapshot(), device)
    }

    fn get_mount_policy(&self, device: &str) -> Result<MountPolicy, StorageError> {
        self.mount_policy.get_mount_policy(&self.snapshot(), device)
    }

    fn fstab_spec(&self, device: &str) -> Result<String, StorageError> {
        self.mount_policy.fstab_spec(&self.snapshot(), device)
    }

    fn default_mount_by(&self) -> MountByType {
        self.mount_policy.default_mount_by()
    }

    fn set_default_mount_by(&self, mount_by: MountByType) {
        self.mount_policy.set_default_mount_by(mount_by);
    }

    fn change_mount_point(
        &self,
        device: &str,
        mount_point: Option<&str>,
    ) -> Result<(), StorageError> {
        self.mount_policy
            .change_mount_point(&self.snapshot(), device, mount_point)
    }

    fn change_mount_by(&self, device: &str, mount_by: MountByType) -> Result<(), StorageError> {
        self.mount_policy
            .change_mount_by(&self.snapshot(), device, mount_by)
    }

    fn set_crypt(&self, device: &str, crypt: bool) -> Result<(), StorageError> {
        self.mount_policy.set_crypt(&self.snapshot(), device, crypt)
    }

    fn set_ignore_fstab(&self, device: &str, ignore: bool) -> Result<(), StorageError> {
        self.mount_policy
            .set_ignore_fstab(&self.snapshot(), device, ignore)
    }

    fn clear_overrides(&self, device: &str) -> Result<(), StorageError> {
        self.mount_policy.clear_overrides(&self.snapshot(), device)
    }
}

impl CapabilityQuery for StorageEngine {
    fn get_fs_capabilities(&self, fs: FsType) -> Result<FsCapabilities, StorageError> {
        get_fs_capabilities(fs)
    }
}

impl GraphExport for StorageEngine {
    fn render_graph(&self, view: GraphView, sink: &mut dyn Write) -> Result<(), StorageError> {
        self.exporter.render(&self.snapshot(), view, sink)
    }

    fn save_graph(&self, path: &Path, view: GraphView) -> Result<(), StorageError> {
        self.exporter.save(&self.snapshot(), path, view)
    }
}
