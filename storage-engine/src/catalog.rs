//! Device catalog: the current snapshot of probed storage objects
//!
//! A [`Snapshot`] is immutable once built. [`DeviceCatalog::load`] validates
//! a batch, builds the new snapshot and its graph outside the lock and then
//! swaps the handle, so readers holding the previous `Arc<Snapshot>` are
//! never affected.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use storage_contracts::{SnapshotId, StorageError};
use storage_types::{
    ContainerInfo, DiskInfo, FilesystemInfo, LvmLvInfo, LvmVgInfo, MdInfo, PartitionInfo,
    ProbeFacts, StorageObject, UsedBy, UsedByKind,
};
use tracing::{debug, error, info};

use crate::topology::TopologyGraph;
use crate::validate::validate;

#[derive(Debug)]
pub struct Snapshot {
    id: SnapshotId,
    loaded_at: DateTime<Utc>,
    /// Discovery order: containers first, then volumes
    objects: Vec<StorageObject>,
    /// Names and devices → object index
    keys: HashMap<String, usize>,
    containers: Vec<usize>,
    volumes: Vec<usize>,
    graph: TopologyGraph,
}

impl Snapshot {
    /// Snapshot with no objects, installed before the first load
    pub fn empty() -> Self {
        Self {
            id: SnapshotId::new(),
            loaded_at: Utc::now(),
            objects: Vec::new(),
            keys: HashMap::new(),
            containers: Vec::new(),
            volumes: Vec::new(),
            graph: TopologyGraph::default(),
        }
    }

    /// Validate a probing batch and derive its graph
    pub fn build(facts: ProbeFacts) -> Result<Self, StorageError> {
        let objects = facts.into_objects();
        validate(&objects)?;

        let graph = TopologyGraph::build(&objects);
        if let Some(cycle) = graph.find_cycle() {
            return Err(StorageError::inconsistent(format!(
                "dependency cycle {}",
                cycle.join(" -> ")
            )));
        }

        let mut keys = HashMap::with_capacity(objects.len() * 2);
        for (idx, object) in objects.iter().enumerate() {
            keys.entry(object.device().to_string()).or_insert(idx);
        }
        for (idx, object) in objects.iter().enumerate() {
            keys.insert(object.name().to_string(), idx);
        }

        // Md arrays are listed as containers only, so the two roles never overlap.
        let containers = (0..objects.len())
            .filter(|idx| objects[*idx].is_container())
            .collect();
        let volumes = (0..objects.len())
            .filter(|idx| !objects[*idx].is_container())
            .collect();

        Ok(Self {
            id: SnapshotId::new(),
            loaded_at: Utc::now(),
            objects,
            keys,
            containers,
            volumes,
            graph,
        })
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn objects(&self) -> &[StorageObject] {
        &self.objects
    }

    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.get(key).copied()
    }

    /// Object by name or device
    pub fn lookup(&self, key: &str) -> Option<&StorageObject> {
        self.index_of(key).map(|idx| &self.objects[idx])
    }

    fn find(&self, key: &str, what: &str) -> Result<&StorageObject, StorageError> {
        self.lookup(key)
            .ok_or_else(|| StorageError::not_found(what, key))
    }

    /// Disks, volume groups and md arrays in discovery order
    pub fn containers(&self) -> impl Iterator<Item = &StorageObject> {
        self.containers.iter().map(|idx| &self.objects[*idx])
    }

    /// Partitions, logical volumes and filesystems in discovery order
    pub fn volumes(&self) -> impl Iterator<Item = &StorageObject> {
        self.volumes.iter().map(|idx| &self.objects[*idx])
    }

    pub fn get_containers(&self) -> Vec<ContainerInfo> {
        self.containers()
            .filter_map(StorageObject::container_info)
            .collect()
    }

    pub fn get_container_info(&self, name: &str) -> Result<ContainerInfo, StorageError> {
        self.find(name, "container")?
            .container_info()
            .ok_or_else(|| StorageError::not_found("container", name))
    }

    pub fn get_disk_info(&self, name: &str) -> Result<DiskInfo, StorageError> {
        self.disk(name).cloned()
    }

    pub(crate) fn disk(&self, name: &str) -> Result<&DiskInfo, StorageError> {
        match self.find(name, "disk")? {
            StorageObject::Disk(disk) => Ok(disk),
            _ => Err(StorageError::not_found("disk", name)),
        }
    }

    /// Partitions of a disk ordered by first cylinder
    pub fn get_partition_info(&self, disk: &str) -> Result<Vec<PartitionInfo>, StorageError> {
        let disk = self.disk(disk)?;
        Ok(self.partitions_of(disk).into_iter().cloned().collect())
    }

    pub(crate) fn partitions_of(&self, disk: &DiskInfo) -> Vec<&PartitionInfo> {
        let disk_idx = self.index_of(&disk.name);
        let mut partitions: Vec<&PartitionInfo> = self
            .volumes()
            .filter_map(|object| match object {
                StorageObject::Partition(p) if self.index_of(&p.disk) == disk_idx => Some(p),
                _ => None,
            })
            .collect();
        partitions.sort_by_key(|p| (p.cyl_start, p.number));
        partitions
    }

    pub fn get_lvm_vg_info(&self, name: &str) -> Result<LvmVgInfo, StorageError> {
        match self.find(name, "volume group")? {
            StorageObject::LvmVg(vg) => Ok(vg.clone()),
            _ => Err(StorageError::not_found("volume group", name)),
        }
    }

    /// Logical volumes of a volume group in discovery order
    pub fn get_lvm_lv_info(&self, vg: &str) -> Result<Vec<LvmLvInfo>, StorageError> {
        let vg_idx = match self.find(vg, "volume group")? {
            StorageObject::LvmVg(vg) => self.index_of(&vg.name),
            _ => return Err(StorageError::not_found("volume group", vg)),
        };

        Ok(self
            .volumes()
            .filter_map(|object| match object {
                StorageObject::LvmLv(lv) if self.index_of(&lv.vg) == vg_idx => Some(lv.clone()),
                _ => None,
            })
            .collect())
    }

    pub fn get_md_info(&self, name: &str) -> Result<MdInfo, StorageError> {
        match self.find(name, "md array")? {
            StorageObject::Md(md) => Ok(md.clone()),
            _ => Err(StorageError::not_found("md array", name)),
        }
    }

    pub fn get_md_infos(&self) -> Vec<MdInfo> {
        self.containers()
            .filter_map(|object| match object {
                StorageObject::Md(md) => Some(md.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn get_filesystem_info(&self, name: &str) -> Result<FilesystemInfo, StorageError> {
        match self.find(name, "filesystem")? {
            StorageObject::Filesystem(fs) => Ok(fs.clone()),
            _ => Err(StorageError::not_found("filesystem", name)),
        }
    }

    pub fn get_volumes(&self) -> Vec<StorageObject> {
        self.volumes().cloned().collect()
    }

    /// Any object carrying volume attributes (md arrays included)
    pub fn get_volume(&self, device: &str) -> Result<StorageObject, StorageError> {
        self.volume_object(device).cloned()
    }

    pub(crate) fn volume_object(&self, device: &str) -> Result<&StorageObject, StorageError> {
        let object = self.find(device, "volume")?;
        if object.volume().is_some() {
            Ok(object)
        } else {
            Err(StorageError::not_found("volume", device))
        }
    }

    /// The aggregate consuming an object (volume group, md array or filesystem)
    pub fn used_by(&self, name: &str) -> Result<Option<UsedBy>, StorageError> {
        let target = self
            .index_of(name)
            .ok_or_else(|| StorageError::not_found("object", name))?;

        let consumer = self.objects.iter().find(|object| {
            object
                .members()
                .iter()
                .any(|member| self.index_of(member) == Some(target))
        });

        Ok(consumer.and_then(|object| {
            let kind = match object {
                StorageObject::LvmVg(_) => UsedByKind::Lvm,
                StorageObject::Md(_) => UsedByKind::Md,
                StorageObject::Filesystem(_) => UsedByKind::Filesystem,
                _ => return None,
            };
            Some(UsedBy {
                kind,
                name: object.name().to_string(),
            })
        }))
    }
}

/// Holder of the current snapshot
#[derive(Debug)]
pub struct DeviceCatalog {
    current: RwLock<Arc<Snapshot>>,
}

impl Default for DeviceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceCatalog {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::empty())),
        }
    }

    /// Validate `facts` and install them as the current snapshot.
    ///
    /// On error the previous snapshot stays installed.
    pub fn load(&self, facts: ProbeFacts) -> Result<Arc<Snapshot>, StorageError> {
        let records = facts.len();
        debug!(records, "validating probing batch");

        let snapshot = match Snapshot::build(facts) {
            Ok(snapshot) => Arc::new(snapshot),
            Err(err) => {
                error!("rejected probing batch, keeping previous snapshot: {err}");
                return Err(err);
            }
        };

        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *current = Arc::clone(&snapshot);
        }

        info!(
            snapshot = %snapshot.id(),
            objects = snapshot.len(),
            edges = snapshot.graph().edge_count(),
            "installed catalog snapshot"
        );
        Ok(snapshot)
    }

    /// The snapshot current at call time
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }
}
