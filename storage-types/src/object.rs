//! Closed set of storage object kinds held by a catalog snapshot

use serde::{Deserialize, Serialize};

use crate::{DiskInfo, FilesystemInfo, LvmLvInfo, LvmVgInfo, MdInfo, PartitionInfo, VolumeInfo};

/// Object kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    Disk,
    Partition,
    LvmVg,
    LvmLv,
    Md,
    Filesystem,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disk => "disk",
            Self::Partition => "partition",
            Self::LvmVg => "lvm_vg",
            Self::LvmLv => "lvm_lv",
            Self::Md => "md",
            Self::Filesystem => "filesystem",
        }
    }

    /// Human readable kind name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Disk => "Hard Disk",
            Self::Partition => "Partition",
            Self::LvmVg => "Volume Group",
            Self::LvmLv => "Logical Volume",
            Self::Md => "RAID",
            Self::Filesystem => "Filesystem",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Disk | Self::LvmVg | Self::Md)
    }

    /// Md arrays count as both container and volume
    pub fn is_volume(&self) -> bool {
        matches!(
            self,
            Self::Partition | Self::LvmLv | Self::Md | Self::Filesystem
        )
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A storage object as owned by a catalog snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageObject {
    Disk(DiskInfo),
    Partition(PartitionInfo),
    LvmVg(LvmVgInfo),
    LvmLv(LvmLvInfo),
    Md(MdInfo),
    Filesystem(FilesystemInfo),
}

impl StorageObject {
    pub fn kind(&self) -> StorageKind {
        match self {
            Self::Disk(_) => StorageKind::Disk,
            Self::Partition(_) => StorageKind::Partition,
            Self::LvmVg(_) => StorageKind::LvmVg,
            Self::LvmLv(_) => StorageKind::LvmLv,
            Self::Md(_) => StorageKind::Md,
            Self::Filesystem(_) => StorageKind::Filesystem,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Disk(d) => &d.name,
            Self::LvmVg(vg) => &vg.name,
            _ => self.volume().map(|v| v.name.as_str()).unwrap_or_default(),
        }
    }

    pub fn device(&self) -> &str {
        match self {
            Self::Disk(d) => &d.device,
            Self::LvmVg(vg) => &vg.device,
            _ => self.volume().map(|v| v.device.as_str()).unwrap_or_default(),
        }
    }

    pub fn size_k(&self) -> u64 {
        match self {
            Self::Disk(d) => d.size_k,
            Self::LvmVg(vg) => vg.size_k,
            _ => self.volume().map(|v| v.size_k).unwrap_or_default(),
        }
    }

    /// Volume attributes, `None` for pure containers (disks and volume groups)
    pub fn volume(&self) -> Option<&VolumeInfo> {
        match self {
            Self::Disk(_) | Self::LvmVg(_) => None,
            Self::Partition(p) => Some(&p.volume),
            Self::LvmLv(lv) => Some(&lv.volume),
            Self::Md(md) => Some(&md.volume),
            Self::Filesystem(fs) => Some(&fs.volume),
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    pub fn is_volume(&self) -> bool {
        self.kind().is_volume()
    }

    /// Name of the owning container, for volumes that have one
    pub fn parent(&self) -> Option<&str> {
        match self {
            Self::Partition(p) => Some(&p.disk),
            Self::LvmLv(lv) => Some(&lv.vg),
            _ => None,
        }
    }

    /// Names of the objects this aggregate is built from
    pub fn members(&self) -> Vec<&str> {
        match self {
            Self::LvmVg(vg) => vg.pvs.iter().map(String::as_str).collect(),
            Self::Md(md) => md.all_devices().map(String::as_str).collect(),
            Self::Filesystem(fs) => fs.devices.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Check if the object is a block device another aggregate may consume
    pub fn is_block_member(&self) -> bool {
        match self {
            Self::Disk(_) | Self::LvmLv(_) | Self::Md(_) => true,
            Self::Partition(p) => !p.is_extended(),
            Self::LvmVg(_) | Self::Filesystem(_) => false,
        }
    }

    pub fn container_info(&self) -> Option<ContainerInfo> {
        if !self.is_container() {
            return None;
        }

        Some(ContainerInfo {
            name: self.name().to_string(),
            device: self.device().to_string(),
            size_k: self.size_k(),
            kind: self.kind(),
        })
    }
}

/// Summary of a container, as returned by container listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub name: String,
    pub device: String,
    pub size_k: u64,
    #[serde(rename = "type")]
    pub kind: StorageKind,
}

/// What consumes an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsedByKind {
    Lvm,
    Md,
    Filesystem,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedBy {
    pub kind: UsedByKind,
    /// Name of the consuming object
    pub name: String,
}
