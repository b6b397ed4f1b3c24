//! Probed facts: the batch a probing pass hands to the catalog
//!
//! Records are internally tagged by `type`, so a batch reads naturally in
//! either JSON or TOML:
//!
//! ```toml
//! [[containers]]
//! type = "disk"
//! name = "sda"
//! device = "/dev/sda"
//! size_k = 8388608
//! cyl_size = 8225280
//! cyl_count = 1044
//!
//! [[volumes]]
//! type = "partition"
//! disk = "sda"
//! number = 1
//! cyl_start = 0
//! cyl_size = 64
//! volume = { name = "sda1", device = "/dev/sda1", size_k = 514048 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DiskInfo, FilesystemInfo, LvmLvInfo, LvmVgInfo, MdInfo, PartitionInfo, StorageObject};

#[derive(Debug, Error)]
pub enum ProbeFactsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid JSON facts: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML facts: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A container record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContainerRecord {
    Disk(DiskInfo),
    LvmVg(LvmVgInfo),
    Md(MdInfo),
}

/// A volume record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VolumeRecord {
    Partition(PartitionInfo),
    LvmLv(LvmLvInfo),
    Filesystem(FilesystemInfo),
}

impl From<ContainerRecord> for StorageObject {
    fn from(record: ContainerRecord) -> Self {
        match record {
            ContainerRecord::Disk(d) => StorageObject::Disk(d),
            ContainerRecord::LvmVg(vg) => StorageObject::LvmVg(vg),
            ContainerRecord::Md(md) => StorageObject::Md(md),
        }
    }
}

impl From<VolumeRecord> for StorageObject {
    fn from(record: VolumeRecord) -> Self {
        match record {
            VolumeRecord::Partition(p) => StorageObject::Partition(p),
            VolumeRecord::LvmLv(lv) => StorageObject::LvmLv(lv),
            VolumeRecord::Filesystem(fs) => StorageObject::Filesystem(fs),
        }
    }
}

/// One complete probing batch, containers first, each list in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeFacts {
    #[serde(default)]
    pub containers: Vec<ContainerRecord>,

    #[serde(default)]
    pub volumes: Vec<VolumeRecord>,
}

impl ProbeFacts {
    pub fn from_json_str(text: &str) -> Result<Self, ProbeFactsError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ProbeFactsError> {
        Ok(toml::from_str(text)?)
    }

    /// Read facts from a file; `.toml` files are parsed as TOML, anything
    /// else as JSON
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProbeFactsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ProbeFactsError::Read {
            path: path.display().to_string(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }

    pub fn len(&self) -> usize {
        self.containers.len() + self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty() && self.volumes.is_empty()
    }

    /// All records as storage objects, containers first
    pub fn into_objects(self) -> Vec<StorageObject> {
        self.containers
            .into_iter()
            .map(StorageObject::from)
            .chain(self.volumes.into_iter().map(StorageObject::from))
            .collect()
    }
}
