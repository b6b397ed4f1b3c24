//! LVM (Logical Volume Manager) types
//!
//! A volume group is the container of logical volumes and is built on
//! physical volumes (partitions, disks or MD arrays referenced by name).

use serde::{Deserialize, Serialize};

use crate::VolumeInfo;

/// Volume group information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LvmVgInfo {
    /// Volume group name (e.g. "system")
    pub name: String,

    /// Device directory (e.g. "/dev/system")
    pub device: String,

    /// Total size in KiB
    pub size_k: u64,

    /// Physical extent size in KiB
    pub pe_size_k: u64,

    /// Total number of physical extents
    #[serde(default)]
    pub pe_count: u64,

    /// Number of unallocated physical extents
    #[serde(default)]
    pub pe_free: u64,

    /// Names of the physical volumes
    #[serde(default)]
    pub pvs: Vec<String>,
}

impl LvmVgInfo {
    /// Unallocated space in KiB
    pub fn free_k(&self) -> u64 {
        self.pe_free.saturating_mul(self.pe_size_k)
    }
}

/// Logical volume information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LvmLvInfo {
    /// Common volume attributes (name is "vg/lv")
    pub volume: VolumeInfo,

    /// Parent volume group name
    pub vg: String,

    /// Number of stripes (at least 1)
    #[serde(default = "default_stripes")]
    pub stripes: u32,

    /// Stripe size in KiB, only meaningful with more than one stripe
    #[serde(default)]
    pub stripe_size_k: u64,
}

fn default_stripes() -> u32 {
    1
}

impl LvmLvInfo {
    pub fn is_striped(&self) -> bool {
        self.stripes > 1
    }

    /// Short display form "vg/lv"
    pub fn display_name(&self) -> String {
        let lv = self
            .volume
            .device
            .rsplit('/')
            .next()
            .unwrap_or(&self.volume.device);
        format!("{}/{}", self.vg, lv)
    }
}
