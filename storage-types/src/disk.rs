//! Disk, disk label and partition models
//!
//! A disk is the container of partitions. Partition extents are tracked in
//! cylinders; `cyl_size` converts them to bytes.

use serde::{Deserialize, Serialize};

use crate::{CylRegion, VolumeInfo};

/// Default number of minor numbers reserved per disk (the disk itself plus
/// 255 partitions).
pub const DEFAULT_MAX_PARTITIONS: u32 = 256;

/// Partition table style of a disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiskLabel {
    #[default]
    Msdos,
    Gpt,
    Bsd,
    Sun,
    Mac,
    Dasd,
    Aix,
    Amiga,
}

/// Static limits of a partition table style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCapabilities {
    /// Number of primary slots (including the extended partition)
    pub max_primary: u32,

    /// Whether an extended partition holding logical partitions is possible
    pub extended_possible: bool,

    /// Highest partition number a logical partition may take
    pub max_logical: u32,
}

impl DiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Msdos => "msdos",
            Self::Gpt => "gpt",
            Self::Bsd => "bsd",
            Self::Sun => "sun",
            Self::Mac => "mac",
            Self::Dasd => "dasd",
            Self::Aix => "aix",
            Self::Amiga => "amiga",
        }
    }

    /// Parse a label name as reported by parted (`dos` is accepted for msdos)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "msdos" | "dos" | "mbr" => Some(Self::Msdos),
            "gpt" => Some(Self::Gpt),
            "bsd" => Some(Self::Bsd),
            "sun" => Some(Self::Sun),
            "mac" => Some(Self::Mac),
            "dasd" => Some(Self::Dasd),
            "aix" => Some(Self::Aix),
            "amiga" => Some(Self::Amiga),
            _ => None,
        }
    }

    pub fn capabilities(&self) -> LabelCapabilities {
        let (max_primary, extended_possible, max_logical) = match self {
            // msdos logical numbering is practically unbounded, the minor range caps it
            Self::Msdos => (4, true, 256),
            Self::Gpt => (128, false, 0),
            Self::Bsd => (8, false, 0),
            Self::Sun => (8, false, 0),
            Self::Mac => (64, false, 0),
            Self::Dasd => (3, false, 0),
            Self::Aix => (0, false, 0),
            Self::Amiga => (63, false, 0),
        };

        LabelCapabilities {
            max_primary,
            extended_possible,
            max_logical,
        }
    }

    /// First usable primary slot number
    pub fn first_slot(&self) -> u32 {
        match self {
            // slot 1 holds the partition map itself
            Self::Mac => 2,
            _ => 1,
        }
    }

    /// Check if a primary slot number is reserved by the label
    pub fn is_reserved_slot(&self, number: u32) -> bool {
        match self {
            // slot 3 is the whole-disk slice
            Self::Sun => number == 3,
            Self::Mac => number == 1,
            _ => false,
        }
    }
}

/// Complete disk information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskInfo {
    /// Kernel name (e.g., "sda")
    pub name: String,

    /// Device path (e.g., "/dev/sda")
    pub device: String,

    /// Total size in KiB
    pub size_k: u64,

    /// Bytes per cylinder
    pub cyl_size: u64,

    /// Number of cylinders
    pub cyl_count: u64,

    /// Partition table style
    #[serde(default)]
    pub label: DiskLabel,

    /// Minor-number range of the disk (limits the partition numbers)
    #[serde(default = "default_max_partitions")]
    pub max_partitions: u32,

    /// udev by-id links (without the /dev/disk/by-id/ prefix)
    #[serde(default)]
    pub udev_id: Vec<String>,

    /// udev by-path link (without the /dev/disk/by-path/ prefix)
    #[serde(default)]
    pub udev_path: Option<String>,
}

fn default_max_partitions() -> u32 {
    DEFAULT_MAX_PARTITIONS
}

impl DiskInfo {
    /// Label limits clamped to the minor-number range
    pub fn effective_capabilities(&self) -> LabelCapabilities {
        let caps = self.label.capabilities();
        let limit = self.max_partitions.saturating_sub(1);
        LabelCapabilities {
            max_primary: caps.max_primary.min(limit),
            extended_possible: caps.extended_possible,
            max_logical: caps.max_logical.min(limit),
        }
    }

    /// The whole disk as a cylinder region
    pub fn cyl_region(&self) -> CylRegion {
        CylRegion::new(0, self.cyl_count)
    }

    /// Device path of partition `number` on this disk
    pub fn partition_device(&self, number: u32) -> String {
        partition_device_name(&self.device, number)
    }
}

/// Build a partition device name the way the kernel does: disks whose name
/// ends in a digit get a `p` separator (`/dev/nvme0n1p2`, `/dev/md0p1`).
pub fn partition_device_name(disk_device: &str, number: u32) -> String {
    if disk_device.ends_with(|c: char| c.is_ascii_digit()) {
        format!("{disk_device}p{number}")
    } else {
        format!("{disk_device}{number}")
    }
}

/// Type of a partition inside an msdos-style table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionType {
    #[default]
    Primary,
    Extended,
    Logical,
}

impl PartitionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Extended => "extended",
            Self::Logical => "logical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "primary" => Some(Self::Primary),
            "extended" => Some(Self::Extended),
            "logical" => Some(Self::Logical),
            _ => None,
        }
    }
}

/// Detailed partition information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionInfo {
    /// Common volume attributes (name, device, filesystem, mount)
    pub volume: VolumeInfo,

    /// Name of the parent disk
    pub disk: String,

    /// Partition number (1-based, unique per disk)
    pub number: u32,

    /// First cylinder on the parent disk
    pub cyl_start: u64,

    /// Length in cylinders
    pub cyl_size: u64,

    #[serde(default)]
    pub partition_type: PartitionType,
}

impl PartitionInfo {
    pub fn region(&self) -> CylRegion {
        CylRegion::new(self.cyl_start, self.cyl_size)
    }

    pub fn is_extended(&self) -> bool {
        self.partition_type == PartitionType::Extended
    }

    pub fn is_logical(&self) -> bool {
        self.partition_type == PartitionType::Logical
    }
}

/// A free partition number on a disk, with the device it would get
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSlot {
    pub number: u32,
    pub device: String,
}

/// A free cylinder region on a disk and what may be created there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnusedSlot {
    pub region: CylRegion,

    /// Region lies at primary level (outside the extended partition)
    pub primary_slot: bool,
    pub primary_possible: bool,

    pub extended_slot: bool,
    pub extended_possible: bool,

    /// Region lies inside the extended partition
    pub logical_slot: bool,
    pub logical_possible: bool,
}
