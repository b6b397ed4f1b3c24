//! Software RAID (MD) types

use serde::{Deserialize, Serialize};

use crate::VolumeInfo;

/// RAID level of an MD array
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MdLevel {
    #[default]
    Unknown,
    Raid0,
    Raid1,
    Raid5,
    Raid6,
    Raid10,
    Multipath,
}

impl MdLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Raid0 => "raid0",
            Self::Raid1 => "raid1",
            Self::Raid5 => "raid5",
            Self::Raid6 => "raid6",
            Self::Raid10 => "raid10",
            Self::Multipath => "multipath",
        }
    }

    /// Minimum number of active members the level needs
    pub fn min_members(&self) -> usize {
        match self {
            Self::Unknown | Self::Multipath => 1,
            Self::Raid0 | Self::Raid1 | Self::Raid10 => 2,
            Self::Raid5 => 3,
            Self::Raid6 => 4,
        }
    }
}

/// Parity layout of raid5/raid6 arrays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MdParity {
    #[default]
    Default,
    LeftAsymmetric,
    LeftSymmetric,
    RightAsymmetric,
    RightSymmetric,
}

/// MD array information
///
/// An array is the container of its members and at the same time a block
/// volume of its own: it can hold a filesystem or serve as a member of a
/// volume group or another array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdInfo {
    /// Common volume attributes (name "md0", device "/dev/md0")
    pub volume: VolumeInfo,

    /// Array number (the N of /dev/mdN)
    pub number: u32,

    #[serde(default)]
    pub level: MdLevel,

    #[serde(default)]
    pub parity: MdParity,

    /// Chunk size in KiB
    #[serde(default)]
    pub chunk_size_k: u64,

    /// Names of the active member devices
    #[serde(default)]
    pub members: Vec<String>,

    /// Names of the spare devices
    #[serde(default)]
    pub spares: Vec<String>,
}

impl MdInfo {
    /// Device path for array `number`
    pub fn device_for(number: u32) -> String {
        format!("/dev/md{number}")
    }

    pub fn is_degraded(&self) -> bool {
        self.members.len() < self.level.min_members()
    }

    /// Members and spares, in that order
    pub fn all_devices(&self) -> impl Iterator<Item = &String> {
        self.members.iter().chain(self.spares.iter())
    }
}

/// A free MD array number, with the device it would get
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdSlot {
    pub number: u32,
    pub device: String,
}
