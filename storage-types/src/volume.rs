//! Volume attributes shared by every block object that can carry a filesystem

use serde::{Deserialize, Serialize};

use crate::FsType;

/// How a volume is identified in fstab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountByType {
    /// Kernel device name (e.g. /dev/sda1)
    Device,
    /// Filesystem UUID
    Uuid,
    /// Filesystem label
    Label,
    /// udev by-id link
    #[default]
    Id,
    /// udev by-path link
    Path,
}

impl MountByType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Device => "device",
            Self::Uuid => "uuid",
            Self::Label => "label",
            Self::Id => "id",
            Self::Path => "path",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "device" => Some(Self::Device),
            "uuid" => Some(Self::Uuid),
            "label" => Some(Self::Label),
            "id" => Some(Self::Id),
            "path" => Some(Self::Path),
            _ => None,
        }
    }
}

impl std::fmt::Display for MountByType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common volume information (single source of truth for name, device,
/// filesystem and mount facts)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeInfo {
    // === Identity ===
    /// Stable name, unique within a snapshot (e.g. "sda1", "system/root")
    pub name: String,

    /// Device path, unique within a snapshot (e.g. "/dev/sda1")
    pub device: String,

    /// Size in KiB
    pub size_k: u64,

    // === Filesystem ===
    #[serde(default)]
    pub fs_type: FsType,

    #[serde(default)]
    pub uuid: Option<String>,

    #[serde(default)]
    pub label: Option<String>,

    // === Mount (as probed from fstab / mounts) ===
    /// Mount point, `None` when not mounted
    #[serde(default)]
    pub mount_point: Option<String>,

    /// fstab identification scheme, `None` means the process default applies
    #[serde(default)]
    pub mount_by: Option<MountByType>,

    /// Volume is encrypted
    #[serde(default)]
    pub crypt: bool,

    /// Volume must not be written to fstab
    #[serde(default)]
    pub ignore_fstab: bool,

    // === udev ===
    #[serde(default)]
    pub udev_id: Vec<String>,

    #[serde(default)]
    pub udev_path: Option<String>,
}

impl VolumeInfo {
    pub fn is_mounted(&self) -> bool {
        self.mount_point.is_some()
    }

    pub fn has_filesystem(&self) -> bool {
        !matches!(self.fs_type, FsType::None | FsType::Unknown)
    }
}

/// Effective mount settings of a volume after overrides and defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountPolicy {
    /// `None` when the volume is not mounted
    pub mount_point: Option<String>,
    pub mount_by: MountByType,
    pub crypt: bool,
    pub ignore_fstab: bool,
}
