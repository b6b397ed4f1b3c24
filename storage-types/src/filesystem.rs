//! Filesystem types and capability records

use serde::{Deserialize, Serialize};

use crate::VolumeInfo;

/// Supported filesystem kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FsType {
    /// No filesystem on the volume
    #[default]
    None,
    /// Something was detected but not recognized
    Unknown,
    Reiserfs,
    Ext2,
    Ext3,
    Ext4,
    Btrfs,
    Xfs,
    Vfat,
    Ntfs,
    Jfs,
    Hfs,
    Hfsplus,
    Nfs,
    Swap,
    Tmpfs,
}

impl FsType {
    pub const ALL: [FsType; 16] = [
        Self::None,
        Self::Unknown,
        Self::Reiserfs,
        Self::Ext2,
        Self::Ext3,
        Self::Ext4,
        Self::Btrfs,
        Self::Xfs,
        Self::Vfat,
        Self::Ntfs,
        Self::Jfs,
        Self::Hfs,
        Self::Hfsplus,
        Self::Nfs,
        Self::Swap,
        Self::Tmpfs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Unknown => "unknown",
            Self::Reiserfs => "reiserfs",
            Self::Ext2 => "ext2",
            Self::Ext3 => "ext3",
            Self::Ext4 => "ext4",
            Self::Btrfs => "btrfs",
            Self::Xfs => "xfs",
            Self::Vfat => "vfat",
            Self::Ntfs => "ntfs",
            Self::Jfs => "jfs",
            Self::Hfs => "hfs",
            Self::Hfsplus => "hfsplus",
            Self::Nfs => "nfs",
            Self::Swap => "swap",
            Self::Tmpfs => "tmpfs",
        }
    }

    /// Parse a filesystem name as reported by blkid (`fat32`, `nfs4` and
    /// `ntfs-3g` are folded into their family)
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "fat" | "fat32" | "fat16" => return Some(Self::Vfat),
            "nfs4" => return Some(Self::Nfs),
            "ntfs-3g" | "ntfs3" => return Some(Self::Ntfs),
            "hfs+" => return Some(Self::Hfsplus),
            _ => {}
        }

        Self::ALL.into_iter().find(|fs| fs.as_str() == lower)
    }
}

impl std::fmt::Display for FsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a filesystem supports (resizing, identification, size limits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsCapabilities {
    pub is_extendable: bool,
    pub is_extendable_while_mounted: bool,
    pub is_shrinkable: bool,
    pub is_shrinkable_while_mounted: bool,
    pub supports_uuid: bool,
    pub supports_label: bool,
    pub label_while_mounted: bool,
    /// Maximum label length in characters (0 when labels are unsupported)
    pub label_length: u32,
    pub minimal_fs_size_k: u64,
    pub maximal_fs_size_k: u64,
}

impl FsCapabilities {
    /// Check if a filesystem of `size_k` is within the supported limits
    pub fn fits(&self, size_k: u64) -> bool {
        size_k >= self.minimal_fs_size_k && size_k <= self.maximal_fs_size_k
    }
}

/// A filesystem that is an object of its own: spans several block devices
/// (btrfs) or lives on none (nfs, tmpfs)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemInfo {
    /// Common volume attributes; `device` is the mount source
    /// (e.g. "UUID=...", "server:/export", "tmpfs")
    pub volume: VolumeInfo,

    /// Names of the block objects holding the filesystem
    #[serde(default)]
    pub devices: Vec<String>,
}
