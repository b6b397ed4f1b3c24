//! Filesystem capability registry
//!
//! The table is compiled in from `resources/fs_capabilities.toml` and parsed
//! once on first use.

use std::sync::LazyLock;

use serde::Deserialize;
use storage_contracts::StorageError;
use storage_types::{FsCapabilities, FsType};

const FS_CAPABILITIES_TOML: &str = include_str!("../../resources/fs_capabilities.toml");

/// Table format this build understands
pub const CAPABILITY_TABLE_VERSION: u32 = 1;

#[derive(Deserialize)]
struct CapabilityTable {
    version: u32,
    filesystems: Vec<CapabilityEntry>,
}

#[derive(Deserialize)]
struct CapabilityEntry {
    fs: FsType,
    #[serde(flatten)]
    caps: FsCapabilities,
}

static FS_CAPABILITIES: LazyLock<Vec<(FsType, FsCapabilities)>> = LazyLock::new(|| {
    match toml::from_str::<CapabilityTable>(FS_CAPABILITIES_TOML) {
        Ok(table) if table.version == CAPABILITY_TABLE_VERSION => table
            .filesystems
            .into_iter()
            .map(|entry| (entry.fs, entry.caps))
            .collect(),
        Ok(table) => {
            tracing::error!(
                version = table.version,
                expected = CAPABILITY_TABLE_VERSION,
                "unsupported filesystem capability table version"
            );
            Vec::new()
        }
        Err(err) => {
            tracing::error!("failed to parse filesystem capability table: {err}");
            Vec::new()
        }
    }
});

/// Capability record of a filesystem kind
pub fn get_fs_capabilities(fs: FsType) -> Result<FsCapabilities, StorageError> {
    FS_CAPABILITIES
        .iter()
        .find(|(kind, _)| *kind == fs)
        .map(|(_, caps)| *caps)
        .ok_or_else(|| StorageError::UnsupportedFilesystem(fs.to_string()))
}

/// Same as [`get_fs_capabilities`], by filesystem name (`"ext4"`, `"fat32"`)
pub fn get_fs_capabilities_by_name(name: &str) -> Result<FsCapabilities, StorageError> {
    let fs = FsType::parse(name)
        .ok_or_else(|| StorageError::UnsupportedFilesystem(name.to_string()))?;
    get_fs_capabilities(fs)
}

/// Filesystems with a capability record, in table order
pub fn supported_filesystems() -> Vec<FsType> {
    FS_CAPABILITIES.iter().map(|(fs, _)| *fs).collect()
}
