// SPDX-License-Identifier: GPL-3.0-only

use storage_types::{MountByType, MountPolicy};

use crate::StorageError;

/// Per-volume mount settings.
///
/// Overrides are held beside the catalog and survive snapshot replacement;
/// they never modify installed objects.
pub trait MountPolicyQuery: Send + Sync {
    /// `Ok(None)` when the volume exists but is not mounted
    fn get_mount_point(&self, device: &str) -> Result<Option<String>, StorageError>;

    fn get_mount_by(&self, device: &str) -> Result<MountByType, StorageError>;

    fn get_crypt(&self, device: &str) -> Result<bool, StorageError>;

    fn get_ignore_fstab(&self, device: &str) -> Result<bool, StorageError>;

    fn get_mount_policy(&self, device: &str) -> Result<MountPolicy, StorageError>;

    /// Device string for the fstab entry of a volume
    fn fstab_spec(&self, device: &str) -> Result<String, StorageError>;

    fn default_mount_by(&self) -> MountByType;

    fn set_default_mount_by(&self, mount_by: MountByType);

    fn change_mount_point(
        &self,
        device: &str,
        mount_point: Option<&str>,
    ) -> Result<(), StorageError>;

    fn change_mount_by(&self, device: &str, mount_by: MountByType) -> Result<(), StorageError>;

    fn set_crypt(&self, device: &str, crypt: bool) -> Result<(), StorageError>;

    fn set_ignore_fstab(&self, device: &str, ignore: bool) -> Result<(), StorageError>;

    fn clear_overrides(&self, device: &str) -> Result<(), StorageError>;
}
