//! Mount policy resolution
//!
//! Settings resolve as override → probed value → process default. A mount-by
//! scheme the volume cannot support falls back to `Device`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use storage_contracts::StorageError;
use storage_types::{MountByType, MountPolicy, StorageObject, VolumeInfo};
use tracing::{debug, warn};

use crate::capabilities::get_fs_capabilities;
use crate::catalog::Snapshot;

/// Per-volume settings that replace the probed values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct MountOverride {
    /// `Some(None)` unmounts a probed mount point
    mount_point: Option<Option<String>>,
    mount_by: Option<MountByType>,
    crypt: Option<bool>,
    ignore_fstab: Option<bool>,
}

#[derive(Debug)]
pub struct MountPolicyResolver {
    default_mount_by: RwLock<MountByType>,
    /// Keyed by volume device path
    overrides: RwLock<HashMap<String, MountOverride>>,
}

impl Default for MountPolicyResolver {
    fn default() -> Self {
        Self::new(MountByType::default())
    }
}

impl MountPolicyResolver {
    pub fn new(default_mount_by: MountByType) -> Self {
        Self {
            default_mount_by: RwLock::new(default_mount_by),
            overrides: RwLock::new(HashMap::new()),
        }
    }

    pub fn default_mount_by(&self) -> MountByType {
        *self
            .default_mount_by
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_default_mount_by(&self, mount_by: MountByType) {
        debug!(%mount_by, "default mount-by changed");
        *self
            .default_mount_by
            .write()
            .unwrap_or_else(PoisonError::into_inner) = mount_by;
    }

    fn override_for(&self, device: &str) -> MountOverride {
        self.overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(device)
            .cloned()
            .unwrap_or_default()
    }

    fn update(&self, device: &str, apply: impl FnOnce(&mut MountOverride)) {
        let mut overrides = self.overrides.write().unwrap_or_else(PoisonError::into_inner);
        apply(overrides.entry(device.to_string()).or_default());
    }

    pub fn get_mount_point(
        &self,
        snapshot: &Snapshot,
        device: &str,
    ) -> Result<Option<String>, StorageError> {
        let (_, volume) = lookup(snapshot, device)?;
        Ok(self.mount_point_of(volume))
    }

    fn mount_point_of(&self, volume: &VolumeInfo) -> Option<String> {
        self.override_for(&volume.device)
            .mount_point
            .unwrap_or_else(|| volume.mount_point.clone())
    }

    pub fn get_crypt(&self, snapshot: &Snapshot, device: &str) -> Result<bool, StorageError> {
        let (_, volume) = lookup(snapshot, device)?;
        Ok(self.crypt_of(volume))
    }

    fn crypt_of(&self, volume: &VolumeInfo) -> bool {
        self.override_for(&volume.device)
            .crypt
            .unwrap_or(volume.crypt)
    }

    pub fn get_ignore_fstab(
        &self,
        snapshot: &Snapshot,
        device: &str,
    ) -> Result<bool, StorageError> {
        let (_, volume) = lookup(snapshot, device)?;
        Ok(self
            .override_for(&volume.device)
            .ignore_fstab
            .unwrap_or(volume.ignore_fstab))
    }

    /// Effective mount-by scheme of a volume
    pub fn get_mount_by(
        &self,
        snapshot: &Snapshot,
        device: &str,
    ) -> Result<MountByType, StorageError> {
        let (object, volume) = lookup(snapshot, device)?;
        Ok(self.mount_by_of(object, volume))
    }

    fn mount_by_of(&self, object: &StorageObject, volume: &VolumeInfo) -> MountByType {
        let requested = self
            .override_for(&volume.device)
            .mount_by
            .or(volume.mount_by)
            .unwrap_or_else(|| self.default_mount_by());

        if allowed_mount_by(object, volume, self.crypt_of(volume), requested) {
            requested
        } else {
            debug!(
                device = %volume.device,
                %requested,
                "mount-by scheme not usable, falling back to device"
            );
            MountByType::Device
        }
    }

    pub fn get_mount_policy(
        &self,
        snapshot: &Snapshot,
        device: &str,
    ) -> Result<MountPolicy, StorageError> {
        let (object, volume) = lookup(snapshot, device)?;
        let overrides = self.override_for(&volume.device);

        Ok(MountPolicy {
            mount_point: self.mount_point_of(volume),
            mount_by: self.mount_by_of(object, volume),
            crypt: self.crypt_of(volume),
            ignore_fstab: overrides.ignore_fstab.unwrap_or(volume.ignore_fstab),
        })
    }

    /// Device string for the fstab entry of a volume
    pub fn fstab_spec(&self, snapshot: &Snapshot, device: &str) -> Result<String, StorageError> {
        let (object, volume) = lookup(snapshot, device)?;
        let mount_by = self.mount_by_of(object, volume);

        let spec = match mount_by {
            MountByType::Uuid => volume.uuid.as_ref().map(|uuid| format!("UUID={uuid}")),
            MountByType::Label => volume.label.as_ref().map(|label| format!("LABEL={label}")),
            MountByType::Id => volume
                .udev_id
                .first()
                .map(|id| format!("/dev/disk/by-id/{id}")),
            MountByType::Path => volume
                .udev_path
                .as_ref()
                .map(|path| format!("/dev/disk/by-path/{path}")),
            MountByType::Device => Some(volume.device.clone()),
        };

        Ok(spec.unwrap_or_else(|| {
            warn!(
                device = %volume.device,
                %mount_by,
                "volume has no value for its mount-by scheme, using device path"
            );
            volume.device.clone()
        }))
    }

    pub fn change_mount_point(
        &self,
        snapshot: &Snapshot,
        device: &str,
        mount_point: Option<&str>,
    ) -> Result<(), StorageError> {
        let (_, volume) = lookup(snapshot, device)?;
        ensure_not_in_use(snapshot, volume)?;

        if let Some(path) = mount_point {
            if !path.starts_with('/') && path != "swap" {
                return Err(StorageError::invalid(format!(
                    "mount point {path} is not an absolute path"
                )));
            }
            // fstab fields are whitespace separated
            if path.contains([' ', '\t', '\n']) {
                return Err(StorageError::invalid(format!(
                    "mount point {path:?} contains whitespace"
                )));
            }
        }

        let default_mount_by = self.default_mount_by();
        self.update(&volume.device, |o| {
            o.mount_point = Some(mount_point.map(str::to_string));
            if mount_point.is_none() {
                o.mount_by = Some(default_mount_by);
            }
        });
        debug!(device = %volume.device, ?mount_point, "mount point override set");
        Ok(())
    }

    pub fn change_mount_by(
        &self,
        snapshot: &Snapshot,
        device: &str,
        mount_by: MountByType,
    ) -> Result<(), StorageError> {
        let (object, volume) = lookup(snapshot, device)?;
        ensure_not_in_use(snapshot, volume)?;

        match mount_by {
            MountByType::Uuid | MountByType::Label => {
                if self.crypt_of(volume) {
                    return Err(StorageError::invalid(format!(
                        "cannot mount encrypted volume {} by {mount_by}",
                        volume.device
                    )));
                }

                let caps = get_fs_capabilities(volume.fs_type)?;
                let supported = match mount_by {
                    MountByType::Uuid => caps.supports_uuid,
                    _ => caps.supports_label,
                };
                if !supported {
                    return Err(StorageError::UnsupportedFilesystem(format!(
                        "{} does not support mounting by {mount_by}",
                        volume.fs_type
                    )));
                }
            }
            MountByType::Id | MountByType::Path => {
                if !allowed_mount_by(object, volume, self.crypt_of(volume), mount_by) {
                    return Err(StorageError::invalid(format!(
                        "{} cannot be mounted by {mount_by}",
                        volume.device
                    )));
                }
            }
            MountByType::Device => {}
        }

        self.update(&volume.device, |o| o.mount_by = Some(mount_by));
        debug!(device = %volume.device, %mount_by, "mount-by override set");
        Ok(())
    }

    pub fn set_crypt(
        &self,
        snapshot: &Snapshot,
        device: &str,
        crypt: bool,
    ) -> Result<(), StorageError> {
        let (_, volume) = lookup(snapshot, device)?;
        self.update(&volume.device, |o| o.crypt = Some(crypt));
        Ok(())
    }

    pub fn set_ignore_fstab(
        &self,
        snapshot: &Snapshot,
        device: &str,
        ignore: bool,
    ) -> Result<(), StorageError> {
        let (_, volume) = lookup(snapshot, device)?;
        self.update(&volume.device, |o| o.ignore_fstab = Some(ignore));
        Ok(())
    }

    /// Drop every override of a volume
    pub fn clear_overrides(&self, snapshot: &Snapshot, device: &str) -> Result<(), StorageError> {
        let (_, volume) = lookup(snapshot, device)?;
        self.overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&volume.device);
        Ok(())
    }
}

fn lookup<'s>(
    snapshot: &'s Snapshot,
    device: &str,
) -> Result<(&'s StorageObject, &'s VolumeInfo), StorageError> {
    let object = snapshot.volume_object(device)?;
    let volume = object
        .volume()
        .ok_or_else(|| StorageError::not_found("volume", device))?;
    Ok((object, volume))
}

/// Volumes consumed by an aggregate take their mount settings from it
fn ensure_not_in_use(snapshot: &Snapshot, volume: &VolumeInfo) -> Result<(), StorageError> {
    match snapshot.used_by(&volume.name)? {
        Some(used) => Err(StorageError::invalid(format!(
            "{} is in use by {}",
            volume.device, used.name
        ))),
        None => Ok(()),
    }
}

fn allowed_mount_by(
    object: &StorageObject,
    volume: &VolumeInfo,
    crypt: bool,
    mount_by: MountByType,
) -> bool {
    match mount_by {
        MountByType::Device => true,
        MountByType::Path => {
            matches!(object, StorageObject::Partition(_)) && volume.udev_path.is_some()
        }
        MountByType::Id => match object {
            StorageObject::Partition(_) => !volume.udev_id.is_empty(),
            StorageObject::Md(_) => true,
            _ => false,
        },
        MountByType::Uuid | MountByType::Label => {
            let network = matches!(object, StorageObject::Filesystem(fs) if fs.devices.is_empty());
            !crypt && !network
        }
    }
}
