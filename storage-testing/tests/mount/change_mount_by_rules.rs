use storage_contracts::StorageErrorKind;
use storage_engine::MountPolicyQuery;
use storage_testing::errors::Result;
use storage_testing::harness::{HarnessContext, HarnessTest, ensure_eq};
use storage_types::MountByType;

use crate::common::fixtures;

pub struct ChangeMountByRules;

impl HarnessTest for ChangeMountByRules {
    fn id(&self) -> &'static str {
        "mount.change_mount_by.rules"
    }

    fn suite(&self) -> &'static str {
        "mount"
    }

    fn required_spec(&self) -> &'static str {
        "lvm-on-md"
    }

    fn execute(&self, ctx: &HarnessContext) -> Result<()> {
        let engine = fixtures::engine_with_default(ctx, MountByType::Uuid)?;
        let mount_by = |device: &str| engine.get_mount_by(device).map_err(fixtures::engine_error);

        engine
            .change_mount_by("system/home", MountByType::Label)
            .map_err(fixtures::engine_error)?;
        ensure_eq(mount_by("system/home")?, MountByType::Label, "home override")?;
        ensure_eq(mount_by("system/root")?, MountByType::Uuid, "root keeps default")?;

        fixtures::expect_kind(
            engine.change_mount_by("sda1", MountByType::Uuid),
            StorageErrorKind::UnsupportedFilesystem,
            "vfat by uuid",
        )?;
        fixtures::expect_kind(
            engine.change_mount_by("nas:/export/share", MountByType::Uuid),
            StorageErrorKind::UnsupportedFilesystem,
            "nfs by uuid",
        )?;
        fixtures::expect_kind(
            engine.change_mount_by("sda2", MountByType::Uuid),
            StorageErrorKind::InvalidArgument,
            "md member",
        )?;
        fixtures::expect_kind(
            engine.change_mount_by("system/root", MountByType::Path),
            StorageErrorKind::InvalidArgument,
            "logical volume by path",
        )?;

        engine
            .change_mount_by("sda1", MountByType::Path)
            .map_err(fixtures::engine_error)?;
        ensure_eq(
            engine.fstab_spec("sda1").map_err(fixtures::engine_error)?,
            "/dev/disk/by-path/pci-0000:00:17.0-ata-1-part1".to_string(),
            "partition by path",
        )?;

        engine
            .set_crypt("system/root", true)
            .map_err(fixtures::engine_error)?;
        ensure_eq(mount_by("system/root")?, MountByType::Device, "encrypted root")?;
        fixtures::expect_kind(
            engine.change_mount_by("system/root", MountByType::Uuid),
            StorageErrorKind::InvalidArgument,
            "encrypted volume by uuid",
        )?;

        engine
            .clear_overrides("system/root")
            .map_err(fixtures::engine_error)?;
        ensure_eq(mount_by("system/root")?, MountByType::Uuid, "cleared root")
    }
}
