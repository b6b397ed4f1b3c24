use storage_engine::{MountPolicyQuery, StorageEngine};
use storage_testing::errors::Result;
use storage_testing::harness::{HarnessContext, HarnessTest, ensure_eq};
use storage_types::MountByType;

use crate::common::fixtures;

pub struct FstabSpecByScheme;

fn spec(engine: &StorageEngine, device: &str) -> Result<String> {
    engine.fstab_spec(device).map_err(fixtures::engine_error)
}

impl HarnessTest for FstabSpecByScheme {
    fn id(&self) -> &'static str {
        "mount.fstab_spec.by_scheme"
    }

    fn suite(&self) -> &'static str {
        "mount"
    }

    fn required_spec(&self) -> &'static str {
        "lvm-on-md"
    }

    fn execute(&self, ctx: &HarnessContext) -> Result<()> {
        let by_id = fixtures::engine_with_default(ctx, MountByType::Id)?;
        ensure_eq(
            spec(&by_id, "sda1")?,
            "/dev/disk/by-id/ata-WDC_WD10EZEX-00BN5A0_WD-WCC3F0000001-part1".to_string(),
            "partition by id",
        )?;
        // logical volumes have no by-id scheme
        ensure_eq(
            by_id.get_mount_by("system/root").map_err(fixtures::engine_error)?,
            MountByType::Device,
            "logical volume mount-by",
        )?;
        ensure_eq(
            spec(&by_id, "system/root")?,
            "/dev/system/root".to_string(),
            "logical volume by id",
        )?;
        ensure_eq(spec(&by_id, "md2")?, "/dev/md2".to_string(), "md without udev id")?;

        let by_uuid = fixtures::engine_with_default(ctx, MountByType::Uuid)?;
        ensure_eq(
            spec(&by_uuid, "/dev/system/root")?,
            "UUID=0c9d8e7f-6a5b-4c3d-2e1f-0a9b8c7d6e5f".to_string(),
            "logical volume by uuid",
        )?;
        ensure_eq(
            spec(&by_uuid, "data")?,
            "UUID=7a6b5c4d-3e2f-4a1b-9c8d-7e6f5a4b3c2d".to_string(),
            "btrfs by uuid",
        )?;
        ensure_eq(
            by_uuid
                .get_mount_by("nas:/export/share")
                .map_err(fixtures::engine_error)?,
            MountByType::Device,
            "network share mount-by",
        )?;
        ensure_eq(
            spec(&by_uuid, "nas:/export/share")?,
            "nas:/export/share".to_string(),
            "network share",
        )?;

        let by_label = fixtures::engine_with_default(ctx, MountByType::Label)?;
        ensure_eq(
            spec(&by_label, "system/home")?,
            "LABEL=home".to_string(),
            "labelled volume",
        )?;
        ensure_eq(
            by_label.get_mount_by("sdb1").map_err(fixtures::engine_error)?,
            MountByType::Label,
            "unlabelled partition keeps its scheme",
        )?;
        ensure_eq(
            spec(&by_label, "sdb1")?,
            "/dev/sdb1".to_string(),
            "unlabelled partition",
        )
    }
}
