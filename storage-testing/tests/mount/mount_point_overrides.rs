use storage_contracts::StorageErrorKind;
use storage_engine::MountPolicyQuery;
use storage_testing::errors::Result;
use storage_testing::harness::{HarnessContext, HarnessTest, ensure, ensure_eq};

use crate::common::fixtures;

pub struct MountPointOverrides;

impl HarnessTest for MountPointOverrides {
    fn id(&self) -> &'static str {
        "mount.change_mount_point.overrides"
    }

    fn suite(&self) -> &'static str {
        "mount"
    }

    fn required_spec(&self) -> &'static str {
        "lvm-on-md"
    }

    fn execute(&self, ctx: &HarnessContext) -> Result<()> {
        let engine = fixtures::engine_for(ctx)?;
        let mount_point =
            |device: &str| engine.get_mount_point(device).map_err(fixtures::engine_error);

        ensure_eq(mount_point("system/home")?, Some("/home".to_string()), "probed")?;

        fixtures::expect_kind(
            engine.change_mount_point("system/home", Some("srv/home")),
            StorageErrorKind::InvalidArgument,
            "relative mount point",
        )?;
        fixtures::expect_kind(
            engine.change_mount_point("system/home", Some("/srv/my home")),
            StorageErrorKind::InvalidArgument,
            "mount point with a space",
        )?;
        fixtures::expect_kind(
            engine.change_mount_point("sda3", Some("/mnt/raw")),
            StorageErrorKind::InvalidArgument,
            "btrfs member",
        )?;
        fixtures::expect_kind(
            engine.get_mount_point("system"),
            StorageErrorKind::NotFound,
            "volume group is not a volume",
        )?;

        engine
            .change_mount_point("system/home", Some("/srv/home"))
            .map_err(fixtures::engine_error)?;
        ensure_eq(mount_point("system/home")?, Some("/srv/home".to_string()), "moved")?;

        engine
            .change_mount_point("/dev/system/home", None)
            .map_err(fixtures::engine_error)?;
        let policy = engine
            .get_mount_policy("system/home")
            .map_err(fixtures::engine_error)?;
        ensure_eq(policy.mount_point, None, "unmounted")?;

        engine
            .set_ignore_fstab("md2", true)
            .map_err(fixtures::engine_error)?;
        ensure(
            engine.get_ignore_fstab("/dev/md2").map_err(fixtures::engine_error)?,
            "ignore_fstab override by device",
        )?;

        // overrides never touch the snapshot
        let mount_edges = engine
            .snapshot()
            .graph()
            .edges()
            .iter()
            .filter(|edge| !edge.relation.is_structural())
            .count();
        ensure_eq(mount_edges, 7, "mount edges in the snapshot")?;

        engine
            .clear_overrides("system/home")
            .map_err(fixtures::engine_error)?;
        ensure_eq(mount_point("system/home")?, Some("/home".to_string()), "restored")
    }
}
