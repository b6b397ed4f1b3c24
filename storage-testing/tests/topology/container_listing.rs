use storage_engine::TopologyQuery;
use storage_testing::errors::Result;
use storage_testing::harness::{HarnessContext, HarnessTest, ensure, ensure_eq};
use storage_types::StorageKind;

use crate::common::fixtures;

pub struct ContainerListing;

impl HarnessTest for ContainerListing {
    fn id(&self) -> &'static str {
        "topology.containers.discovery_order"
    }

    fn suite(&self) -> &'static str {
        "topology"
    }

    fn required_spec(&self) -> &'static str {
        "lvm-on-md"
    }

    fn execute(&self, ctx: &HarnessContext) -> Result<()> {
        let engine = fixtures::engine_for(ctx)?;

        let containers: Vec<(String, StorageKind)> = engine
            .get_containers()
            .into_iter()
            .map(|c| (c.name, c.kind))
            .collect();
        ensure_eq(
            containers,
            vec![
                ("sda".to_string(), StorageKind::Disk),
                ("sdb".to_string(), StorageKind::Disk),
                ("md0".to_string(), StorageKind::Md),
                ("md2".to_string(), StorageKind::Md),
                ("system".to_string(), StorageKind::LvmVg),
            ],
            "containers",
        )?;

        let vg = engine
            .get_lvm_vg_info("system")
            .map_err(fixtures::engine_error)?;
        ensure_eq(vg.free_k(), 511 * 4096, "vg free space")?;

        let lvs: Vec<String> = engine
            .get_lvm_lv_info("/dev/system")
            .map_err(fixtures::engine_error)?
            .iter()
            .map(|lv| lv.display_name())
            .collect();
        ensure_eq(
            lvs,
            vec![
                "system/root".to_string(),
                "system/home".to_string(),
                "system/swap".to_string(),
            ],
            "logical volumes",
        )?;

        let md2 = engine.get_md_info("/dev/md2").map_err(fixtures::engine_error)?;
        ensure(!md2.is_degraded(), "md2 has both mirrors")?;

        let data = engine
            .get_filesystem_info("data")
            .map_err(fixtures::engine_error)?;
        ensure_eq(data.devices.len(), 2, "btrfs devices")?;

        let nfs = engine
            .get_volume("nas:/export/share")
            .map_err(fixtures::engine_error)?;
        ensure_eq(nfs.kind(), StorageKind::Filesystem, "nfs share kind")
    }
}
