//! Programmatic construction of probing batches for tests

use storage_types::{
    ContainerRecord, DEFAULT_MAX_PARTITIONS, DiskInfo, DiskLabel, FilesystemInfo, FsType,
    LvmLvInfo, LvmVgInfo, MdInfo, MdLevel, MdParity, PartitionInfo, PartitionType, ProbeFacts,
    VolumeInfo, VolumeRecord, partition_device_name,
};

/// Bytes per cylinder of every disk the builder creates
pub const CYL_SIZE: u64 = 1024 * 1024;

/// Builds [`ProbeFacts`] in discovery order
///
/// ```
/// use storage_testing::builder::TopologyBuilder;
/// use storage_types::{DiskLabel, PartitionType};
///
/// let facts = TopologyBuilder::new()
///     .disk("sda", DiskLabel::Gpt, 1000)
///     .partition("sda", 1, 0, 100, PartitionType::Primary)
///     .build();
/// assert_eq!(facts.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TopologyBuilder {
    facts: ProbeFacts,
}

fn volume(name: &str, device: &str, size_k: u64) -> VolumeInfo {
    VolumeInfo {
        name: name.to_string(),
        device: device.to_string(),
        size_k,
        ..VolumeInfo::default()
    }
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disk(mut self, name: &str, label: DiskLabel, cyl_count: u64) -> Self {
        self.facts.containers.push(ContainerRecord::Disk(DiskInfo {
            name: name.to_string(),
            device: format!("/dev/{name}"),
            size_k: cyl_count * CYL_SIZE / 1024,
            cyl_size: CYL_SIZE,
            cyl_count,
            label,
            max_partitions: DEFAULT_MAX_PARTITIONS,
            udev_id: Vec::new(),
            udev_path: None,
        }));
        self
    }

    /// Add a partition of `disk`; the disk must have been added first
    pub fn partition(
        mut self,
        disk: &str,
        number: u32,
        cyl_start: u64,
        cyl_size: u64,
        partition_type: PartitionType,
    ) -> Self {
        let disk_device = self
            .facts
            .containers
            .iter()
            .find_map(|record| match record {
                ContainerRecord::Disk(d) if d.name == disk => Some(d.device.clone()),
                _ => None,
            })
            .unwrap_or_else(|| format!("/dev/{disk}"));

        let device = partition_device_name(&disk_device, number);
        let name = device.trim_start_matches("/dev/").to_string();
        self.facts
            .volumes
            .push(VolumeRecord::Partition(PartitionInfo {
                volume: volume(&name, &device, cyl_size * CYL_SIZE / 1024),
                disk: disk.to_string(),
                number,
                cyl_start,
                cyl_size,
                partition_type,
            }));
        self
    }

    pub fn md(mut self, number: u32, level: MdLevel, members: &[&str]) -> Self {
        let device = MdInfo::device_for(number);
        self.facts.containers.push(ContainerRecord::Md(MdInfo {
            volume: volume(&format!("md{number}"), &device, 0),
            number,
            level,
            parity: MdParity::default(),
            chunk_size_k: 0,
            members: members.iter().map(|m| m.to_string()).collect(),
            spares: Vec::new(),
        }));
        self
    }

    pub fn vg(mut self, name: &str, pvs: &[&str]) -> Self {
        self.facts.containers.push(ContainerRecord::LvmVg(LvmVgInfo {
            name: name.to_string(),
            device: format!("/dev/{name}"),
            size_k: 0,
            pe_size_k: 4096,
            pe_count: 0,
            pe_free: 0,
            pvs: pvs.iter().map(|pv| pv.to_string()).collect(),
        }));
        self
    }

    pub fn lv(mut self, vg: &str, name: &str, size_k: u64) -> Self {
        self.facts.volumes.push(VolumeRecord::LvmLv(LvmLvInfo {
            volume: volume(&format!("{vg}/{name}"), &format!("/dev/{vg}/{name}"), size_k),
            vg: vg.to_string(),
            stripes: 1,
            stripe_size_k: 0,
        }));
        self
    }

    /// A filesystem object spanning `devices` (none for network filesystems)
    pub fn filesystem(mut self, name: &str, fs_type: FsType, devices: &[&str]) -> Self {
        let mut info = volume(name, name, 0);
        info.fs_type = fs_type;
        self.facts
            .volumes
            .push(VolumeRecord::Filesystem(FilesystemInfo {
                volume: info,
                devices: devices.iter().map(|d| d.to_string()).collect(),
            }));
        self
    }

    /// Put a filesystem on the volume named `name` and mount it
    pub fn mount(mut self, name: &str, fs_type: FsType, mount_point: &str) -> Self {
        if let Some(info) = self.volume_mut(name) {
            info.fs_type = fs_type;
            info.mount_point = Some(mount_point.to_string());
        }
        self
    }

    pub fn build(self) -> ProbeFacts {
        self.facts
    }

    fn volume_mut(&mut self, name: &str) -> Option<&mut VolumeInfo> {
        let from_volumes = self.facts.volumes.iter_mut().map(|record| match record {
            VolumeRecord::Partition(p) => &mut p.volume,
            VolumeRecord::LvmLv(lv) => &mut lv.volume,
            VolumeRecord::Filesystem(fs) => &mut fs.volume,
        });
        let from_arrays = self
            .facts
            .containers
            .iter_mut()
            .filter_map(|record| match record {
                ContainerRecord::Md(md) => Some(&mut md.volume),
                _ => None,
            });

        from_volumes.chain(from_arrays).find(|v| v.name == name)
    }
}
