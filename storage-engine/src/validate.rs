//! Structural checks a probing batch must pass before it becomes a snapshot

use std::collections::{HashMap, HashSet};

use storage_contracts::StorageError;
use storage_types::{DiskInfo, PartitionInfo, PartitionType, StorageObject};

/// Lookup over the batch being validated, by name or device
struct BatchIndex<'a> {
    objects: &'a [StorageObject],
    keys: HashMap<&'a str, usize>,
}

impl<'a> BatchIndex<'a> {
    fn resolve(&self, key: &str) -> Option<&'a StorageObject> {
        self.keys.get(key).map(|idx| &self.objects[*idx])
    }
}

/// Check a batch of objects; the first violation found is returned.
pub(crate) fn validate(objects: &[StorageObject]) -> Result<(), StorageError> {
    check_values(objects)?;
    let index = check_identity(objects)?;
    check_references(&index)?;
    check_aggregates(&index)?;
    check_partitions(&index)?;
    check_md_numbers(objects)?;
    Ok(())
}

fn check_values(objects: &[StorageObject]) -> Result<(), StorageError> {
    for object in objects {
        if object.name().is_empty() || object.device().is_empty() {
            return Err(StorageError::invalid(format!(
                "{} record with empty name or device",
                object.kind()
            )));
        }

        match object {
            StorageObject::Disk(disk) if disk.cyl_size == 0 => {
                return Err(StorageError::invalid(format!(
                    "disk {} has zero cylinder size",
                    disk.name
                )));
            }
            StorageObject::Partition(p) if p.cyl_size == 0 => {
                return Err(StorageError::invalid(format!(
                    "partition {} has an empty cylinder range",
                    p.volume.name
                )));
            }
            StorageObject::LvmVg(vg) if vg.pe_size_k == 0 => {
                return Err(StorageError::invalid(format!(
                    "volume group {} has zero extent size",
                    vg.name
                )));
            }
            StorageObject::LvmLv(lv) if lv.stripes == 0 => {
                return Err(StorageError::invalid(format!(
                    "logical volume {} has zero stripes",
                    lv.volume.name
                )));
            }
            StorageObject::LvmLv(lv) if lv.is_striped() && lv.stripe_size_k == 0 => {
                return Err(StorageError::invalid(format!(
                    "logical volume {} is striped without a stripe size",
                    lv.volume.name
                )));
            }
            _ => {}
        }
    }

    Ok(())
}

fn check_identity(objects: &[StorageObject]) -> Result<BatchIndex<'_>, StorageError> {
    let mut names = HashSet::new();
    let mut devices = HashSet::new();
    let mut keys = HashMap::new();

    for (idx, object) in objects.iter().enumerate() {
        if !names.insert(object.name()) {
            return Err(StorageError::inconsistent(format!(
                "duplicate name {}",
                object.name()
            )));
        }
        if !devices.insert(object.device()) {
            return Err(StorageError::inconsistent(format!(
                "duplicate device {}",
                object.device()
            )));
        }
        keys.entry(object.device()).or_insert(idx);
    }

    // names win over devices when a string is both
    for (idx, object) in objects.iter().enumerate() {
        keys.insert(object.name(), idx);
    }

    Ok(BatchIndex { objects, keys })
}

fn check_references(index: &BatchIndex<'_>) -> Result<(), StorageError> {
    for object in index.objects {
        let (parent, expected) = match object {
            StorageObject::Partition(p) => (p.disk.as_str(), "disk"),
            StorageObject::LvmLv(lv) => (lv.vg.as_str(), "volume group"),
            _ => continue,
        };

        let resolved = index.resolve(parent).ok_or_else(|| {
            StorageError::inconsistent(format!(
                "{} {} refers to missing {expected} {parent}",
                object.kind(),
                object.name()
            ))
        })?;

        let kind_ok = matches!(
            (object, resolved),
            (StorageObject::Partition(_), StorageObject::Disk(_))
                | (StorageObject::LvmLv(_), StorageObject::LvmVg(_))
        );
        if !kind_ok {
            return Err(StorageError::inconsistent(format!(
                "parent {parent} of {} is a {}, expected a {expected}",
                object.name(),
                resolved.kind()
            )));
        }
    }

    Ok(())
}

fn check_aggregates(index: &BatchIndex<'_>) -> Result<(), StorageError> {
    let mut consumers: HashMap<&str, &str> = HashMap::new();

    for object in index.objects {
        let members = object.members();
        let mut seen = HashSet::new();

        for member in members {
            let resolved = index.resolve(member).ok_or_else(|| {
                StorageError::inconsistent(format!(
                    "{} {} refers to missing device {member}",
                    object.kind(),
                    object.name()
                ))
            })?;

            if !resolved.is_block_member() {
                return Err(StorageError::inconsistent(format!(
                    "{} {} cannot be a member of {}",
                    resolved.kind(),
                    resolved.name(),
                    object.name()
                )));
            }

            if !seen.insert(resolved.name()) {
                return Err(StorageError::inconsistent(format!(
                    "{} is listed twice in {}",
                    resolved.name(),
                    object.name()
                )));
            }

            if let Some(previous) = consumers.insert(resolved.name(), object.name()) {
                return Err(StorageError::inconsistent(format!(
                    "{} is used by both {previous} and {}",
                    resolved.name(),
                    object.name()
                )));
            }
        }
    }

    Ok(())
}

fn check_partitions(index: &BatchIndex<'_>) -> Result<(), StorageError> {
    let mut by_disk: HashMap<&str, Vec<&PartitionInfo>> = HashMap::new();
    for object in index.objects {
        if let StorageObject::Partition(p) = object
            && let Some(StorageObject::Disk(disk)) = index.resolve(&p.disk)
        {
            by_disk.entry(disk.name.as_str()).or_default().push(p);
        }
    }

    for object in index.objects {
        if let StorageObject::Disk(disk) = object {
            let partitions = by_disk.remove(disk.name.as_str()).unwrap_or_default();
            check_disk_partitions(disk, &partitions)?;
        }
    }

    Ok(())
}

fn check_disk_partitions(
    disk: &DiskInfo,
    partitions: &[&PartitionInfo],
) -> Result<(), StorageError> {
    let caps = disk.effective_capabilities();
    let disk_region = disk.cyl_region();

    let mut numbers = HashSet::new();
    for p in partitions {
        if p.number == 0 || !numbers.insert(p.number) {
            return Err(StorageError::inconsistent(format!(
                "partition number {} is invalid or reused on {}",
                p.number, disk.name
            )));
        }

        if !disk_region.contains(&p.region()) {
            return Err(StorageError::inconsistent(format!(
                "partition {} extends beyond the {} cylinders of {}",
                p.volume.name, disk.cyl_count, disk.name
            )));
        }

        let number_ok = match p.partition_type {
            PartitionType::Primary | PartitionType::Extended => p.number <= caps.max_primary,
            PartitionType::Logical => p.number > caps.max_primary && p.number <= caps.max_logical,
        };
        if !number_ok {
            return Err(StorageError::inconsistent(format!(
                "{} partition {} has number {} outside the {} range",
                p.partition_type.as_str(),
                p.volume.name,
                p.number,
                disk.label.as_str()
            )));
        }
    }

    let extended: Vec<_> = partitions.iter().filter(|p| p.is_extended()).collect();
    if extended.len() > 1 {
        return Err(StorageError::inconsistent(format!(
            "{} has more than one extended partition",
            disk.name
        )));
    }
    if !extended.is_empty() && !caps.extended_possible {
        return Err(StorageError::inconsistent(format!(
            "{} label on {} does not support extended partitions",
            disk.label.as_str(),
            disk.name
        )));
    }

    let (logical, primary): (Vec<&PartitionInfo>, Vec<&PartitionInfo>) =
        partitions.iter().copied().partition(|p| p.is_logical());

    check_overlaps(&primary)?;
    check_overlaps(&logical)?;

    if !logical.is_empty() {
        let Some(ext) = extended.first() else {
            return Err(StorageError::inconsistent(format!(
                "{} has logical partitions but no extended partition",
                disk.name
            )));
        };

        for p in &logical {
            if !ext.region().contains(&p.region()) {
                return Err(StorageError::inconsistent(format!(
                    "logical partition {} lies outside extended partition {}",
                    p.volume.name, ext.volume.name
                )));
            }
        }
    }

    Ok(())
}

fn check_overlaps(partitions: &[&PartitionInfo]) -> Result<(), StorageError> {
    for (i, a) in partitions.iter().enumerate() {
        for b in &partitions[i + 1..] {
            if a.region().overlaps(&b.region()) {
                return Err(StorageError::inconsistent(format!(
                    "partitions {} and {} overlap",
                    a.volume.name, b.volume.name
                )));
            }
        }
    }

    Ok(())
}

fn check_md_numbers(objects: &[StorageObject]) -> Result<(), StorageError> {
    let mut numbers = HashSet::new();
    for object in objects {
        if let StorageObject::Md(md) = object
            && !numbers.insert(md.number)
        {
            return Err(StorageError::inconsistent(format!(
                "md number {} is used twice",
                md.number
            )));
        }
    }

    Ok(())
}
