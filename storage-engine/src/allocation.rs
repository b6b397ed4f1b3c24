//! Free partition slots and md array numbers
//!
//! Answers are computed from one snapshot and are not reserved.

use std::collections::BTreeSet;

use storage_contracts::StorageError;
use storage_types::{
    CylRegion, DiskInfo, MdInfo, MdSlot, PartitionInfo, PartitionSlot, PartitionType, UnusedSlot,
};
use tracing::debug;

use crate::catalog::Snapshot;

pub struct AllocationPlanner<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> AllocationPlanner<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// Lowest partition number on `disk` usable for a partition of type `requested`
    pub fn next_free_partition(
        &self,
        disk: &str,
        requested: PartitionType,
    ) -> Result<PartitionSlot, StorageError> {
        let disk = self.snapshot.disk(disk)?;
        let partitions = self.snapshot.partitions_of(disk);
        let caps = disk.effective_capabilities();
        let used: BTreeSet<u32> = partitions.iter().map(|p| p.number).collect();
        let has_extended = partitions.iter().any(|p| p.is_extended());

        let number = match requested {
            PartitionType::Primary => first_free_primary(disk, &used),
            PartitionType::Extended => {
                if !caps.extended_possible {
                    return Err(StorageError::invalid(format!(
                        "{} label on {} does not support extended partitions",
                        disk.label.as_str(),
                        disk.name
                    )));
                }
                if has_extended {
                    return Err(StorageError::invalid(format!(
                        "{} already has an extended partition",
                        disk.name
                    )));
                }
                first_free_primary(disk, &used)
            }
            PartitionType::Logical => {
                if !caps.extended_possible || !has_extended {
                    return Err(StorageError::NoExtendedPartition(disk.name.clone()));
                }
                (caps.max_primary + 1..=caps.max_logical).find(|n| !used.contains(n))
            }
        };

        let number = number.ok_or_else(|| StorageError::DiskFull(disk.name.clone()))?;
        debug!(
            disk = %disk.name,
            requested = requested.as_str(),
            number,
            "next free partition"
        );

        Ok(PartitionSlot {
            number,
            device: disk.partition_device(number),
        })
    }

    /// Lowest md number not taken by an existing array
    pub fn next_free_md(&self) -> MdSlot {
        let used: BTreeSet<u32> = self
            .snapshot
            .get_md_infos()
            .iter()
            .map(|md| md.number)
            .collect();

        let number = (0..=u32::MAX)
            .find(|n| !used.contains(n))
            .unwrap_or(u32::MAX);

        MdSlot {
            number,
            device: MdInfo::device_for(number),
        }
    }

    /// Free cylinder regions of `disk` and what may be created in each
    pub fn unused_partition_slots(&self, disk: &str) -> Result<Vec<UnusedSlot>, StorageError> {
        let disk = self.snapshot.disk(disk)?;
        let partitions = self.snapshot.partitions_of(disk);
        let caps = disk.effective_capabilities();

        let num_primary = partitions
            .iter()
            .filter(|p| p.partition_type == PartitionType::Primary)
            .count() as u32;
        let num_logical = partitions.iter().filter(|p| p.is_logical()).count() as u32;
        let extended = partitions.iter().find(|p| p.is_extended());
        let has_extended = extended.is_some();

        let primary_possible = num_primary + u32::from(has_extended) < caps.max_primary;
        let extended_possible = primary_possible && caps.extended_possible && !has_extended;
        let logical_possible =
            has_extended && num_logical < caps.max_logical.saturating_sub(caps.max_primary);

        let top_level: Vec<&PartitionInfo> = partitions
            .iter()
            .copied()
            .filter(|p| !p.is_logical())
            .collect();

        let mut slots: Vec<UnusedSlot> = gaps(disk.cyl_region(), &top_level)
            .into_iter()
            .map(|region| UnusedSlot {
                region,
                primary_slot: true,
                primary_possible,
                extended_slot: true,
                extended_possible,
                logical_slot: false,
                logical_possible: false,
            })
            .collect();

        if let Some(extended) = extended {
            let logical: Vec<&PartitionInfo> = partitions
                .iter()
                .copied()
                .filter(|p| p.is_logical())
                .collect();

            slots.extend(
                gaps(extended.region(), &logical)
                    .into_iter()
                    .map(|region| UnusedSlot {
                        region,
                        primary_slot: false,
                        primary_possible: false,
                        extended_slot: false,
                        extended_possible: false,
                        logical_slot: true,
                        logical_possible,
                    }),
            );
        }

        Ok(slots)
    }
}

fn first_free_primary(disk: &DiskInfo, used: &BTreeSet<u32>) -> Option<u32> {
    let max_primary = disk.effective_capabilities().max_primary;
    (disk.label.first_slot()..=max_primary)
        .find(|n| !disk.label.is_reserved_slot(*n) && !used.contains(n))
}

/// Regions of `outer` not covered by any of `partitions` (sorted by start)
fn gaps(outer: CylRegion, partitions: &[&PartitionInfo]) -> Vec<CylRegion> {
    let mut free = Vec::new();
    let mut cursor = outer.start;

    for p in partitions {
        let region = p.region();
        if region.start > cursor {
            free.push(CylRegion::new(cursor, region.start - cursor));
        }
        cursor = cursor.max(region.end());
    }

    if outer.end() > cursor {
        free.push(CylRegion::new(cursor, outer.end() - cursor));
    }

    free
}
