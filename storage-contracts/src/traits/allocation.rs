// SPDX-License-Identifier: GPL-3.0-only

use storage_types::{MdSlot, PartitionSlot, PartitionType, UnusedSlot};

use crate::StorageError;

/// Free-slot computations over the current snapshot.
///
/// Results are not reserved: two calls without an intervening load return
/// the same answer.
pub trait AllocationQuery: Send + Sync {
    fn next_free_partition(
        &self,
        disk: &str,
        requested: PartitionType,
    ) -> Result<PartitionSlot, StorageError>;

    fn next_free_md(&self) -> MdSlot;

    fn unused_partition_slots(&self, disk: &str) -> Result<Vec<UnusedSlot>, StorageError>;
}
