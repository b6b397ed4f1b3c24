pub mod full_disk_rejects;
pub mod logical_in_extended;
pub mod next_free_md;
pub mod next_free_primary;
