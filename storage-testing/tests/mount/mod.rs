pub mod change_mount_by_rules;
pub mod fstab_spec_by_scheme;
pub mod mount_point_overrides;
