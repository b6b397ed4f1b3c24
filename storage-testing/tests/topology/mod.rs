pub mod container_listing;
pub mod expected_counts;
pub mod partitions_in_cylinder_order;
pub mod used_by_aggregates;
