pub mod dot_edge_counts;
pub mod neighbors_follow_stack;
