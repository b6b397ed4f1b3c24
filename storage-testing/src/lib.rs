// SPDX-License-Identifier: GPL-3.0-only

//! Topology fixtures and a registered-case harness for the storage engine

pub mod builder;
pub mod errors;
pub mod harness;
pub mod spec;
