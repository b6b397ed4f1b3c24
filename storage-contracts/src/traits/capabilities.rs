// SPDX-License-Identifier: GPL-3.0-only

use storage_types::{FsCapabilities, FsType};

use crate::StorageError;

pub trait CapabilityQuery: Send + Sync {
    fn get_fs_capabilities(&self, fs: FsType) -> Result<FsCapabilities, StorageError>;
}
