use std::fmt::Debug;

use storage_contracts::{StorageError, StorageErrorKind};
use storage_engine::{EngineConfig, StorageEngine};
use storage_testing::errors::{Result, TestingError};
use storage_testing::harness::{HarnessContext, failure};
use storage_types::MountByType;

pub fn engine_error(error: StorageError) -> TestingError {
    TestingError::CaseFailed {
        reason: format!("{} ({})", error, error.kind().as_str()),
    }
}

/// Engine with the fixture of `ctx` loaded
pub fn engine_for(ctx: &HarnessContext) -> Result<StorageEngine> {
    engine_with_default(ctx, MountByType::default())
}

pub fn engine_with_default(ctx: &HarnessContext, mount_by: MountByType) -> Result<StorageEngine> {
    let config = EngineConfig {
        default_mount_by: mount_by,
        ..EngineConfig::default()
    };
    let engine = StorageEngine::new(&config);
    engine.load(ctx.spec.facts.clone()).map_err(engine_error)?;
    Ok(engine)
}

/// Fail unless `result` is an error of `kind`
pub fn expect_kind<T: Debug>(
    result: std::result::Result<T, StorageError>,
    kind: StorageErrorKind,
    what: &str,
) -> Result<()> {
    match result {
        Err(error) if error.kind() == kind => Ok(()),
        Err(error) => failure(format!(
            "{what}: expected {}, got {} ({error})",
            kind.as_str(),
            error.kind().as_str()
        )),
        Ok(value) => failure(format!(
            "{what}: expected {}, got {value:?}",
            kind.as_str()
        )),
    }
}
