//! Registered fixture cases and the runner that drives them
//!
//! A case names the topology fixture it needs; the runner loads every
//! fixture once, runs the cases against it and collects the outcomes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{Result, TestingError};
use crate::spec::{self, TopologySpec};

#[derive(Debug, Clone)]
pub struct HarnessContext {
    pub spec: TopologySpec,
}

pub trait HarnessTest: Send + Sync {
    fn id(&self) -> &'static str;
    fn suite(&self) -> &'static str;
    fn required_spec(&self) -> &'static str;

    fn execute(&self, ctx: &HarnessContext) -> Result<()>;
}

pub type TestRef = Arc<dyn HarnessTest>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub id: &'static str,
    pub suite: &'static str,
    pub error: Option<String>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

pub fn failure(reason: impl Into<String>) -> Result<()> {
    Err(TestingError::CaseFailed {
        reason: reason.into(),
    })
}

/// Fail with `reason` unless `condition` holds
pub fn ensure(condition: bool, reason: impl Into<String>) -> Result<()> {
    if condition { Ok(()) } else { failure(reason) }
}

/// Fail unless `actual == expected`
pub fn ensure_eq<T>(actual: T, expected: T, what: &str) -> Result<()>
where
    T: PartialEq + std::fmt::Debug,
{
    ensure(
        actual == expected,
        format!("{what}: expected {expected:?}, got {actual:?}"),
    )
}

/// Run `tests` in order; fixtures are loaded once per name
pub fn run(tests: &[TestRef]) -> Vec<CaseOutcome> {
    let mut contexts: HashMap<&'static str, std::result::Result<HarnessContext, String>> =
        HashMap::new();

    tests
        .iter()
        .map(|test| {
            let ctx = contexts.entry(test.required_spec()).or_insert_with(|| {
                spec::load_by_name(test.required_spec())
                    .map(|spec| HarnessContext { spec })
                    .map_err(|error| error.to_string())
            });

            let error = match ctx {
                Ok(ctx) => test.execute(ctx).err().map(|error| error.to_string()),
                Err(error) => Some(error.clone()),
            };

            CaseOutcome {
                id: test.id(),
                suite: test.suite(),
                error,
            }
        })
        .collect()
}
