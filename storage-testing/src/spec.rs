use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use storage_types::ProbeFacts;

use crate::errors::{Result, TestingError};

/// A named topology fixture: probed facts plus the shape they must produce
#[derive(Debug, Clone)]
pub struct TopologySpec {
    pub name: String,
    pub description: String,
    pub expect: Expectations,
    pub facts: ProbeFacts,
}

/// Counts a loaded fixture must match; unset fields are not checked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectations {
    pub containers: Option<usize>,
    pub volumes: Option<usize>,
    pub structural_edges: Option<usize>,
    pub mount_edges: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SpecHeader {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    expect: Expectations,
}

pub fn workspace_root() -> PathBuf {
    if let Ok(value) = std::env::var("STORAGE_TESTING_WORKSPACE_ROOT") {
        return PathBuf::from(value);
    }

    if let Ok(current_dir) = std::env::current_dir()
        && current_dir.join("resources/topologies").exists()
    {
        return current_dir;
    }

    let manifest_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    if manifest_root.join("resources/topologies").exists() {
        return manifest_root;
    }

    PathBuf::from(".")
}

pub fn specs_root() -> PathBuf {
    workspace_root().join("resources/topologies")
}

pub fn spec_path_for_name(spec_name: &str) -> PathBuf {
    specs_root().join(format!("{}.toml", spec_name))
}

/// Names of all fixtures, sorted
pub fn list_specs() -> Result<Vec<String>> {
    let root = specs_root();
    let entries = fs::read_dir(&root).map_err(|error| TestingError::SpecNotFound {
        spec_name: format!("{} ({error})", root.display()),
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("toml"))
        .filter_map(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
        })
        .collect();
    names.sort();
    Ok(names)
}

pub fn load_by_name(spec_name: &str) -> Result<TopologySpec> {
    let path = spec_path_for_name(spec_name);
    if !path.exists() {
        return Err(TestingError::SpecNotFound {
            spec_name: spec_name.to_string(),
        });
    }

    let raw = fs::read_to_string(&path).map_err(|error| TestingError::SpecInvalid {
        spec_name: spec_name.to_string(),
        reason: error.to_string(),
    })?;

    let spec = parse(spec_name, &raw)?;
    if spec.name != spec_name {
        return Err(TestingError::SpecInvalid {
            spec_name: spec_name.to_string(),
            reason: format!("file declares name '{}'", spec.name),
        });
    }

    validate(&spec)?;
    Ok(spec)
}

/// Parse fixture text; the header keys and the facts share one document
pub fn parse(spec_name: &str, raw: &str) -> Result<TopologySpec> {
    let invalid = |reason: String| TestingError::SpecInvalid {
        spec_name: spec_name.to_string(),
        reason,
    };

    let header: SpecHeader = toml::from_str(raw).map_err(|error| invalid(error.to_string()))?;
    let facts = ProbeFacts::from_toml_str(raw).map_err(|error| invalid(error.to_string()))?;

    Ok(TopologySpec {
        name: header.name,
        description: header.description,
        expect: header.expect,
        facts,
    })
}

pub fn validate(spec: &TopologySpec) -> Result<()> {
    if spec.name.is_empty() {
        return Err(TestingError::SpecInvalid {
            spec_name: "<unknown>".to_string(),
            reason: "name must not be empty".to_string(),
        });
    }

    if spec.facts.containers.is_empty() {
        return Err(TestingError::SpecInvalid {
            spec_name: spec.name.clone(),
            reason: "containers must not be empty".to_string(),
        });
    }

    Ok(())
}
