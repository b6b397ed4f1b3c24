// SPDX-License-Identifier: GPL-3.0-only

//! CLI wrapper around the storage engine for inspecting probed facts

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use storage_contracts::ErrorReport;
use storage_engine::{
    AllocationQuery, EngineConfig, GraphExport, GraphView, MountPolicyQuery, StorageEngine,
    StorageError, TopologyQuery, get_fs_capabilities_by_name, logging,
};
use storage_types::{PartitionType, ProbeFacts};

/// Query a storage topology described by probed facts
#[derive(Parser)]
#[command(name = "storage-engine-cli")]
#[command(about = "Inspect storage topology, allocation and mount policy", long_about = None)]
struct Cli {
    /// Probed facts (JSON, or TOML with a .toml extension)
    #[arg(long)]
    facts: PathBuf,

    /// Engine configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all containers
    Containers,
    /// List the partitions of a disk
    Partitions {
        /// Disk name or device path
        disk: String,
    },
    /// Render the topology graph as Graphviz DOT
    Graph {
        /// device, mount or combined
        view: String,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the next free partition number of a disk
    NextFreePartition {
        /// Disk name or device path
        disk: String,
        /// primary, extended or logical
        partition_type: String,
    },
    /// Show the next free md array number
    NextFreeMd,
    /// Show the resolved mount settings of a volume
    MountInfo {
        /// Volume name or device path
        device: String,
    },
    /// Show the capability record of a filesystem
    Capabilities {
        /// Filesystem name (e.g. ext4)
        fs: String,
    },
    /// Format a byte count
    Human {
        bytes: u64,
        /// Use 1000-based units
        #[arg(long)]
        base10: bool,
        /// Number of fractional digits
        #[arg(long, default_value_t = 2)]
        precision: usize,
        /// Append the exact byte count
        #[arg(long)]
        exact: bool,
    },
}

#[derive(Serialize)]
struct MountInfo {
    device: String,
    mount_point: Option<String>,
    mount_by: String,
    crypt: bool,
    ignore_fstab: bool,
    fstab_spec: String,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<ExitCode> {
    match run(Cli::parse()) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // engine errors are reported as JSON like every other answer
        Err(error) => match error.downcast_ref::<StorageError>() {
            Some(storage_error) => {
                print_json(&ErrorReport::from(storage_error))?;
                Ok(ExitCode::FAILURE)
            }
            None => Err(error),
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => {
            let mut config = EngineConfig::default();
            config.apply_env();
            config
        }
    };
    logging::init(config.log_level);

    let engine = StorageEngine::new(&config);
    let facts = ProbeFacts::from_path(&cli.facts)
        .with_context(|| format!("loading facts from {}", cli.facts.display()))?;
    engine.load(facts)?;

    match cli.command {
        Commands::Containers => print_json(&engine.get_containers())?,
        Commands::Partitions { disk } => print_json(&engine.get_partition_info(&disk)?)?,
        Commands::Graph { view, output } => {
            let view = GraphView::parse(&view)
                .with_context(|| format!("unknown graph view {view:?}"))?;
            match output {
                Some(path) => engine.save_graph(&path, view)?,
                None => print!("{}", engine.render_graph_string(view)?),
            }
        }
        Commands::NextFreePartition {
            disk,
            partition_type,
        } => {
            let requested = PartitionType::parse(&partition_type)
                .with_context(|| format!("unknown partition type {partition_type:?}"))?;
            print_json(&engine.next_free_partition(&disk, requested)?)?;
        }
        Commands::NextFreeMd => print_json(&engine.next_free_md())?,
        Commands::MountInfo { device } => {
            let policy = engine.get_mount_policy(&device)?;
            print_json(&MountInfo {
                fstab_spec: engine.fstab_spec(&device)?,
                device,
                mount_point: policy.mount_point,
                mount_by: policy.mount_by.to_string(),
                crypt: policy.crypt,
                ignore_fstab: policy.ignore_fstab,
            })?;
        }
        Commands::Capabilities { fs } => print_json(&get_fs_capabilities_by_name(&fs)?)?,
        Commands::Human {
            bytes,
            base10,
            precision,
            exact,
        } => {
            let text = StorageEngine::byte_to_human_string(bytes, !base10, precision, exact)?;
            print_json(&text)?;
        }
    }

    Ok(())
}
