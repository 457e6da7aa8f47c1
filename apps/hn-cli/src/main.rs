use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use thiserror::Error;
use uom::si::length::meter;
use uom::si::volume_rate::{cubic_meter_per_second, liter_per_second};

use hn_core::units::{lps, mm};
use hn_core::Id;
use hn_hydraulics::Material;
use hn_network::{Network, NetworkBuilder, NetworkError};
use hn_results::aggregate;
use hn_solver::{solve, BalanceConfig, SolveConfig, SolverError};

#[derive(Parser)]
#[command(name = "hn-cli")]
#[command(about = "Hydronet CLI - steady-state solver for looped water networks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a network file's topology without solving
    Validate {
        /// Path to the network JSON file
        network_path: PathBuf,
        /// Optional pipe catalog JSON (name -> nominal diameter in mm)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Solve the steady-state flow distribution
    Solve {
        /// Path to the network JSON file
        network_path: PathBuf,
        /// Optional pipe catalog JSON (name -> nominal diameter in mm)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Loop closure tolerance in meters of head
        #[arg(long, default_value_t = 0.5)]
        tolerance_m: f64,
        /// Outer balancing iteration cap
        #[arg(long, default_value_t = 100)]
        max_iterations: usize,
        /// Emit the full report as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Results(#[from] hn_results::ResultsError),

    #[error("Invalid input: {what}")]
    Input { what: String },
}

type CliResult<T> = Result<T, CliError>;

// ---- network file schema ----

#[derive(Debug, Deserialize)]
struct NetworkFile {
    nodes: Vec<NodeSpec>,
    pipes: Vec<PipeSpec>,
}

#[derive(Debug, Deserialize)]
struct NodeSpec {
    id: u32,
    x: f64,
    y: f64,
    /// Signed demand in L/s: positive = consumption, negative = supply.
    demand_lps: f64,
}

#[derive(Debug, Deserialize)]
struct PipeSpec {
    id: u32,
    start: u32,
    end: u32,
    material: MaterialSpec,
    /// Internal diameter in meters; alternative to `catalog`.
    #[serde(default)]
    diameter_m: Option<f64>,
    /// Catalog entry name resolving to a nominal diameter.
    #[serde(default)]
    catalog: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum MaterialSpec {
    Steel,
    #[serde(alias = "plastic")]
    Polyethylene,
}

impl From<MaterialSpec> for Material {
    fn from(spec: MaterialSpec) -> Self {
        match spec {
            MaterialSpec::Steel => Material::Steel,
            MaterialSpec::Polyethylene => Material::Polyethylene,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    diameter_mm: f64,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate {
            network_path,
            catalog,
        } => cmd_validate(&network_path, catalog.as_deref()),
        Commands::Solve {
            network_path,
            catalog,
            tolerance_m,
            max_iterations,
            json,
        } => cmd_solve(
            &network_path,
            catalog.as_deref(),
            tolerance_m,
            max_iterations,
            json,
        ),
    }
}

fn cmd_validate(network_path: &Path, catalog_path: Option<&Path>) -> CliResult<()> {
    let network = load_network(network_path, catalog_path)?;
    println!(
        "✓ Network is valid: {} nodes, {} pipes, {} loop(s), reference node {}",
        network.node_count(),
        network.pipe_count(),
        network.expected_loop_count(),
        network.reference_node().id
    );
    Ok(())
}

fn cmd_solve(
    network_path: &Path,
    catalog_path: Option<&Path>,
    tolerance_m: f64,
    max_iterations: usize,
    json: bool,
) -> CliResult<()> {
    let network = load_network(network_path, catalog_path)?;

    let config = SolveConfig {
        balance: BalanceConfig {
            tolerance_m,
            max_iterations,
            ..BalanceConfig::default()
        },
    };
    let solution = solve(&network, &config)?;
    let report = aggregate(&network, &solution);

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!("Pipes:");
    println!(
        "  {:>4} {:>10} {:>12} {:>12} {:>9} {:>10} {:>10}",
        "id", "route", "flow (L/s)", "v (m/s)", "Re", "lambda", "loss (m)"
    );
    for p in &report.pipes {
        println!(
            "  {:>4} {:>4}->{:<4} {:>12.4} {:>12.3} {:>9.0} {:>10.4} {:>10.3}",
            p.pipe_id,
            p.start_node,
            p.end_node,
            hn_core::units::m3ps(p.flow_m3s).get::<liter_per_second>(),
            p.velocity_mps,
            p.reynolds,
            p.friction_factor,
            p.head_loss_m
        );
    }

    if report.loops.is_empty() {
        println!("\nNo loops: tree network, linear solution is final.");
    } else {
        println!("\nLoops:");
        for (i, l) in report.loops.iter().enumerate() {
            let members: Vec<String> = l
                .pipes
                .iter()
                .map(|sp| format!("{}{}", if sp.sign > 0 { '+' } else { '-' }, sp.pipe_id))
                .collect();
            println!(
                "  loop {}: [{}]  closure {:+.4} m  {}",
                i + 1,
                members.join(", "),
                l.discrepancy_m,
                if l.within_tolerance { "ok" } else { "UNBALANCED" }
            );
        }
    }

    println!(
        "\n{} after {} iteration(s).",
        if report.converged {
            "Converged"
        } else {
            "Iteration cap reached; showing best-effort result"
        },
        report.iterations
    );
    Ok(())
}

/// Load, resolve against the catalog, and build the immutable network.
fn load_network(network_path: &Path, catalog_path: Option<&Path>) -> CliResult<Network> {
    let text = std::fs::read_to_string(network_path)?;
    let file: NetworkFile = serde_json::from_str(&text)?;

    let catalog = match catalog_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let entries: Vec<CatalogEntry> = serde_json::from_str(&text)?;
            entries
                .into_iter()
                .map(|e| (e.name, e.diameter_mm))
                .collect()
        }
        None => HashMap::new(),
    };

    let mut builder = NetworkBuilder::new();
    for n in &file.nodes {
        // Demands enter in L/s and are converted once, here at the boundary.
        let demand_m3s = lps(n.demand_lps).get::<cubic_meter_per_second>();
        builder.add_node(n.id, n.x, n.y, demand_m3s);
    }
    for p in &file.pipes {
        let diameter_m = resolve_diameter(p, &catalog)?;
        builder.add_pipe(
            p.id,
            Id::new(p.start),
            Id::new(p.end),
            p.material.into(),
            diameter_m,
        );
    }
    Ok(builder.build()?)
}

fn resolve_diameter(pipe: &PipeSpec, catalog: &HashMap<String, f64>) -> CliResult<f64> {
    match (&pipe.diameter_m, &pipe.catalog) {
        (Some(d), None) => Ok(*d),
        (None, Some(name)) => {
            let diameter_mm = catalog.get(name).ok_or_else(|| CliError::Input {
                what: format!("pipe {}: catalog entry '{}' not found", pipe.id, name),
            })?;
            Ok(mm(*diameter_mm).get::<meter>())
        }
        (Some(_), Some(_)) => Err(CliError::Input {
            what: format!("pipe {}: give either diameter_m or catalog, not both", pipe.id),
        }),
        (None, None) => Err(CliError::Input {
            what: format!("pipe {}: missing diameter_m or catalog reference", pipe.id),
        }),
    }
}
