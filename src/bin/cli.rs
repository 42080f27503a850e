// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geomod CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use geomod::config::{CliConfig, OutputFormat};
use geomod::geometry::{audit, is_consistently_oriented, is_manifold};
use geomod::{analyze, io, Mesh};
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "geomod")]
#[command(about = "Geomod - half-edge topology for OBJ meshes", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (terminal, json); overrides the config file
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Configuration file (defaults to ./geomod.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print topology statistics of an OBJ file
    Inspect {
        /// Input OBJ file
        input: String,
    },

    /// Write the face index triples as JSON
    Faces {
        /// Input OBJ file
        input: String,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the neighbors of a vertex
    Neighbors {
        /// Input OBJ file
        input: String,

        /// 0-based vertex index
        vertex: usize,
    },

    /// List boundary loops as vertex index sequences
    Boundary {
        /// Input OBJ file
        input: String,
    },

    /// Check manifoldness, orientation and half-edge invariants
    Validate {
        /// Input OBJ file
        input: String,
    },

    /// Show version information
    Version,
}

fn init_logging(config: &CliConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.log_level.as_str() };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(format) = &cli.format {
        config.format = OutputFormat::from_str(format)
            .with_context(|| format!("Unsupported format: {}", format))?;
    }
    init_logging(&config, cli.verbose);

    match &cli.command {
        Commands::Inspect { input } => inspect_command(input, &config)?,
        Commands::Faces { input, output } => faces_command(input, output.as_deref(), &config)?,
        Commands::Neighbors { input, vertex } => neighbors_command(input, *vertex, &config)?,
        Commands::Boundary { input } => boundary_command(input, &config)?,
        Commands::Validate { input } => validate_command(input, &config)?,
        Commands::Version => {
            println!("Geomod v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn load_mesh(input: &str, config: &CliConfig) -> Result<Mesh> {
    if !Path::new(input).exists() {
        bail!("Input file not found: {}", input);
    }

    let mesh = io::load_obj(input).with_context(|| format!("Failed to load {}", input))?;

    if config.audit {
        let issues = audit(&mesh);
        if !issues.is_empty() {
            for issue in &issues {
                log::error!("{}", issue);
            }
            bail!("{} invariant violations in {}", issues.len(), input);
        }
    }
    Ok(mesh)
}

fn inspect_command(input: &str, config: &CliConfig) -> Result<()> {
    let mesh = load_mesh(input, config)?;
    let stats = analyze(&mesh);

    match config.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Terminal => {
            println!("{} {}", "Mesh:".bold(), input);
            stats.print();
        }
    }
    Ok(())
}

fn faces_command(input: &str, output: Option<&str>, config: &CliConfig) -> Result<()> {
    let mesh = load_mesh(input, config)?;
    let json = serde_json::to_string_pretty(&mesh.to_face_indices())?;

    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path))?;
            println!(
                "{} Wrote {} faces to {}",
                "✓".green(),
                mesh.face_count(),
                path
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn neighbors_command(input: &str, vertex: usize, config: &CliConfig) -> Result<()> {
    let mesh = load_mesh(input, config)?;
    if vertex >= mesh.vertex_count() {
        bail!(
            "Vertex {} out of range ({} vertices)",
            vertex,
            mesh.vertex_count()
        );
    }

    let neighbors: Vec<usize> = mesh.vertex_neighbors(vertex).iter().map(|v| v.index).collect();
    let on_boundary = mesh.is_boundary_vertex(vertex);

    match config.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "vertex": vertex,
                "boundary": on_boundary,
                "neighbors": neighbors,
            }))?
        ),
        OutputFormat::Terminal => {
            let kind = if on_boundary {
                "boundary".yellow()
            } else {
                "interior".green()
            };
            println!("Vertex {} ({}): {:?}", vertex, kind, neighbors);
        }
    }
    Ok(())
}

fn boundary_command(input: &str, config: &CliConfig) -> Result<()> {
    let mesh = load_mesh(input, config)?;
    let loops: Vec<Vec<usize>> = mesh
        .boundary_loops()
        .iter()
        .map(|l| l.iter().map(|&he| mesh.halfedges()[he].origin).collect())
        .collect();

    match config.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&loops)?),
        OutputFormat::Terminal => {
            if loops.is_empty() {
                println!("{}", "Mesh is closed (no boundary loops)".green());
            }
            for (i, boundary_loop) in loops.iter().enumerate() {
                println!("Loop {} ({} edges): {:?}", i, boundary_loop.len(), boundary_loop);
            }
        }
    }
    Ok(())
}

fn validate_command(input: &str, config: &CliConfig) -> Result<()> {
    if !Path::new(input).exists() {
        bail!("Input file not found: {}", input);
    }

    let data = io::import_obj_file(input).with_context(|| format!("Failed to read {}", input))?;
    let manifold = is_manifold(&data.triangles);
    let oriented = is_consistently_oriented(&data.triangles);

    let mut issues: Vec<String> = Vec::new();
    let built = match Mesh::build(&data.positions, &data.triangles) {
        Ok(mesh) => {
            issues = audit(&mesh).iter().map(|i| i.to_string()).collect();
            Ok(())
        }
        Err(e) => Err(e.to_string()),
    };
    let passed = manifold && oriented && built.is_ok() && issues.is_empty();

    match config.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "input": input,
                "manifold": manifold,
                "consistently_oriented": oriented,
                "build_error": built.as_ref().err(),
                "issues": issues,
                "passed": passed,
            }))?
        ),
        OutputFormat::Terminal => {
            let mark = |ok: bool| if ok { "✓".green() } else { "✗".red() };
            println!("{} Edge-manifold", mark(manifold));
            println!("{} Consistently oriented", mark(oriented));
            match &built {
                Ok(()) => println!("{} Half-edge build", mark(true)),
                Err(e) => println!("{} Half-edge build: {}", mark(false), e),
            }
            for issue in &issues {
                println!("{} {}", mark(false), issue);
            }
        }
    }

    if !passed {
        bail!("Validation failed for {}", input);
    }
    Ok(())
}
