//! vdf-export - VDF mesh export tool
//!
//! Converts triangle meshes (OBJ, glTF, GLB) to .vdf vertex data files and
//! inspects existing ones.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Use modules from library
use vdf_export::{inspect, manifest, mesh, VDF_EXTENSION};

#[derive(Parser)]
#[command(name = "vdf-export")]
#[command(about = "VDF mesh export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build meshes from a manifest file
    Build {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,
    },

    /// Export a single mesh file
    Mesh {
        /// Input mesh file (OBJ/glTF/GLB)
        input: PathBuf,

        /// Output .vdf file (default: input with .vdf extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Mesh name to export from a glTF/GLB file (default: first mesh)
        #[arg(long)]
        object: Option<String>,
    },

    /// Print and verify the header of a .vdf file
    Inspect {
        /// Input .vdf file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building meshes from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            let built = manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete! {} meshes exported", built.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Mesh {
            input,
            output,
            object,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(VDF_EXTENSION));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            mesh::convert_mesh(&input, &output, object.as_deref())?;
            tracing::info!("Done!");
        }

        Commands::Inspect { input } => {
            let report = inspect::inspect_file(&input)?;
            print!("{}", report);
        }
    }

    Ok(())
}
