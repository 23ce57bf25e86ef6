//! mesh-export - Nethercore mesh exporter
//!
//! Converts a JSON dump of source meshes into deduplicated, bone-partitioned
//! vertex buffers (.ncmesh.json)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glam::{Affine2, Vec2};
use mesh_common::{MODEL_EXT, MAX_UV_CHANNELS, write_model};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use mesh_export::{ExportConfig, MeshBuilder, SourceScene, convert_all};

#[derive(Parser)]
#[command(name = "mesh-export")]
#[command(about = "Nethercore mesh exporter")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ConfigArgs {
    /// Path to export.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bone slots per part (overrides config)
    #[arg(long)]
    max_bones: Option<usize>,

    /// Blend weights per vertex (overrides config)
    #[arg(long)]
    max_weights: Option<usize>,

    /// Pack vertex colors into one float
    #[arg(long)]
    packed_colors: bool,
}

impl ConfigArgs {
    fn load(&self) -> Result<ExportConfig> {
        let mut config = match &self.config {
            Some(path) => ExportConfig::load(path)
                .with_context(|| format!("Failed to load config: {:?}", path))?,
            None => ExportConfig::default(),
        };
        if let Some(max_bones) = self.max_bones {
            config.max_bones_per_part = max_bones;
        }
        if let Some(max_weights) = self.max_weights {
            config.max_blend_weights = max_weights;
        }
        if self.packed_colors {
            config.packed_colors = true;
        }
        Ok(config.clamped())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a source mesh dump
    Convert {
        /// Input JSON mesh dump
        input: PathBuf,

        /// Output .ncmesh.json file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,

        /// Flip the V coordinate of every UV channel
        #[arg(long)]
        flip_v: bool,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Convert without writing output and report diagnostics
    Check {
        /// Input JSON mesh dump
        input: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn load_scene(input: &Path) -> Result<SourceScene> {
    let file = File::open(input).with_context(|| format!("Failed to open input: {:?}", input))?;
    SourceScene::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse mesh dump: {:?}", input))
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
    let cancel = AtomicBool::new(false);

    match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            flip_v,
            pretty,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(MODEL_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);

            let scene = load_scene(&input)?;
            let mut builder = MeshBuilder::new(config.load()?);
            if flip_v {
                let flip = Affine2::from_translation(Vec2::Y) * Affine2::from_scale(Vec2::new(1.0, -1.0));
                for channel in 0..MAX_UV_CHANNELS {
                    builder = builder.with_uv_transform(channel, flip);
                }
            }

            let batch = convert_all(&builder, &scene.meshes, &cancel)?;

            let file = File::create(&output)
                .with_context(|| format!("Failed to create output: {:?}", output))?;
            write_model(BufWriter::new(file), &batch.model, pretty)
                .with_context(|| format!("Failed to write model: {:?}", output))?;

            if batch.diagnostic_count() > 0 {
                tracing::warn!("{} diagnostics, see warnings above", batch.diagnostic_count());
            }
            tracing::info!("Done!");
        }

        Commands::Check { input, config } => {
            tracing::info!("Checking {:?}", input);

            let scene = load_scene(&input)?;
            let builder = MeshBuilder::new(config.load()?);
            let batch = convert_all(&builder, &scene.meshes, &cancel)?;

            for (mesh, diagnostics) in batch.model.meshes.iter().zip(&batch.diagnostics) {
                println!(
                    "{}: {} vertices, {} parts, {} diagnostics",
                    mesh.id,
                    mesh.vertex_count(),
                    mesh.parts.len(),
                    diagnostics.len()
                );
                for diagnostic in diagnostics.entries() {
                    println!("  {}", diagnostic);
                }
            }

            if batch.diagnostic_count() > 0 {
                anyhow::bail!("{} diagnostics found", batch.diagnostic_count());
            }
            tracing::info!("All meshes are clean!");
        }
    }

    Ok(())
}
