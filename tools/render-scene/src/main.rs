//! Command-line front-end for shape-raster.
//!
//! Usage:
//!   render-scene render <scene.json> [-o <output.png|bmp>] [--background R,G,B]
//!   render-scene compare <file_a> <file_b> [-d <diff.png|bmp>]

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use render_scene::{compare_buffers, generate_diff_image, load_image, save_image, Image};
use shape_raster::color::Rgb8;
use shape_raster::raster_space::RasterConfig;
use shape_raster::scene::SceneDescription;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Log filter, e.g. `debug` or `shape_raster=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rasterize a JSON scene to an image file.
    Render {
        /// Scene description (JSON)
        scene: PathBuf,
        /// Output image; `.png` or `.bmp`. Defaults to the scene name with `.png`.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Background color as `r,g,b` or `#rrggbb`
        #[arg(long, default_value = "255,255,255")]
        background: Rgb8,
    },
    /// Compare two images pixel by pixel. Exits with 1 when they differ.
    Compare {
        a: PathBuf,
        b: PathBuf,
        /// Write a diff image highlighting differing pixels
        #[arg(short, long)]
        diff: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        Command::Render {
            scene,
            output,
            background,
        } => {
            let output = output.unwrap_or_else(|| scene.with_extension("png"));
            render(&scene, &output, background)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Compare { a, b, diff } => compare(&a, &b, diff.as_deref()),
    }
}

fn init_logging(level: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder.init();
}

fn render(scene: &Path, output: &Path, background: Rgb8) -> Result<()> {
    let file = File::open(scene).with_context(|| format!("failed to open {}", scene.display()))?;
    let desc = SceneDescription::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", scene.display()))?;
    log::info!(
        "{}: {}x{} canvas, {} records",
        scene.display(),
        desc.width,
        desc.height,
        desc.scene.len()
    );

    let mut space = desc
        .into_raster_space_with(RasterConfig { background })
        .with_context(|| format!("failed to build scene {}", scene.display()))?;

    let start = Instant::now();
    let stats = space.rasterize();
    log::info!(
        "rasterize took {:.3} ms ({} pixels painted)",
        start.elapsed().as_secs_f64() * 1000.0,
        stats.pixels_painted
    );

    save_image(output, &Image::from(space.into_image()))?;
    println!("Saved: {}", output.display());
    Ok(())
}

fn compare(path_a: &Path, path_b: &Path, diff_path: Option<&Path>) -> Result<ExitCode> {
    let a = load_image(path_a)?;
    let b = load_image(path_b)?;

    let result = compare_buffers(&a, &b)?;
    println!("{result}");

    if let Some(diff_path) = diff_path {
        save_image(diff_path, &generate_diff_image(&a, &b)?)?;
        println!("Diff image: {}", diff_path.display());
    }

    Ok(if result.identical {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
