//! Pose Overlay Renderer
//!
//! Loads one SPEED sample and writes it with its ground-truth axes (and
//! optionally the wireframe box) drawn on top.
//!
//! Usage:
//!   cargo run --example render_pose -- \
//!     --speed-root /data/speed \
//!     --sample 42 \
//!     --wireframe \
//!     --output output/img_42.png

use clap::Parser;
use log::info;
use speed_pose::camera::{Resolution, SensorConfig};
use speed_pose::dataset::{DatasetConfig, SpeedDataset};
use speed_pose::util::RasterCanvas;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Render a SPEED sample with its ground-truth pose")]
struct Cli {
    /// Dataset root holding images/<split>/
    #[arg(short = 'r', long)]
    speed_root: PathBuf,

    /// Directory holding <split>.json (defaults to the dataset root)
    #[arg(short = 'a', long)]
    annotations_root: Option<PathBuf>,

    /// Split to read from (only train carries poses)
    #[arg(long, default_value = "train")]
    split: String,

    /// Sample index within the split
    #[arg(short = 'n', long, default_value_t = 0)]
    sample: usize,

    /// Side length of the square image the pose is drawn on
    #[arg(long, default_value_t = 256)]
    input_size: u32,

    /// Sensor description YAML (defaults to the Tango camera)
    #[arg(short = 'c', long)]
    sensor: Option<PathBuf>,

    /// Scale factor applied to the drawn axes
    #[arg(long, default_value_t = 1.0)]
    axis_scale: f64,

    /// Also draw the wireframe box
    #[arg(short = 'w', long)]
    wireframe: bool,

    /// Output image path
    #[arg(short = 'o', long, default_value = "output/pose_overlay.png")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let sensor = match &cli.sensor {
        Some(path) => SensorConfig::load_from_yaml(path)?,
        None => SensorConfig::default(),
    };
    let input_size = Resolution::square(cli.input_size);
    let annotations_root = cli
        .annotations_root
        .clone()
        .unwrap_or_else(|| cli.speed_root.clone());

    let config = DatasetConfig::new(&cli.speed_root, annotations_root)
        .with_input_size(input_size)
        .with_sensor(sensor);
    let dataset = SpeedDataset::new(&cli.split, &config)?;

    // The raw image is at native resolution; the overlay lives in input pixels.
    let image = dataset.load_image(cli.sample)?;
    let image = image::imageops::resize(
        &image,
        input_size.width,
        input_size.height,
        image::imageops::FilterType::Triangle,
    );
    let target = dataset.target(cli.sample)?;
    info!(
        "sample {} of {}: {:?}",
        cli.sample,
        dataset.len(),
        dataset.index().filename(cli.sample)
    );

    let mut canvas = RasterCanvas::new(input_size.width, input_size.height);
    dataset.visualize(&mut canvas, &image, &target, cli.axis_scale, cli.wireframe)?;
    canvas.save(&cli.output)?;

    println!("Pose overlay written to {:?}", cli.output);
    Ok(())
}
