mod camera;
mod logger;
mod output;
mod progress;
mod scene;
mod surfaces;
mod trace;
mod vec;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::camera::Camera;
use crate::logger::LogLevel;
use crate::output::{
    Image,
    ImageFormat,
};
use crate::progress::ScanlineProgress;
use crate::scene::example::Example;
use crate::scene::CameraConfig;

#[derive(Parser)]
#[command(name = "spheretrace")]
/// Render a scene of spheres, colored by their surface normals.
struct TracerOpt {
    /// Output image width [default: 100].
    #[arg(long)]
    width: Option<usize>,
    /// Output image aspect ratio (width / height) [default: 1.0].
    #[arg(long)]
    aspect_ratio: Option<f64>,
    /// Number of samples to take per pixel [default: 10].
    #[arg(long = "samples", short = 's')]
    samples_per_pixel: Option<usize>,
    /// Destination of the output image.
    ///
    /// supported formats: ppm, png
    #[arg(long, short, default_value = "image.ppm")]
    output: PathBuf,
    /// Apply gamma-2 correction when writing the image.
    #[arg(long)]
    gamma: bool,
    /// Seed to use for RNG.
    ///
    /// By default the RNG will be seeded through the OS-provided entropy source.
    #[arg(long)]
    seed: Option<u64>,
    /// A scene file to load from configuration.
    #[arg(long, conflicts_with = "example")]
    scene: Option<PathBuf>,
    /// Built-in scene to render: empty, one-sphere, ground.
    #[arg(long, default_value = "ground")]
    example: Example,
    /// Do not report progress.
    #[arg(long, short)]
    quiet: bool,
    /// Logging level.
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

impl TracerOpt {
    fn camera_config(&self) -> CameraConfig {
        CameraConfig {
            aspect_ratio: self.aspect_ratio,
            image_width: self.width,
            samples_per_pixel: self.samples_per_pixel,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = TracerOpt::parse();
    logger::init_logger(config.log_level.into());

    // Fail on a bad output path before spending any time rendering.
    ImageFormat::from_path(&config.output)?;

    let (world, camera_config) = if let Some(ref path) = config.scene {
        let loaded = scene::load_scene(path)
            .with_context(|| format!("load scene file '{}'", path.display()))?;
        info!("loaded {} surfaces from '{}'", loaded.scene.len(), path.display());
        (loaded.scene, loaded.camera.merge(config.camera_config()))
    } else {
        info!("rendering example scene {:?}", config.example);
        (config.example.scene(), config.camera_config())
    };
    camera_config
        .validate()
        .context("invalid camera configuration")?;

    let mut camera: Camera = camera_config.builder().build();
    let image_width = camera.image_width();
    let image_height = camera.image_height();
    let samples_per_pixel = camera.samples_per_pixel();
    let rays = ray_count(image_width, image_height, samples_per_pixel);
    info!(
        "image {}x{} (aspect ratio {:.3}), {} samples per pixel",
        image_width,
        image_height,
        camera.aspect_ratio(),
        samples_per_pixel
    );

    let mut rng = small_rng(config.seed);
    let mut image = Image::new(image_width, image_height).with_gamma(config.gamma);

    let start = Instant::now();
    if config.quiet {
        camera.render(&world, &mut rng, &mut image);
    } else {
        camera.render_with_progress(&world, &mut rng, &mut image, &mut ScanlineProgress::new());
    }
    let elapsed_sec = start.elapsed().as_secs_f64();
    let rays_per_sec = rays / elapsed_sec;
    info!("Done in {elapsed_sec:.2}s ({rays_per_sec:.0} rays/s)");

    image.save(&config.output)?;
    info!(
        "wrote {}x{} image ({} pixels) to '{}'",
        image.width(),
        image.height(),
        image.pixels().len(),
        config.output.display()
    );
    Ok(())
}

fn small_rng(seed: Option<u64>) -> SmallRng {
    seed.map(SmallRng::seed_from_u64)
        .unwrap_or_else(SmallRng::from_entropy)
}

/// Total primary rays for a render, as a float since it only feeds the rays/s report.
fn ray_count(width: usize, height: usize, samples_per_pixel: usize) -> f64 {
    (width as f64) * (height as f64) * (samples_per_pixel as f64)
}
