//! Utilities and bindings for loading a scene from YAML configuration.
//!
//! This module contains serde bindings and wrappers for defining the scene,
//! opting for explicit conversion here rather than sprinkle #[derive(Deserialize)]
//! throughout the code. The sole exception to this is `Vec3`, which is unlikely to change.
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use anyhow::{
    anyhow,
    Context,
};
use log::warn;
use serde::Deserialize;

use crate::camera::{
    Camera,
    CameraBuilder,
};
use crate::scene::Scene;
use crate::surfaces;
use crate::vec::Point3;

/// A scene loaded from a file, along with any camera settings it carries.
#[derive(Debug, Clone)]
pub struct SceneFile {
    pub scene: Scene,
    pub camera: CameraConfig,
}

/// Load a scene from the given path.
pub fn load_scene<P: AsRef<Path>>(path: P) -> anyhow::Result<SceneFile> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("could not open scene file '{}'", path.display()))?;
    read_scene(BufReader::new(file))
        .with_context(|| format!("could not load scene file '{}'", path.display()))
}

pub(crate) fn read_scene<R: Read>(reader: R) -> anyhow::Result<SceneFile> {
    let config = serde_yaml::from_reader::<_, Config>(reader)?;
    config.camera.validate()?;

    let mut builder = Scene::builder();
    for surface in &config.surfaces {
        match surface {
            Surface::Sphere { radius, position } => {
                if !(radius.is_finite() && *radius > 0.0) {
                    return Err(anyhow!(
                        "sphere at {} must have a positive radius, got {}",
                        position,
                        radius
                    ));
                }
                builder.add(surfaces::Sphere::new(*position, *radius));
            }
        }
    }
    if builder.is_empty() {
        warn!("scene has no surfaces, only the background will be rendered");
    }
    Ok(SceneFile {
        scene: builder.build(),
        camera: config.camera,
    })
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct Config {
    #[serde(default)]
    camera: CameraConfig,
    #[serde(default)]
    surfaces: Vec<Surface>,
}

/// Camera settings; anything left out keeps the camera's default.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    pub aspect_ratio: Option<f64>,
    pub image_width: Option<usize>,
    pub samples_per_pixel: Option<usize>,
}

impl CameraConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(aspect_ratio) = self.aspect_ratio {
            if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
                return Err(anyhow!("aspect ratio must be positive, got {}", aspect_ratio));
            }
        }
        if self.image_width == Some(0) {
            return Err(anyhow!("image width must be at least 1"));
        }
        if self.samples_per_pixel == Some(0) {
            return Err(anyhow!("samples per pixel must be at least 1"));
        }
        Ok(())
    }

    /// Settings in `other` take precedence over these.
    pub fn merge(self, other: CameraConfig) -> CameraConfig {
        CameraConfig {
            aspect_ratio: other.aspect_ratio.or(self.aspect_ratio),
            image_width: other.image_width.or(self.image_width),
            samples_per_pixel: other.samples_per_pixel.or(self.samples_per_pixel),
        }
    }

    pub fn builder(&self) -> CameraBuilder {
        let mut builder = Camera::builder();
        if let Some(aspect_ratio) = self.aspect_ratio {
            builder = builder.aspect_ratio(aspect_ratio);
        }
        if let Some(image_width) = self.image_width {
            builder = builder.image_width(image_width);
        }
        if let Some(samples_per_pixel) = self.samples_per_pixel {
            builder = builder.samples_per_pixel(samples_per_pixel);
        }
        builder
    }
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "camelCase")]
enum Surface {
    Sphere { radius: f64, position: Point3 },
}
