//! Built-in scenes.
use std::str::FromStr;

use super::Scene;
use crate::surfaces::Sphere;
use crate::vec::Point3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Example {
    Empty,
    OneSphere,
    #[default]
    Ground,
}

#[derive(Debug, Clone, Copy)]
pub struct InvalidExample;

impl ::std::error::Error for InvalidExample {}

impl ::std::fmt::Display for InvalidExample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid example (expected one of: empty, one-sphere, ground)")
    }
}

impl FromStr for Example {
    type Err = InvalidExample;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "empty" => Ok(Example::Empty),
            "one-sphere" => Ok(Example::OneSphere),
            "ground" => Ok(Example::Ground),
            _ => Err(InvalidExample),
        }
    }
}

impl Example {
    pub fn scene(&self) -> Scene {
        match self {
            Example::Empty => Scene::builder().build(),
            Example::OneSphere => one_sphere(),
            Example::Ground => ground(),
        }
    }
}

/// A single small sphere straight ahead of the camera.
fn one_sphere() -> Scene {
    let mut scene = Scene::builder();
    scene.add(Sphere::new(Point3::new(0., 0., -1.), 0.5));
    scene.build()
}

/// The small sphere resting on a much larger one that stands in for the ground.
fn ground() -> Scene {
    let mut scene = Scene::builder();
    scene.add(Sphere::new(Point3::new(0., 0., -1.), 0.5));
    scene.add(Sphere::new(Point3::new(0., -100.5, -1.), 100.));
    scene.build()
}
