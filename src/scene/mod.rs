use std::sync::Arc;

use crate::surfaces::Surface;
use crate::trace::{
    Hit,
    Hittable,
    Interval,
    Ray,
};

pub mod example;
mod load;

pub use load::load_scene;
pub use load::{
    CameraConfig,
    SceneFile,
};

/// An ordered collection of surfaces.
///
/// Members are shared: the same surface may appear in several scenes. Cloning a scene is cheap
/// and does not copy its members.
#[derive(Debug, Clone)]
pub struct Scene {
    surfaces: Arc<[Arc<Surface>]>,
}

impl Scene {
    pub fn builder() -> SceneBuilder {
        SceneBuilder {
            surfaces: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl Hittable for Scene {
    /// Find the nearest hit among all members.
    ///
    /// Each member is queried with the far bound pulled in to the closest hit so far, so the
    /// result depends only on the geometry and not on the insertion order.
    fn hit(&self, ray: &Ray, interval: Interval) -> Option<Hit> {
        let mut closest = interval.max;
        let mut closest_hit = None;
        for s in &self.surfaces[..] {
            if let Some(hit) = s.hit(ray, Interval::new(interval.min, closest)) {
                closest = hit.t;
                closest_hit = Some(hit);
            }
        }
        closest_hit
    }
}

pub struct SceneBuilder {
    surfaces: Vec<Arc<Surface>>,
}

impl SceneBuilder {
    /// Append a surface, returning a handle that can be shared with other scenes.
    pub fn add<S>(&mut self, surface: S) -> Arc<Surface>
    where
        S: Into<Surface>,
    {
        let surface = Arc::new(surface.into());
        self.surfaces.push(surface.clone());
        surface
    }

    /// Append a surface that is already owned elsewhere.
    pub fn add_shared(&mut self, surface: Arc<Surface>) {
        self.surfaces.push(surface);
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn build(self) -> Scene {
        Scene {
            surfaces: self.surfaces.into(),
        }
    }
}
