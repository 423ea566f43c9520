use crate::scene::Scene;
use crate::trace::{
    Hit,
    Hittable,
    Interval,
    Ray,
};
use crate::vec::Point3;

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Point3,
    radius: f64,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Point3, radius: f64) -> Self {
        Sphere {
            center,
            radius: radius.max(0.0),
        }
    }

    #[cfg(test)]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Hittable for Sphere {
    #[inline(always)]
    fn hit(&self, ray: &Ray, interval: Interval) -> Option<Hit> {
        // With b = -2h the quadratic formula reduces to (h +- sqrt(h^2 - ac)) / a.
        let oc = self.center - ray.origin();
        let a = ray.dir().square_length();
        let h = ray.dir().dot(&oc);
        let c = oc.square_length() - self.radius * self.radius;
        let discriminant = h * h - a * c;

        if discriminant < 0.0 {
            // Does not hit the sphere.
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Nearest root first.
        let mut root = (h - sqrtd) / a;
        if !interval.surrounds(root) {
            root = (h + sqrtd) / a;
            if !interval.surrounds(root) {
                return None;
            }
        }
        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(Hit::new(ray, root, outward_normal))
    }
}

/// Anything that can be placed in a scene.
#[derive(Debug, Clone)]
pub enum Surface {
    Sphere(Sphere),
    Scene(Scene),
}

impl Hittable for Surface {
    fn hit(&self, ray: &Ray, interval: Interval) -> Option<Hit> {
        match *self {
            Self::Sphere(ref sphere) => sphere.hit(ray, interval),
            Self::Scene(ref scene) => scene.hit(ray, interval),
        }
    }
}

impl From<Sphere> for Surface {
    fn from(sphere: Sphere) -> Surface {
        Surface::Sphere(sphere)
    }
}

impl From<Scene> for Surface {
    fn from(scene: Scene) -> Surface {
        Surface::Scene(scene)
    }
}
