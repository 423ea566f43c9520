use crate::vec::{
    Point3,
    Vec3,
};

/// A ray `P(t) = origin + t * dir`.
///
/// `dir` need not be unit length.
#[derive(Debug, Clone)]
pub struct Ray {
    origin: Point3,
    dir: Vec3,
}

impl Ray {
    pub fn new(origin: Point3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    pub fn dir(&self) -> Vec3 {
        self.dir
    }

    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.dir
    }
}

/// A closed range of real numbers `[min, max]`.
///
/// The range is empty whenever `min > max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    #[allow(unused)]
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    #[allow(unused)]
    pub const UNIVERSE: Interval = Interval {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    pub const fn new(min: f64, max: f64) -> Self {
        Interval { min, max }
    }

    #[allow(unused)]
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Inclusive containment.
    #[allow(unused)]
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Exclusive containment: both endpoints are rejected.
    #[inline]
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    #[inline]
    pub fn clamp(&self, x: f64) -> f64 {
        if x < self.min {
            return self.min;
        }
        if x > self.max {
            return self.max;
        }
        x
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::EMPTY
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub point: Point3,
    pub normal: Vec3,
    pub t: f64,
    pub front_face: bool,
}

impl Hit {
    /// Record a hit at `t` along `ray`.
    ///
    /// `outward_normal` must be unit length. The stored normal always opposes the ray, so it is
    /// flipped when the ray strikes the surface from inside.
    pub fn new(ray: &Ray, t: f64, outward_normal: Vec3) -> Self {
        let point = ray.at(t);
        let front_face = ray.dir().dot(&outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };
        Hit {
            point,
            normal,
            t,
            front_face,
        }
    }
}

/// An object within the scene that can be hit by rays.
pub trait Hittable {
    /// Attempt to hit object with `ray`, returning the hit that occurred, if any.
    ///
    /// The hit must not be returned if it occured at a time t outside of `interval`.
    fn hit(&self, ray: &Ray, interval: Interval) -> Option<Hit>;
}
