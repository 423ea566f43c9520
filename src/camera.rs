use log::debug;
use rand::Rng;

use crate::progress::Progress;
use crate::trace::{
    Hittable,
    Interval,
    Ray,
};
use crate::vec::{
    Color,
    Point3,
    Vec3,
};

const FOCAL_LENGTH: f64 = 1.0;
const VIEWPORT_HEIGHT: f64 = 2.0;

const WHITE: Color = Color::new(1.0, 1.0, 1.0);
const SKY_BLUE: Color = Color::new(0.5, 0.7, 1.0);

/// Receives the rendered image one pixel at a time, in row-major order.
pub trait ColorSink {
    fn put(&mut self, color: Color);
}

impl ColorSink for Vec<Color> {
    fn put(&mut self, color: Color) {
        self.push(color);
    }
}

/// A pinhole camera at the origin looking down -z.
///
/// The derived viewport fields are only meaningful after `initialize`, which `build` and
/// `render` both call.
#[derive(Debug, Clone)]
pub struct Camera {
    aspect_ratio: f64,
    image_width: usize,
    samples_per_pixel: usize,

    image_height: usize,
    pixel_samples_scale: f64,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
}

pub struct CameraBuilder {
    aspect_ratio: f64,
    image_width: usize,
    samples_per_pixel: usize,
}

impl Camera {
    pub const DEFAULT_ASPECT_RATIO: f64 = 1.0;
    pub const DEFAULT_IMAGE_WIDTH: usize = 100;
    pub const DEFAULT_SAMPLES_PER_PIXEL: usize = 10;

    pub fn builder() -> CameraBuilder {
        CameraBuilder {
            aspect_ratio: Camera::DEFAULT_ASPECT_RATIO,
            image_width: Camera::DEFAULT_IMAGE_WIDTH,
            samples_per_pixel: Camera::DEFAULT_SAMPLES_PER_PIXEL,
        }
    }

    fn new(builder: CameraBuilder) -> Camera {
        let mut camera = Camera {
            aspect_ratio: builder.aspect_ratio,
            image_width: builder.image_width,
            samples_per_pixel: builder.samples_per_pixel,
            image_height: 1,
            pixel_samples_scale: 1.0,
            center: Point3::default(),
            pixel00_loc: Point3::default(),
            pixel_delta_u: Vec3::default(),
            pixel_delta_v: Vec3::default(),
        };
        camera.initialize();
        camera
    }

    /// Recompute every derived field from the configuration.
    pub fn initialize(&mut self) {
        // The ideal ratio; integer rounding means the real one may differ slightly.
        self.image_height = ((self.image_width as f64 / self.aspect_ratio) as usize).max(1);
        self.pixel_samples_scale = 1.0 / self.samples_per_pixel as f64;
        self.center = Point3::default();

        let viewport_width = VIEWPORT_HEIGHT * (self.image_width as f64 / self.image_height as f64);

        // Across the top edge and down the left edge.
        let viewport_u = Vec3::new(viewport_width, 0.0, 0.0);
        let viewport_v = Vec3::new(0.0, -VIEWPORT_HEIGHT, 0.0);

        self.pixel_delta_u = viewport_u / self.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        let viewport_upper_left = self.center
            - Vec3::new(0.0, 0.0, FOCAL_LENGTH)
            - viewport_u / 2.0
            - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        debug!(
            "camera: {}x{} image, viewport {}x{}, pixel00 at {}",
            self.image_width, self.image_height, viewport_width, VIEWPORT_HEIGHT, self.pixel00_loc
        );
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn image_width(&self) -> usize {
        self.image_width
    }

    pub fn image_height(&self) -> usize {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    pub fn pixel_samples_scale(&self) -> f64 {
        self.pixel_samples_scale
    }

    pub fn render<W, R, S>(&mut self, world: &W, rng: &mut R, sink: &mut S)
    where
        W: Hittable + ?Sized,
        R: Rng + ?Sized,
        S: ColorSink + ?Sized,
    {
        self.render_with_progress(world, rng, sink, &mut ())
    }

    /// Render `world`, handing one averaged linear color per pixel to `sink`.
    ///
    /// Rows go top to bottom, pixels left to right.
    pub fn render_with_progress<W, R, S, P>(
        &mut self,
        world: &W,
        rng: &mut R,
        sink: &mut S,
        progress: &mut P,
    ) where
        W: Hittable + ?Sized,
        R: Rng + ?Sized,
        S: ColorSink + ?Sized,
        P: Progress + ?Sized,
    {
        self.initialize();

        progress.start(self.image_height);
        for j in 0..self.image_height {
            progress.scanlines_remaining(self.image_height - j);
            for i in 0..self.image_width {
                let mut pixel_color = Color::default();
                for _ in 0..self.samples_per_pixel {
                    let ray = self.get_ray(i, j, rng);
                    pixel_color += ray_color(&ray, world);
                }
                sink.put(self.pixel_samples_scale * pixel_color);
            }
        }
        progress.done();
    }

    /// A ray from the camera center through a random point in the square around pixel `(i, j)`.
    pub fn get_ray<R: Rng + ?Sized>(&self, i: usize, j: usize, rng: &mut R) -> Ray {
        let offset = sample_square(rng);
        let pixel_sample = self.pixel00_loc
            + ((i as f64 + offset.x()) * self.pixel_delta_u)
            + ((j as f64 + offset.y()) * self.pixel_delta_v);

        Ray::new(self.center, pixel_sample - self.center)
    }
}

impl CameraBuilder {
    pub fn aspect_ratio(self, aspect_ratio: f64) -> Self {
        CameraBuilder {
            aspect_ratio,
            ..self
        }
    }

    pub fn image_width(self, image_width: usize) -> Self {
        CameraBuilder {
            image_width,
            ..self
        }
    }

    pub fn samples_per_pixel(self, samples_per_pixel: usize) -> Self {
        CameraBuilder {
            samples_per_pixel,
            ..self
        }
    }

    pub fn build(self) -> Camera {
        Camera::new(self)
    }
}

/// A vector to a random point in the unit square centered on the origin.
fn sample_square<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5, 0.0)
}

/// Color a ray by the surface normal it hits, or by the sky gradient if it escapes.
pub fn ray_color<W: Hittable + ?Sized>(ray: &Ray, world: &W) -> Color {
    if let Some(hit) = world.hit(ray, Interval::new(0.0, f64::INFINITY)) {
        return 0.5 * (hit.normal + WHITE);
    }
    let unit_direction = ray.dir().unit();
    let a = 0.5 * (unit_direction.y() + 1.0);
    (1.0 - a) * WHITE + a * SKY_BLUE
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::scene::Scene;
    use crate::surfaces::Sphere;

    const EPS: f64 = 1E-8;

    fn background_only() -> Scene {
        Scene::builder().build()
    }

    #[test]
    fn image_height_from_aspect_ratio() {
        let camera = Camera::builder()
            .aspect_ratio(16.0 / 9.0)
            .image_width(400)
            .build();
        assert_eq!(camera.image_height(), 225);

        let camera = Camera::builder().build();
        assert_eq!(camera.image_width(), 100);
        assert_eq!(camera.image_height(), 100);
        assert_eq!(camera.samples_per_pixel(), 10);
        assert_eq!(camera.aspect_ratio(), 1.0);

        let camera = Camera::builder().image_width(0).build();
        assert_eq!(camera.image_height(), 1);
        let camera = Camera::builder().aspect_ratio(50.0).image_width(10).build();
        assert_eq!(camera.image_height(), 1);
    }

    #[test]
    fn derived_geometry() {
        let camera = Camera::builder()
            .aspect_ratio(2.0)
            .image_width(4)
            .samples_per_pixel(4)
            .build();
        assert_eq!(camera.image_height(), 2);
        assert_eq!(camera.pixel_samples_scale(), 0.25);
        // Viewport is 4 wide and 2 tall, one unit in front of the camera.
        assert!(camera.pixel_delta_u.rel_eq(&Vec3::new(1.0, 0.0, 0.0), EPS));
        assert!(camera.pixel_delta_v.rel_eq(&Vec3::new(0.0, -1.0, 0.0), EPS));
        assert!(camera.pixel00_loc.rel_eq(&Point3::new(-1.5, 0.5, -1.0), EPS));
    }

    #[test]
    fn initialize_recomputes_everything() {
        let mut camera = Camera::builder().image_width(10).build();
        let before = camera.clone();
        camera.image_width = 20;
        camera.samples_per_pixel = 5;
        camera.initialize();
        assert_eq!(camera.image_height(), 20);
        assert_eq!(camera.pixel_samples_scale(), 0.2);
        assert!(camera.pixel_delta_u.rel_eq(&(before.pixel_delta_u / 2.0), EPS));

        let again = {
            let mut c = camera.clone();
            c.initialize();
            c
        };
        assert_eq!(again.pixel00_loc, camera.pixel00_loc);
        assert_eq!(again.pixel_delta_v, camera.pixel_delta_v);
    }

    #[test]
    fn sample_rays_stay_within_pixel() {
        let camera = Camera::builder().image_width(8).build();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let ray = camera.get_ray(3, 5, &mut rng);
            assert_eq!(ray.origin(), Point3::default());
            // The ray reaches the viewport plane at t = 1.
            let p = ray.at(1.0);
            assert!((p.z() + 1.0).abs() < EPS);
            let center = camera.pixel00_loc + 3.0 * camera.pixel_delta_u + 5.0 * camera.pixel_delta_v;
            assert!((p.x() - center.x()).abs() <= 0.5 * camera.pixel_delta_u.x() + EPS);
            assert!((p.y() - center.y()).abs() <= 0.5 * -camera.pixel_delta_v.y() + EPS);
        }
    }

    #[test]
    fn normal_coloring() {
        let mut builder = Scene::builder();
        builder.add(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5));
        let scene = builder.build();

        let ray = Ray::new(Point3::default(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(ray_color(&ray, &scene), Color::new(0.5, 0.5, 1.0));
    }

    #[test]
    fn sky_gradient() {
        let scene = background_only();
        let up = Ray::new(Point3::default(), Vec3::new(0.0, 3.0, 0.0));
        let down = Ray::new(Point3::default(), Vec3::new(0.0, -1.0, 0.0));
        let level = Ray::new(Point3::default(), Vec3::new(0.0, 0.0, -1.0));

        assert!(ray_color(&up, &scene).rel_eq(&SKY_BLUE, EPS));
        assert!(ray_color(&down, &scene).rel_eq(&WHITE, EPS));
        assert!(ray_color(&level, &scene).rel_eq(&Color::new(0.75, 0.85, 1.0), EPS));
    }

    #[test]
    fn renders_every_pixel_in_order() {
        let mut camera = Camera::builder()
            .aspect_ratio(16.0 / 9.0)
            .image_width(32)
            .samples_per_pixel(8)
            .build();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut pixels = Vec::new();
        camera.render(&background_only(), &mut rng, &mut pixels);
        assert_eq!(pixels.len(), 32 * 18);

        let height = camera.image_height();
        let width = camera.image_width();
        assert_eq!(height, 18);
        for p in &pixels {
            for c in 0..3 {
                assert!((-EPS..=1.0 + EPS).contains(&p[c]), "{} out of range", p);
            }
            // Every background pixel is a blend of white and sky blue.
            assert!((p.z() - 1.0).abs() < EPS, "{} is not fully blue", p);
            assert!(
                ((1.0 - p.x()) - (1.0 - p.y()) * 5.0 / 3.0).abs() < EPS,
                "{} is off the sky gradient",
                p
            );
        }

        // Rows go top to bottom, so each row is less blue (more red) than the one above it.
        let row_red = |j: usize| -> f64 {
            pixels[j * width..(j + 1) * width].iter().map(|p| p.x()).sum::<f64>() / width as f64
        };
        for j in 1..height {
            assert!(row_red(j - 1) < row_red(j), "row {} is bluer than row {}", j, j - 1);
        }
    }

    #[test]
    fn rendering_is_deterministic_for_a_seed() {
        let mut builder = Scene::builder();
        builder.add(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5));
        builder.add(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0));
        let scene = builder.build();
        let mut camera = Camera::builder().image_width(16).samples_per_pixel(4).build();

        let mut first = Vec::new();
        camera.render(&scene, &mut SmallRng::seed_from_u64(99), &mut first);
        let mut second = Vec::new();
        camera.render(&scene, &mut SmallRng::seed_from_u64(99), &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn more_samples_converge_to_the_same_color() {
        let mut builder = Scene::builder();
        builder.add(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5));
        let scene = builder.build();

        // A 5x5 image puts the sphere's silhouette through the middle pixels.
        let mean = |samples: usize, seed: u64| -> Vec<Color> {
            let mut camera = Camera::builder()
                .image_width(5)
                .samples_per_pixel(samples)
                .build();
            let mut pixels = Vec::new();
            camera.render(&scene, &mut SmallRng::seed_from_u64(seed), &mut pixels);
            pixels
        };
        let low = mean(4000, 3);
        let high = mean(16000, 4);
        for (a, b) in low.iter().zip(high.iter()) {
            assert!(a.rel_eq(b, 0.03), "{} vs {}", a, b);
        }
    }

    #[test]
    fn progress_counts_down_rows() {
        #[derive(Default)]
        struct Recorder {
            rows: usize,
            seen: Vec<usize>,
            done: bool,
        }
        impl Progress for Recorder {
            fn start(&mut self, rows: usize) {
                self.rows = rows;
            }
            fn scanlines_remaining(&mut self, remaining: usize) {
                self.seen.push(remaining);
            }
            fn done(&mut self) {
                self.done = true;
            }
        }

        let mut camera = Camera::builder().aspect_ratio(2.0).image_width(8).build();
        let mut recorder = Recorder::default();
        let mut pixels = Vec::new();
        camera.render_with_progress(
            &background_only(),
            &mut SmallRng::seed_from_u64(0),
            &mut pixels,
            &mut recorder,
        );
        assert_eq!(recorder.rows, 4);
        assert_eq!(recorder.seen, vec![4, 3, 2, 1]);
        assert!(recorder.done);
    }
}
