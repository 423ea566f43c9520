//! Turning rendered linear colors into image files.
use std::fs::File;
use std::io::{
    BufWriter,
    Write,
};
use std::path::Path;

use anyhow::{
    anyhow,
    Context,
};

use crate::camera::ColorSink;
use crate::trace::Interval;
use crate::vec::Color;

const INTENSITY: Interval = Interval::new(0.000, 0.999);

/// A row-major buffer of linear colors.
#[derive(Debug, Clone)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    gamma: bool,
}

impl Image {
    pub fn new(width: usize, height: usize) -> Self {
        Image {
            width,
            height,
            pixels: Vec::with_capacity(width * height),
            gamma: false,
        }
    }

    /// Apply gamma-2 correction when quantising.
    pub fn with_gamma(self, gamma: bool) -> Self {
        Image { gamma, ..self }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    fn check_complete(&self) -> anyhow::Result<()> {
        let expected = self.width * self.height;
        if self.pixels.len() != expected {
            return Err(anyhow!(
                "image has {} pixels, expected {} ({}x{})",
                self.pixels.len(),
                expected,
                self.width,
                self.height
            ));
        }
        Ok(())
    }

    fn bytes(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.pixels.iter().map(move |c| {
            [
                quantize(c.x(), self.gamma),
                quantize(c.y(), self.gamma),
                quantize(c.z(), self.gamma),
            ]
        })
    }

    /// Write as a plain-text PPM (P3).
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        self.check_complete()?;
        write!(writer, "P3\n{} {}\n255\n", self.width, self.height)?;
        for [r, g, b] in self.bytes() {
            writeln!(writer, "{} {} {}", r, g, b)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write as an 8-bit RGB PNG.
    pub fn write_png<W: Write>(&self, writer: W) -> anyhow::Result<()> {
        self.check_complete()?;
        let mut encoder = png::Encoder::new(writer, self.width as u32, self.height as u32);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        let data = self.bytes().flatten().collect::<Vec<u8>>();
        writer
            .write_image_data(&data[..])
            .with_context(|| "could not write image")?;
        writer.finish()?;
        Ok(())
    }

    /// Save to `path`, choosing the format from its extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)?;
        let file = File::create(path)
            .with_context(|| format!("could not create '{}'", path.display()))?;
        let writer = BufWriter::new(file);
        let written = match format {
            ImageFormat::Ppm => self.write_ppm(writer),
            ImageFormat::Png => self.write_png(writer),
        };
        written.with_context(|| format!("could not write '{}'", path.display()))
    }
}

impl ColorSink for Image {
    fn put(&mut self, color: Color) {
        self.pixels.push(color);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Ppm,
    Png,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("ppm") => Ok(ImageFormat::Ppm),
            Some("png") => Ok(ImageFormat::Png),
            _ => Err(anyhow!(
                "unsupported output format '{}' (supported formats: ppm, png)",
                path.display()
            )),
        }
    }
}

fn quantize(component: f64, gamma: bool) -> u8 {
    let c = if gamma && component > 0.0 {
        component.sqrt()
    } else {
        component
    };
    (256.0 * INTENSITY.clamp(c)) as u8
}
