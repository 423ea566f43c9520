use std::io::Write;
use std::time::{
    Duration,
    Instant,
};

/// Receives render progress, one call per row.
///
/// Reporting is best-effort and must never influence the rendered image. Every method defaults
/// to doing nothing.
pub trait Progress {
    /// Rendering is about to begin on an image `rows` tall.
    fn start(&mut self, _rows: usize) {}

    /// Called before each row with the number of rows (including this one) still to go.
    fn scanlines_remaining(&mut self, _remaining: usize) {}

    fn done(&mut self) {}
}

/// No progress reporting.
impl Progress for () {}

/// A simple progress reporter that rewrites a single line on stderr.
pub struct ScanlineProgress {
    rows: usize,
    start: Option<Instant>,
}

impl ScanlineProgress {
    pub fn new() -> Self {
        ScanlineProgress {
            rows: 0,
            start: None,
        }
    }
}

impl Default for ScanlineProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for ScanlineProgress {
    fn start(&mut self, rows: usize) {
        self.rows = rows;
        self.start = Some(Instant::now());
    }

    fn scanlines_remaining(&mut self, remaining: usize) {
        let elapsed = self.start.map(|s| s.elapsed()).unwrap_or_default();
        eprint!(
            "\rScanlines remaining: {:>5} / {}    Elapsed: {}    ",
            remaining,
            self.rows,
            format_duration(elapsed)
        );
        // A failed flush only delays the next update.
        let _ = ::std::io::stderr().flush();
    }

    fn done(&mut self) {
        let elapsed = self.start.map(|s| s.elapsed()).unwrap_or_default();
        eprintln!("\rDone in {}.{:<40}", format_duration(elapsed), "");
    }
}

fn format_duration(d: Duration) -> String {
    let hours = d.as_secs() / 3600;
    let minutes = (d.as_secs() - hours * 3600) / 60;
    let secs = d.as_secs() - minutes * 60 - hours * 3600;

    if hours > 0 {
        format!("{:0>2}:{:0>2}:{:0>2}", hours, minutes, secs)
    } else {
        format!("{:0>2}:{:0>2}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(Duration::from_secs(0)), "00:00");
        assert_eq!(format_duration(Duration::from_secs(75)), "01:15");
        assert_eq!(format_duration(Duration::from_millis(59_999)), "00:59");
        assert_eq!(format_duration(Duration::from_secs(3 * 3600 + 62)), "03:01:02");
    }
}
