//! Optional rendering of correction histories.
//!
//! Plotting is optional. Consumers take an `Option<&dyn Plotter>` and skip
//! rendering when it is `None`. [`bitmap_plotter`] hands out an owned
//! `Option<Box<dyn Plotter>>`, which `as_deref()` turns into that form. The
//! bitmap implementation is only compiled with the `bitmap` feature.

use std::path::Path;

use thiserror::Error;

#[cfg(feature = "bitmap")]
mod bitmap;
#[cfg(feature = "bitmap")]
pub use bitmap::BitmapPlotter;

#[derive(Debug, Error)]
pub enum PlotErrors {
    #[error("nothing to plot")]
    NoData,
    #[error("series '{label}' has {got} points, expected {expected}")]
    LengthMismatch {
        label: String,
        expected: usize,
        got: usize,
    },
    #[error("drawing failed: {0}")]
    Drawing(String),
}

/// One named line, sampled once per simulation step.
#[derive(Clone, Copy, Debug)]
pub struct Series<'a> {
    pub label: &'a str,
    pub values: &'a [f64],
}

impl<'a> Series<'a> {
    pub fn new(label: &'a str, values: &'a [f64]) -> Self {
        Self { label, values }
    }
}

#[derive(Clone, Debug)]
pub struct ChartLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for ChartLabels {
    fn default() -> Self {
        Self {
            title: "PID corrections over time".to_string(),
            x_label: "Step".to_string(),
            y_label: "PID output".to_string(),
        }
    }
}

pub trait Plotter {
    /// Draws every series against its step index.
    fn render(&self, series: &[Series<'_>]) -> Result<(), PlotErrors>;
}

/// Returns the bitmap plotter writing to `path`.
#[cfg(feature = "bitmap")]
pub fn bitmap_plotter(path: &Path) -> Option<Box<dyn Plotter>> {
    Some(Box::new(BitmapPlotter::new(path)))
}

/// Built without plotting support, so there is no plotter to return.
#[cfg(not(feature = "bitmap"))]
pub fn bitmap_plotter(path: &Path) -> Option<Box<dyn Plotter>> {
    tracing::debug!("built without bitmap plotting, ignoring {}", path.display());
    None
}

/// Checks that there is something to draw and that every series has the same
/// number of points. Returns that number.
pub fn check_series(series: &[Series<'_>]) -> Result<usize, PlotErrors> {
    let first = series.first().ok_or(PlotErrors::NoData)?;
    let expected = first.values.len();
    if expected == 0 {
        return Err(PlotErrors::NoData);
    }
    for s in series {
        if s.values.len() != expected {
            return Err(PlotErrors::LengthMismatch {
                label: s.label.to_string(),
                expected,
                got: s.values.len(),
            });
        }
    }
    Ok(expected)
}

/// Value range with 15% padding, or a fixed padding for very small ranges.
/// Non-finite values are ignored.
pub fn value_range(series: &[Series<'_>]) -> (f64, f64) {
    let (min, max) = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return (-1.0, 1.0);
    }
    let range = max - min;
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_check_series() {
        let a = [1.0, 2.0, 3.0];
        let b = [0.0, 0.0, 0.0];
        assert_eq!(
            check_series(&[Series::new("a", &a), Series::new("b", &b)]).unwrap(),
            3
        );
    }

    #[test]
    fn test_check_series_errors() {
        assert!(matches!(check_series(&[]), Err(PlotErrors::NoData)));
        assert!(matches!(
            check_series(&[Series::new("a", &[])]),
            Err(PlotErrors::NoData)
        ));
        let a = [1.0, 2.0];
        let b = [1.0];
        assert!(matches!(
            check_series(&[Series::new("a", &a), Series::new("b", &b)]),
            Err(PlotErrors::LengthMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_value_range() {
        let a = [0.0, 10.0];
        let b = [5.0, f64::NAN];
        let (lo, hi) = value_range(&[Series::new("a", &a), Series::new("b", &b)]);
        assert_abs_diff_eq!(lo, -1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(hi, 11.5, epsilon = 1e-12);
    }

    #[test]
    fn test_value_range_flat() {
        let a = [2.0, 2.0, 2.0];
        let (lo, hi) = value_range(&[Series::new("a", &a)]);
        assert_abs_diff_eq!(lo, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(hi, 2.5, epsilon = 1e-12);
    }

    #[cfg(not(feature = "bitmap"))]
    #[test]
    fn test_no_bitmap_plotter() {
        assert!(bitmap_plotter(Path::new("unused.png")).is_none());
    }
}
