//! Chart drawing
//!
//! SVG charts through `plotters`: a scatter of actual against predicted values
//! and overlaid histograms of one column in both windows. Non-finite values are
//! skipped; an empty or constant sample still gives a drawable, padded axis.
use crate::constants::CHART_SIZE;
use crate::errors::DriftError;
use crate::utils::{finite_bounds, padded_range};
use plotters::prelude::*;
use std::fmt::Display;
use std::path::Path;

const CAPTION_FONT: (&str, f64) = ("sans-serif", 20.0);
const REFERENCE_COLOR: RGBColor = RGBColor(31, 119, 180);
const CURRENT_COLOR: RGBColor = RGBColor(255, 127, 14);
const ALPHA: f64 = 0.5;

fn render_error<E: Display>(path: &Path, e: E) -> DriftError {
    DriftError::Render(path.display().to_string(), e.to_string())
}

/// Count values into `bins` equal width bins over `[lo, hi]`.
///
/// The last bin is closed, values outside the range are ignored.
pub fn bin_counts(values: &[f64], lo: f64, hi: f64, bins: usize) -> Vec<usize> {
    let mut counts = vec![0; bins];
    if bins == 0 || hi <= lo {
        return counts;
    }
    let width = (hi - lo) / bins as f64;
    for v in values.iter().filter(|v| v.is_finite() && **v >= lo && **v <= hi) {
        let b = (((v - lo) / width) as usize).min(bins - 1);
        counts[b] += 1;
    }
    counts
}

/// Scatter of `actual` (x) against `predicted` (y), with the identity line.
pub fn scatter_chart(path: &Path, title: &str, actual: &[f64], predicted: &[f64]) -> Result<(), DriftError> {
    let (lo, hi) = padded_range(finite_bounds(&[actual, predicted]));

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_error(path, e))?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT.into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, lo..hi)
        .map_err(|e| render_error(path, e))?;
    chart
        .configure_mesh()
        .x_desc("Actual")
        .y_desc("Predicted")
        .draw()
        .map_err(|e| render_error(path, e))?;

    chart
        .draw_series(
            actual
                .iter()
                .zip(predicted)
                .filter(|(a, p)| a.is_finite() && p.is_finite())
                .map(|(a, p)| Circle::new((*a, *p), 3, REFERENCE_COLOR.mix(ALPHA).filled())),
        )
        .map_err(|e| render_error(path, e))?;
    chart
        .draw_series(std::iter::once(PathElement::new(vec![(lo, lo), (hi, hi)], BLACK.mix(0.6))))
        .map_err(|e| render_error(path, e))?;

    root.present().map_err(|e| render_error(path, e))?;
    Ok(())
}

/// Histograms of `reference` and `current` on shared bins, drawn over each other.
pub fn histogram_chart(
    path: &Path,
    title: &str,
    column: &str,
    reference: &[f64],
    current: &[f64],
    bins: usize,
) -> Result<(), DriftError> {
    let (lo, hi) = padded_range(finite_bounds(&[reference, current]));
    let width = (hi - lo) / bins.max(1) as f64;
    let reference_counts = bin_counts(reference, lo, hi, bins);
    let current_counts = bin_counts(current, lo, hi, bins);
    let y_max = reference_counts
        .iter()
        .chain(current_counts.iter())
        .max()
        .copied()
        .unwrap_or(0)
        .max(1) as f64
        * 1.05;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_error(path, e))?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT.into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0f64..y_max)
        .map_err(|e| render_error(path, e))?;
    chart
        .configure_mesh()
        .x_desc(column)
        .y_desc("Count")
        .draw()
        .map_err(|e| render_error(path, e))?;

    for (label, counts, color) in [
        ("Reference", &reference_counts, REFERENCE_COLOR),
        ("Current", &current_counts, CURRENT_COLOR),
    ] {
        chart
            .draw_series(counts.iter().enumerate().filter(|(_, c)| **c > 0).map(|(b, c)| {
                let x0 = lo + b as f64 * width;
                Rectangle::new([(x0, 0.0), (x0 + width, *c as f64)], color.mix(ALPHA).filled())
            }))
            .map_err(|e| render_error(path, e))?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.mix(ALPHA).filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| render_error(path, e))?;

    root.present().map_err(|e| render_error(path, e))?;
    Ok(())
}
