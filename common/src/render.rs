use std::{ops::Range, path::Path};

use eyre::{Context, Result, bail};
use plotters::{coord::Shift, prelude::*, series::DashedLineSeries};
use tracing::debug;

use crate::style::{MARKERS, Marker, PALETTE, Style};

const NOTE_BACKGROUND_ALPHA: f64 = 0.8;
const NOTE_BORDER: RGBColor = RGBColor(0xCC, 0xCC, 0xCC);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum XScale {
    #[default]
    Linear,
    /// Logarithmic base 2. The axis is laid out in log2 space and spans
    /// exactly the data positions; ticks are labeled with the untransformed
    /// values.
    Log2,
}

#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
    pub marker: Marker,
    pub dashed: bool,
}

impl SeriesSpec {
    /// New solid series, color and marker taken from the style cycles by
    /// series index.
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>, idx: usize) -> Self {
        Self {
            label: label.into(),
            points,
            color: PALETTE[idx % PALETTE.len()],
            marker: MARKERS[idx % MARKERS.len()],
            dashed: false,
        }
    }

    pub fn with_color(mut self, color: RGBColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct LineChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_scale: XScale,
    pub filename: String,
    pub series: Vec<SeriesSpec>,
}

impl LineChartSpec {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            x_scale: XScale::Linear,
            filename: filename.into(),
            series: Vec::new(),
        }
    }

    pub fn log2_x(mut self) -> Self {
        self.x_scale = XScale::Log2;
        self
    }

    pub fn with_series(mut self, series: SeriesSpec) -> Self {
        self.series.push(series);
        self
    }
}

/// Renders `spec` as a single PNG inside `out_dir`.
///
/// Owns the whole figure lifecycle: the drawing area is created here and
/// dropped on every exit path, and exactly one file is written per call
/// (overwriting any previous one).
pub fn render_line_chart(
    spec: &LineChartSpec,
    style: &Style,
    host_note: Option<&str>,
    out_dir: &Path,
) -> Result<()> {
    if !out_dir.exists() {
        std::fs::create_dir_all(out_dir)
            .context(format!("Create chart directory {}", out_dir.display()))?;
    }
    let path = out_dir.join(&spec.filename);

    let series_points = spec
        .series
        .iter()
        .map(|series| match spec.x_scale {
            XScale::Log2 => series.points.iter().map(|&(x, y)| (x.log2(), y)).collect(),
            XScale::Linear => series.points.clone(),
        })
        .collect::<Vec<Vec<(f64, f64)>>>();

    let ((x_min, x_max), (y_min, y_max)) = data_bounds(spec, &series_points)?;
    let (y_lo, y_hi) = padded(y_min, y_max, true);
    let (x_lo, x_hi) = match spec.x_scale {
        // The log axis spans exactly the data positions.
        XScale::Log2 => (x_min, x_max),
        XScale::Linear => padded(x_min, x_max, false),
    };
    let x_fmt: Box<dyn Fn(&f64) -> String> = match spec.x_scale {
        XScale::Log2 => Box::new(|v: &f64| format_tick(v.exp2())),
        XScale::Linear => Box::new(|v: &f64| format_tick(*v)),
    };

    let root = BitMapBackend::new(&path, (style.width, style.height)).into_drawing_area();
    root.fill(&style.theme.background)?;
    draw_on(
        &root,
        spec,
        &series_points,
        style,
        host_note,
        x_lo..x_hi,
        y_lo..y_hi,
        &x_fmt,
    )?;
    root.present()
        .context(format!("Save chart {}", path.display()))?;

    debug!("Wrote {}", path.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_on(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    spec: &LineChartSpec,
    series_points: &[Vec<(f64, f64)>],
    style: &Style,
    host_note: Option<&str>,
    x_range: Range<f64>,
    y_range: Range<f64>,
    x_fmt: &dyn Fn(&f64) -> String,
) -> Result<()> {
    let x_span = x_range.end - x_range.start;
    let mut chart = ChartBuilder::on(root)
        .caption(spec.title.as_str(), style.title_font())
        .margin(style.margin())
        .x_label_area_size(style.x_label_area())
        .y_label_area_size(style.y_label_area())
        .build_cartesian_2d(x_range, y_range)?;

    let y_fmt = |v: &f64| format_tick(*v);
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .axis_desc_style(style.label_font())
        .label_style(style.tick_font())
        .x_label_formatter(x_fmt)
        .y_label_formatter(&y_fmt);
    if spec.x_scale == XScale::Log2 {
        // One tick per power of two across the data span.
        mesh.x_labels(x_span as usize + 1);
    }
    if style.theme.draw_grid {
        mesh.bold_line_style(style.theme.grid.stroke_width(style.px(0.5).max(1)))
            .light_line_style(style.theme.grid.mix(0.0));
    } else {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    let line_width = style.line_width();
    let radius = style.marker_radius();
    let marker_edge = style.theme.background.stroke_width(style.marker_edge());
    let legend_len = style.px(8.0) as i32;
    let dash_len = style.px(5.0) as i32;
    let dash_gap = style.px(2.5) as i32;

    for (series, points) in spec.series.iter().zip(series_points) {
        let color = series.color;
        let stroke = color.stroke_width(line_width);

        let anno = if series.dashed {
            chart.draw_series(DashedLineSeries::new(
                points.iter().copied(),
                dash_len,
                dash_gap,
                stroke,
            ))?
        } else {
            chart.draw_series(LineSeries::new(points.iter().copied(), stroke))?
        };
        anno.label(series.label.as_str()).legend(move |(x, y)| {
            PathElement::new(
                vec![(x, y), (x + legend_len, y)],
                color.stroke_width(line_width),
            )
        });

        match series.marker {
            Marker::Circle => {
                chart.draw_series(points.iter().map(|&point| {
                    EmptyElement::at(point)
                        + Circle::new((0, 0), radius, color.filled())
                        + Circle::new((0, 0), radius, marker_edge)
                }))?;
            }
            Marker::Square => {
                chart.draw_series(points.iter().map(|&point| {
                    EmptyElement::at(point)
                        + Rectangle::new([(-radius, -radius), (radius, radius)], color.filled())
                        + Rectangle::new([(-radius, -radius), (radius, radius)], marker_edge)
                }))?;
            }
            Marker::Triangle => {
                chart.draw_series(points.iter().map(|&point| {
                    EmptyElement::at(point) + TriangleMarker::new((0, 0), radius, color.filled())
                }))?;
            }
        }
    }

    let (legend_bg, legend_border) = if style.theme.framed_legend {
        (
            style.theme.background.mix(0.9),
            style.theme.foreground.mix(1.0),
        )
    } else {
        (
            style.theme.background.mix(0.0),
            style.theme.foreground.mix(0.0),
        )
    };
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(legend_bg)
        .border_style(legend_border)
        .label_font(style.legend_font())
        .draw()?;

    if let Some(note) = host_note {
        let (px_range, py_range) = chart.plotting_area().get_pixel_range();
        draw_host_note(root, style, note, (px_range.start, py_range.start))?;
    }

    Ok(())
}

/// Two-line host annotation on a translucent box in the upper-left corner
/// of the plotting area.
fn draw_host_note(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    style: &Style,
    note: &str,
    (area_x, area_y): (i32, i32),
) -> Result<()> {
    let font = style.note_font();
    let pad = style.px(3.0) as i32;
    let gap = style.px(1.5) as i32;

    let lines = note.lines().collect::<Vec<_>>();
    let mut text_w = 0i32;
    let mut line_h = 0i32;
    for line in &lines {
        let (w, h) = root.estimate_text_size(line, &font)?;
        text_w = text_w.max(w as i32);
        line_h = line_h.max(h as i32);
    }
    let text_h = lines.len() as i32 * line_h + lines.len().saturating_sub(1) as i32 * gap;

    let x0 = area_x + pad;
    let y0 = area_y + pad;
    let corners = [(x0 - pad, y0 - pad), (x0 + text_w + pad, y0 + text_h + pad)];
    root.draw(&Rectangle::new(
        corners,
        style.theme.background.mix(NOTE_BACKGROUND_ALPHA).filled(),
    ))?;
    root.draw(&Rectangle::new(corners, NOTE_BORDER.stroke_width(1)))?;

    for (idx, line) in lines.iter().enumerate() {
        let y = y0 + idx as i32 * (line_h + gap);
        root.draw(&Text::new((*line).to_owned(), (x0, y), font.clone()))?;
    }
    Ok(())
}

fn data_bounds(
    spec: &LineChartSpec,
    series_points: &[Vec<(f64, f64)>],
) -> Result<((f64, f64), (f64, f64))> {
    let mut points = series_points.iter().flatten().copied();
    let Some((mut x_min, mut y_min)) = points.next() else {
        bail!("Chart {} has no data points", spec.title);
    };
    let (mut x_max, mut y_max) = (x_min, y_min);
    for (x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    Ok(((x_min, x_max), (y_min, y_max)))
}

/// 5% margin around the data span. Non-negative axes are not padded below
/// zero.
fn padded(min: f64, max: f64, clamp_zero: bool) -> (f64, f64) {
    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        (max.abs() * 0.05).max(0.5)
    };
    let lo = if clamp_zero && min >= 0.0 {
        (min - pad).max(0.0)
    } else {
        min - pad
    };
    (lo, max + pad)
}

/// Plain integers where exact, one-decimal scientific beyond 1e6.
fn format_tick(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1.0e6 {
        let exp = abs.log10().floor() as i32;
        format!("{:.1}e{exp}", v / 10f64.powi(exp))
    } else if v == v.trunc() {
        format!("{v:.0}")
    } else {
        let s = format!("{v:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_formatting() {
        assert_eq!(format_tick(4096.0), "4096");
        assert_eq!(format_tick(14.5), "14.5");
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(2.5e9), "2.5e9");
        assert_eq!(format_tick(5.0e8), "5.0e8");
    }

    #[test]
    fn log2_ticks_label_byte_sizes() {
        // Tick positions live in log2 space; labels show the byte size.
        for (pos, label) in [(6.0, "64"), (8.0, "256"), (10.0, "1024"), (12.0, "4096")] {
            assert_eq!(format_tick(f64::exp2(pos)), label);
        }
    }

    #[test]
    fn padding_clamps_non_negative_axes_at_zero() {
        let (lo, hi) = padded(0.002346, 40.105459, true);
        assert_eq!(lo, 0.0);
        assert!(hi > 40.105459);

        let (lo, hi) = padded(14.261, 20.046, true);
        assert!(lo > 13.9 && lo < 14.261);
        assert!(hi > 20.046 && hi < 20.4);
    }

    #[test]
    fn series_defaults_follow_style_cycles() {
        let series = SeriesSpec::new("s", vec![(1.0, 1.0)], 8);
        assert_eq!(series.color, PALETTE[1]);
        assert_eq!(series.marker, MARKERS[2]);
        assert!(!series.dashed);
    }

    #[test]
    fn empty_spec_is_an_error() {
        let spec = LineChartSpec::new("t", "x", "y", "t.png");
        assert!(data_bounds(&spec, &[]).is_err());
    }
}
