//! Minimal SVG drawing for bar, line and pie charts.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use quick_xml::escape::escape;

const FONT: &str = "Helvetica, Arial, sans-serif";
const PALETTE: [(u8, u8, u8); 5] = [
    (54, 162, 235),
    (255, 99, 132),
    (75, 192, 192),
    (255, 159, 64),
    (153, 102, 255),
];
const TICKS: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

struct Plot {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Plot {
    fn new(frame: Frame, left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right: (frame.width - right).max(left + 1.0),
            bottom: (frame.height - bottom).max(top + 1.0),
        }
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Value range that always includes zero.
struct Domain {
    lo: f64,
    hi: f64,
}

impl Domain {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        let (mut lo, mut hi) = (0.0f64, 0.0f64);
        for v in values.filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if hi - lo < f64::EPSILON {
            hi = lo + 1.0;
        }
        Self { lo, hi }
    }

    /// Distance of `value` from the low end of an axis `extent` pixels long.
    fn scale(&self, value: f64, extent: f64) -> f64 {
        (value.clamp(self.lo, self.hi) - self.lo) / (self.hi - self.lo) * extent
    }

    fn tick(&self, step: usize) -> f64 {
        self.lo + (self.hi - self.lo) * step as f64 / TICKS as f64
    }
}

fn tick_label(value: f64) -> String {
    if (value.round() - value).abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn series_color(idx: usize) -> String {
    let (r, g, b) = PALETTE[idx % PALETTE.len()];
    format!("rgb({},{},{})", r, g, b)
}

fn slice_color(idx: usize, count: usize) -> String {
    let hue = (idx as f64 * 360.0 / count.max(1) as f64) % 360.0;
    format!("hsl({:.0},70%,60%)", hue)
}

fn open(frame: Frame, title: &str) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT}">"#,
        w = frame.width,
        h = frame.height,
    );
    let _ = write!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = write!(
        svg,
        r#"<text x="{}" y="32" text-anchor="middle" font-size="18" font-weight="bold">{}</text>"#,
        frame.width / 2.0,
        escape(title)
    );
    svg
}

fn legend(svg: &mut String, frame: Frame, series: &[Series]) {
    let slot = frame.width / (series.len() + 1) as f64;
    for (idx, s) in series.iter().enumerate() {
        let x = slot * (idx + 1) as f64 - 30.0;
        let _ = write!(
            svg,
            r#"<rect x="{:.1}" y="42" width="12" height="12" fill="{}" fill-opacity="0.8"/><text x="{:.1}" y="52" font-size="12">{}</text>"#,
            x,
            series_color(idx),
            x + 16.0,
            escape(s.name.as_str())
        );
    }
}

fn value_axis(svg: &mut String, plot: &Plot, domain: &Domain, horizontal: bool) {
    for step in 0..=TICKS {
        let value = domain.tick(step);
        if horizontal {
            let x = plot.left + domain.scale(value, plot.width());
            let _ = write!(
                svg,
                r##"<line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}" stroke="#e5e5e5"/><text x="{x:.1}" y="{:.1}" text-anchor="middle" font-size="11">{}</text>"##,
                plot.top,
                plot.bottom,
                plot.bottom + 18.0,
                tick_label(value),
                x = x,
            );
        } else {
            let y = plot.bottom - domain.scale(value, plot.height());
            let _ = write!(
                svg,
                r##"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#e5e5e5"/><text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{}</text>"##,
                plot.left,
                plot.right,
                plot.left - 8.0,
                y + 4.0,
                tick_label(value),
                y = y,
            );
        }
    }
    let _ = write!(
        svg,
        r##"<path d="M{:.1},{:.1} V{:.1} H{:.1}" fill="none" stroke="#666"/>"##,
        plot.left, plot.top, plot.bottom, plot.right
    );
}

fn category_label(svg: &mut String, x: f64, y: f64, label: &str, rotate: bool) {
    if rotate {
        let _ = write!(
            svg,
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="end" font-size="11" transform="rotate(-45 {x:.1} {y:.1})">{}</text>"#,
            escape(label),
            x = x,
            y = y,
        );
    } else {
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{}</text>"#,
            x,
            y,
            escape(label)
        );
    }
}

/// Grouped or stacked bars, vertical or horizontal.
pub fn bars(frame: Frame, title: &str, labels: &[String], series: &[Series], horizontal: bool, stacked: bool) -> String {
    let mut svg = open(frame, title);
    if series.len() > 1 {
        legend(&mut svg, frame, series);
    }

    let plot = if horizontal {
        Plot::new(frame, 160.0, 64.0, 30.0, 40.0)
    } else {
        Plot::new(frame, 70.0, 64.0, 30.0, 110.0)
    };
    let count = labels.len().max(1);
    let domain = if stacked {
        Domain::of((0..count).map(|i| {
            series
                .iter()
                .map(|s| s.values.get(i).copied().unwrap_or(0.0).max(0.0))
                .sum::<f64>()
        }))
    } else {
        Domain::of(series.iter().flat_map(|s| s.values.iter().copied()))
    };
    value_axis(&mut svg, &plot, &domain, horizontal);

    let extent = if horizontal { plot.width() } else { plot.height() };
    let across = if horizontal { plot.height() } else { plot.width() };
    let band = across / count as f64;
    let groups = if stacked { 1 } else { series.len().max(1) };
    let thickness = band * 0.8 / groups as f64;

    for (i, label) in labels.iter().enumerate() {
        let mut offset = 0.0;
        for (s_idx, s) in series.iter().enumerate() {
            let value = s.values.get(i).copied().unwrap_or(0.0);
            let (from, to) = if stacked {
                let v = value.max(0.0);
                let span = (offset, offset + v);
                offset += v;
                span
            } else {
                (0.0, value)
            };
            let a = domain.scale(from, extent);
            let b = domain.scale(to, extent);
            let slot = band * i as f64 + band * 0.1 + if stacked { 0.0 } else { thickness * s_idx as f64 };

            let (x, y, w, h) = if horizontal {
                (plot.left + a.min(b), plot.top + slot, (a - b).abs(), thickness)
            } else {
                (plot.left + slot, plot.bottom - a.max(b), thickness, (a - b).abs())
            };
            let _ = write!(
                svg,
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" fill-opacity="0.75"/>"#,
                x,
                y,
                w,
                h,
                series_color(s_idx)
            );
        }

        if horizontal {
            category_label(&mut svg, plot.left - 8.0, plot.top + band * (i as f64 + 0.5) + 4.0, label, false);
        } else {
            category_label(&mut svg, plot.left + band * (i as f64 + 0.5), plot.bottom + 14.0, label, true);
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Line chart; `filled` shades the area under each series.
pub fn lines(frame: Frame, title: &str, labels: &[String], series: &[Series], filled: bool) -> String {
    let mut svg = open(frame, title);
    if series.len() > 1 {
        legend(&mut svg, frame, series);
    }

    let plot = Plot::new(frame, 70.0, 64.0, 30.0, 110.0);
    let domain = Domain::of(series.iter().flat_map(|s| s.values.iter().copied()));
    value_axis(&mut svg, &plot, &domain, false);

    let count = labels.len();
    let x_at = |i: usize| {
        if count > 1 {
            plot.left + plot.width() * i as f64 / (count - 1) as f64
        } else {
            plot.left + plot.width() / 2.0
        }
    };
    let y_at = |v: f64| plot.bottom - domain.scale(v, plot.height());
    let baseline = y_at(0.0);

    for (s_idx, s) in series.iter().enumerate() {
        let color = series_color(s_idx);
        let points: Vec<(f64, f64)> = (0..count)
            .map(|i| (x_at(i), y_at(s.values.get(i).copied().unwrap_or(0.0))))
            .collect();
        let Some((first, last)) = points.first().zip(points.last()) else {
            continue;
        };

        let path: String = points
            .iter()
            .map(|(x, y)| format!("{:.1},{:.1}", x, y))
            .collect::<Vec<_>>()
            .join(" L");

        if filled {
            let _ = write!(
                svg,
                r#"<path d="M{:.1},{:.1} L{} L{:.1},{:.1} Z" fill="{}" fill-opacity="0.3" stroke="none"/>"#,
                first.0, baseline, path, last.0, baseline, color
            );
        }
        let _ = write!(
            svg,
            r#"<path d="M{}" fill="none" stroke="{}" stroke-width="2"/>"#,
            path, color
        );
        for (x, y) in &points {
            let _ = write!(
                svg,
                r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="{}"/>"#,
                x, y, color
            );
        }
    }

    for (i, label) in labels.iter().enumerate() {
        category_label(&mut svg, x_at(i), plot.bottom + 14.0, label, true);
    }

    svg.push_str("</svg>");
    svg
}

/// Pie chart; a `hole` ratio above zero draws a doughnut.
pub fn pie(frame: Frame, title: &str, labels: &[String], values: &[f64], hole: f64) -> String {
    let mut svg = open(frame, title);

    let cx = frame.width * 0.38;
    let cy = (frame.height + 40.0) / 2.0;
    let radius = (frame.width * 0.3).min((frame.height - 100.0) / 2.0).max(10.0);
    let positive: Vec<f64> = values.iter().map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 }).collect();
    let total: f64 = positive.iter().sum();

    if total <= 0.0 {
        let _ = write!(
            svg,
            r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14" fill="#999">No data</text>"##,
            cx, cy
        );
        svg.push_str("</svg>");
        return svg;
    }

    let mut angle = -FRAC_PI_2;
    for (idx, value) in positive.iter().enumerate() {
        if *value <= 0.0 {
            continue;
        }
        let sweep = value / total * TAU;
        let color = slice_color(idx, positive.len());

        if sweep >= TAU - 1e-9 {
            let _ = write!(
                svg,
                r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}" fill-opacity="0.8"/>"#,
                cx, cy, radius, color
            );
        } else {
            let (x1, y1) = (cx + radius * angle.cos(), cy + radius * angle.sin());
            let end = angle + sweep;
            let (x2, y2) = (cx + radius * end.cos(), cy + radius * end.sin());
            let large_arc = if sweep > std::f64::consts::PI { 1 } else { 0 };
            let _ = write!(
                svg,
                r#"<path d="M{:.1},{:.1} L{:.2},{:.2} A{:.1},{:.1} 0 {} 1 {:.2},{:.2} Z" fill="{}" fill-opacity="0.8" stroke="white" stroke-width="2"/>"#,
                cx, cy, x1, y1, radius, radius, large_arc, x2, y2, color
            );
        }
        angle += sweep;
    }

    if hole > 0.0 {
        let _ = write!(
            svg,
            r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="white"/>"#,
            cx,
            cy,
            radius * hole.min(0.9)
        );
    }

    let legend_x = frame.width * 0.72;
    for (idx, label) in labels.iter().enumerate() {
        let y = 80.0 + idx as f64 * 22.0;
        let share = positive.get(idx).copied().unwrap_or(0.0) / total * 100.0;
        let _ = write!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{}" fill-opacity="0.8"/><text x="{:.1}" y="{:.1}" font-size="12">{} ({:.1}%)</text>"#,
            legend_x,
            y - 10.0,
            slice_color(idx, positive.len()),
            legend_x + 18.0,
            y,
            escape(label.as_str()),
            share
        );
    }

    svg.push_str("</svg>");
    svg
}

pub fn data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}
