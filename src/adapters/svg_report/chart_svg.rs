//! Standalone SVG time-series charts.
//!
//! Series are plotted by index so non-trading gaps do not leave holes.
//! Undefined points break a line rather than dropping to zero.

use std::fmt::Write;

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 400.0;
const PADDING: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    Line,
    Scatter,
}

#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub label: String,
    pub color: &'static str,
    pub style: SeriesStyle,
    pub values: Vec<Option<f64>>,
}

/// Shaded vertical band over an inclusive index range.
#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub start: usize,
    pub end: usize,
    pub color: &'static str,
}

pub struct Chart<'a> {
    pub title: &'a str,
    pub x_start_label: String,
    pub x_end_label: String,
    pub series: Vec<ChartSeries>,
    pub bands: Vec<Band>,
}

struct Scale {
    min: f64,
    max: f64,
    step_x: f64,
}

impl Scale {
    fn new(series: &[ChartSeries]) -> Option<Self> {
        let defined = series
            .iter()
            .flat_map(|s| s.values.iter().flatten().copied())
            .filter(|v| v.is_finite());

        let (min, max) = defined.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        let points = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
        let plot_width = WIDTH - 2.0 * PADDING;
        let step_x = if points > 1 {
            plot_width / (points - 1) as f64
        } else {
            0.0
        };

        Some(Self { min, max, step_x })
    }

    fn x(&self, index: usize) -> f64 {
        PADDING + index as f64 * self.step_x
    }

    fn y(&self, value: f64) -> f64 {
        let plot_height = HEIGHT - 2.0 * PADDING;
        let range = self.max - self.min;
        if range > 0.0 {
            HEIGHT - PADDING - (value - self.min) / range * plot_height
        } else {
            HEIGHT / 2.0
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn line_path(scale: &Scale, values: &[Option<f64>]) -> String {
    let mut d = String::new();
    let mut pen_down = false;
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => {
                let cmd = if pen_down { 'L' } else { 'M' };
                let _ = write!(d, "{}{:.1},{:.1} ", cmd, scale.x(i), scale.y(*v));
                pen_down = true;
            }
            _ => pen_down = false,
        }
    }
    d.trim_end().to_string()
}

fn open_canvas(svg: &mut String) {
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = writeln!(
        svg,
        r#"<rect width="{:.0}" height="{:.0}" fill="white"/>"#,
        WIDTH, HEIGHT
    );
}

fn axes(svg: &mut String) {
    let _ = writeln!(
        svg,
        r#"<path d="M{p:.0},{p:.0} L{p:.0},{b:.0} L{r:.0},{b:.0}" fill="none" stroke="black" stroke-width="1"/>"#,
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING
    );
}

fn title(svg: &mut String, text: &str) {
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" font-size="16" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        PADDING / 2.0 + 5.0,
        escape(text)
    );
}

/// Title and axes only, for a chart with nothing to plot.
fn render_empty(chart: &Chart) -> String {
    let mut svg = String::new();
    open_canvas(&mut svg);
    axes(&mut svg);
    title(&mut svg, chart.title);
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" font-size="12" text-anchor="middle" fill="gray">no data</text>"#,
        WIDTH / 2.0,
        HEIGHT / 2.0
    );
    svg.push_str("</svg>\n");
    svg
}

/// Render the chart. With no defined value in any series only the title and
/// axes are drawn.
pub fn render(chart: &Chart) -> String {
    let Some(scale) = Scale::new(&chart.series) else {
        return render_empty(chart);
    };

    let mut svg = String::new();
    open_canvas(&mut svg);

    for band in &chart.bands {
        let x0 = scale.x(band.start);
        let x1 = scale.x(band.end);
        let _ = writeln!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" fill-opacity="0.3"/>"#,
            x0,
            PADDING,
            (x1 - x0).max(1.0),
            HEIGHT - 2.0 * PADDING,
            band.color
        );
    }

    axes(&mut svg);

    for series in &chart.series {
        match series.style {
            SeriesStyle::Line => {
                let d = line_path(&scale, &series.values);
                if !d.is_empty() {
                    let _ = writeln!(
                        svg,
                        r#"<path d="{}" fill="none" stroke="{}" stroke-width="1.2"/>"#,
                        d, series.color
                    );
                }
            }
            SeriesStyle::Scatter => {
                for (i, value) in series.values.iter().enumerate() {
                    if let Some(v) = value.filter(|v| v.is_finite()) {
                        let _ = writeln!(
                            svg,
                            r#"<circle cx="{:.1}" cy="{:.1}" r="1" fill="{}"/>"#,
                            scale.x(i),
                            scale.y(v),
                            series.color
                        );
                    }
                }
            }
        }
    }

    title(&mut svg, chart.title);
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" font-size="10" text-anchor="end">{:.2}</text>"#,
        PADDING - 4.0,
        PADDING + 4.0,
        scale.max
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" font-size="10" text-anchor="end">{:.2}</text>"#,
        PADDING - 4.0,
        HEIGHT - PADDING,
        scale.min
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" font-size="10">{}</text>"#,
        PADDING,
        HEIGHT - PADDING + 15.0,
        escape(&chart.x_start_label)
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.0}" y="{:.0}" font-size="10" text-anchor="end">{}</text>"#,
        WIDTH - PADDING,
        HEIGHT - PADDING + 15.0,
        escape(&chart.x_end_label)
    );

    for (i, series) in chart.series.iter().enumerate() {
        let y = PADDING + 12.0 + i as f64 * 14.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{:.0}" y="{:.0}" width="10" height="3" fill="{}"/><text x="{:.0}" y="{:.0}" font-size="10">{}</text>"#,
            PADDING + 10.0,
            y - 4.0,
            series.color,
            PADDING + 24.0,
            y,
            escape(&series.label)
        );
    }

    svg.push_str("</svg>\n");
    svg
}
