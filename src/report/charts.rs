//! PNG chart rendering.
//!
//! Charts are drawn straight onto an `RgbImage`: a plot area with a light
//! grid, a value axis, a date axis and the series on top. Labels use the
//! bitmap font in `font.rs`.

use crate::models::{CumulativeEntry, RepositoryTotal, TrendPoint};
use crate::report::font::{self, ADVANCE, GLYPH_WIDTH};
use crate::report::generator::format_thousands;
use anyhow::{ensure, Context, Result};
use chrono::{Duration, NaiveDate};
use image::{Rgb, RgbImage};
use std::collections::BTreeMap;
use std::path::Path;

/// Series colours, in ranking order.
pub const PALETTE: [Rgb<u8>; 5] = [
    Rgb([46, 134, 171]),
    Rgb([162, 59, 114]),
    Rgb([241, 143, 1]),
    Rgb([199, 62, 29]),
    Rgb([106, 153, 78]),
];

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const PLOT_BACKGROUND: Rgb<u8> = Rgb([234, 234, 242]);
const GRID: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([80, 80, 80]);
const TEXT: Rgb<u8> = Rgb([30, 30, 30]);
const EDGE: Rgb<u8> = Rgb([0, 0, 0]);

const TITLE_SCALE: u32 = 3;
const LABEL_SCALE: u32 = 2;
const TICK_SCALE: u32 = 1;
const VALUE_TICKS: u64 = 5;
const MAX_DATE_LABELS: i64 = 6;

/// Pixel dimensions of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl ChartSize {
    const MIN_WIDTH: u32 = 320;
    const MIN_HEIGHT: u32 = 240;

    /// Requested size, raised to the smallest size the layout fits in.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(Self::MIN_WIDTH),
            height: height.max(Self::MIN_HEIGHT),
        }
    }
}

/// Plot area in pixel coordinates, `right`/`bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl Frame {
    fn with_left(size: ChartSize, left: i64) -> Self {
        Self {
            left,
            top: 60,
            right: size.width as i64 - 40,
            bottom: size.height as i64 - 60,
        }
    }

    fn standard(size: ChartSize) -> Self {
        Self::with_left(size, 90)
    }

    fn width(&self) -> i64 {
        (self.right - self.left).max(1)
    }

    fn height(&self) -> i64 {
        (self.bottom - self.top).max(1)
    }

    /// Vertical pixel for `value` on a `0..=max` axis.
    fn y_for(&self, value: u64, max: u64) -> i64 {
        let ratio = value as f64 / max.max(1) as f64;
        self.bottom - (ratio * self.height() as f64).round() as i64
    }

    /// Horizontal pixel for `value` on a `0..=max` axis.
    fn x_for_value(&self, value: u64, max: u64) -> i64 {
        let ratio = value as f64 / max.max(1) as f64;
        self.left + (ratio * self.width() as f64).round() as i64
    }
}

/// Maps calendar dates onto equal-width slots across the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateScale {
    start: NaiveDate,
    days: i64,
}

impl DateScale {
    fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Option<Self> {
        let mut iter = dates.into_iter();
        let first = iter.next()?;
        let (start, end) = iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self {
            start,
            days: (end - start).num_days(),
        })
    }

    fn slots(&self) -> i64 {
        self.days + 1
    }

    fn slot_width(&self, frame: &Frame) -> f64 {
        frame.width() as f64 / self.slots() as f64
    }

    /// Centre of the slot holding `date`.
    fn x_for(&self, frame: &Frame, date: NaiveDate) -> i64 {
        let offset = (date - self.start).num_days() as f64;
        frame.left + ((offset + 0.5) * self.slot_width(frame)) as i64
    }
}

/// Smallest 1/2/5 x 10^k value that is at least `value`.
fn nice_ceiling(value: u64) -> u64 {
    if value == 0 {
        return 1;
    }

    let mut magnitude = 1u64;
    while let Some(next) = magnitude.checked_mul(10) {
        if next > value {
            break;
        }
        magnitude = next;
    }

    [1u64, 2, 5, 10]
        .iter()
        .map(|step| step.saturating_mul(magnitude))
        .find(|candidate| *candidate >= value)
        .unwrap_or(u64::MAX)
}

/// Top of a value axis: a nice number with room for every tick.
fn axis_max(value: u64) -> u64 {
    nice_ceiling(value).max(VALUE_TICKS)
}

/// Shorten `label` with a trailing `..` until it fits in `max_px`.
fn fit_label(label: &str, max_px: u32, scale: u32) -> String {
    if font::text_width(label, scale) <= max_px {
        return label.to_string();
    }

    let budget = (max_px / scale + 1) / ADVANCE;
    let keep = budget.saturating_sub(2) as usize;
    let mut shortened: String = label.chars().take(keep).collect();
    shortened.push_str("..");
    shortened
}

struct Canvas {
    image: RgbImage,
}

impl Canvas {
    fn new(size: ChartSize) -> Self {
        Self {
            image: RgbImage::from_pixel(size.width, size.height, BACKGROUND),
        }
    }

    fn width(&self) -> i64 {
        self.image.width() as i64
    }

    fn height(&self) -> i64 {
        self.image.height() as i64
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height()
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if self.in_bounds(x, y) {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgb<u8>, alpha: f32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        for channel in 0..3 {
            let under = pixel.0[channel] as f32;
            let over = color.0[channel] as f32;
            pixel.0[channel] = (under + (over - under) * alpha).round() as u8;
        }
    }

    fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        for y in y0.max(0)..y1.min(self.height()) {
            for x in x0.max(0)..x1.min(self.width()) {
                self.image.put_pixel(x as u32, y as u32, color);
            }
        }
    }

    fn outline_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        self.fill_rect(x0, y0, x1, y0 + 1, color);
        self.fill_rect(x0, y1 - 1, x1, y1, color);
        self.fill_rect(x0, y0, x0 + 1, y1, color);
        self.fill_rect(x1 - 1, y0, x1, y1, color);
    }

    /// Bresenham line stamped with a square brush.
    fn line(&mut self, from: (i64, i64), to: (i64, i64), thickness: i64, color: Rgb<u8>) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        let half = thickness / 2;

        loop {
            if thickness <= 1 {
                self.put(x, y, color);
            } else {
                self.fill_rect(x - half, y - half, x - half + thickness, y - half + thickness, color);
            }
            if x == to.0 && y == to.1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn polyline(&mut self, points: &[(i64, i64)], thickness: i64, color: Rgb<u8>) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], thickness, color);
        }
    }

    fn markers(&mut self, points: &[(i64, i64)], radius: i64, color: Rgb<u8>) {
        for &(x, y) in points {
            self.fill_rect(x - radius, y - radius, x + radius + 1, y + radius + 1, color);
        }
    }

    /// Translucent fill between a polyline and `baseline`.
    fn fill_under(&mut self, points: &[(i64, i64)], baseline: i64, color: Rgb<u8>, alpha: f32) {
        for pair in points.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            let span = (x1 - x0).max(1);
            // The shared column of two segments is painted once.
            for x in x0..x1 {
                let top = y0 + (y1 - y0) * (x - x0) / span;
                for y in top..baseline {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    fn text(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let step = scale as i64;
        let mut cursor = x;

        for c in text.chars() {
            for (row, bits) in font::glyph(c).iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                        let px = cursor + col as i64 * step;
                        let py = y + row as i64 * step;
                        self.fill_rect(px, py, px + step, py + step, color);
                    }
                }
            }
            cursor += (ADVANCE * scale) as i64;
        }
    }

    fn text_centered(&mut self, center_x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let width = font::text_width(text, scale) as i64;
        self.text(center_x - width / 2, y, text, scale, color);
    }

    fn text_right(&mut self, right_x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let width = font::text_width(text, scale) as i64;
        self.text(right_x - width, y, text, scale, color);
    }

    fn title(&mut self, title: &str) {
        let center = self.width() / 2;
        self.text_centered(center, 18, title, TITLE_SCALE, TEXT);
    }

    fn plot_area(&mut self, frame: &Frame) {
        self.fill_rect(frame.left, frame.top, frame.right, frame.bottom, PLOT_BACKGROUND);
    }

    /// Horizontal grid lines with value labels on the left.
    fn value_axis(&mut self, frame: &Frame, max: u64, label: &str) {
        for tick in 0..=VALUE_TICKS {
            let value = max / VALUE_TICKS * tick;
            let y = frame.y_for(value, max);
            self.fill_rect(frame.left, y, frame.right, y + 1, GRID);
            self.text_right(frame.left - 8, y - 3, &format_thousands(value), TICK_SCALE, TEXT);
        }
        self.text(frame.left, frame.top - 20, label, LABEL_SCALE, TEXT);
        self.fill_rect(frame.left - 1, frame.top, frame.left, frame.bottom, AXIS);
        self.fill_rect(frame.left - 1, frame.bottom, frame.right, frame.bottom + 1, AXIS);
    }

    /// Date ticks under the plot, at most `MAX_DATE_LABELS` of them.
    fn date_axis(&mut self, frame: &Frame, dates: &DateScale) {
        let intervals = dates.days.min(MAX_DATE_LABELS - 1);
        for i in 0..=intervals {
            let offset = if intervals == 0 {
                0
            } else {
                dates.days * i / intervals
            };
            let date = dates.start + Duration::days(offset);
            let x = dates.x_for(frame, date);
            self.fill_rect(x, frame.bottom, x + 1, frame.bottom + 5, AXIS);
            let label = date.format("%Y-%m-%d").to_string();
            self.text_centered(x, frame.bottom + 10, &label, TICK_SCALE, TEXT);
        }
        let center = frame.left + frame.width() / 2;
        self.text_centered(center, frame.bottom + 28, "DATE", LABEL_SCALE, TEXT);
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.image
            .save(path)
            .with_context(|| format!("Failed to write chart {}", path.display()))
    }
}

/// Running total across all repositories, as a filled line.
pub fn render_cumulative_clones(
    cumulative: &BTreeMap<NaiveDate, CumulativeEntry>,
    size: ChartSize,
    path: &Path,
) -> Result<()> {
    let dates = DateScale::from_dates(cumulative.keys().copied())
        .context("No cumulative data to chart")?;
    let max = axis_max(cumulative.values().map(|e| e.total_clones).max().unwrap_or(0));

    let mut canvas = Canvas::new(size);
    let frame = Frame::standard(size);
    canvas.plot_area(&frame);
    canvas.value_axis(&frame, max, "TOTAL CLONES");
    canvas.date_axis(&frame, &dates);

    let points: Vec<(i64, i64)> = cumulative
        .iter()
        .map(|(date, entry)| (dates.x_for(&frame, *date), frame.y_for(entry.total_clones, max)))
        .collect();

    canvas.fill_under(&points, frame.bottom, PALETTE[0], 0.3);
    canvas.polyline(&points, 2, PALETTE[0]);
    canvas.markers(&points, 2, PALETTE[0]);
    canvas.title("CUMULATIVE REPOSITORY CLONES OVER TIME");

    canvas.save(path)
}

/// Clones per day across all repositories, as bars.
pub fn render_daily_activity(
    cumulative: &BTreeMap<NaiveDate, CumulativeEntry>,
    size: ChartSize,
    path: &Path,
) -> Result<()> {
    let dates = DateScale::from_dates(cumulative.keys().copied())
        .context("No daily data to chart")?;
    let max = axis_max(cumulative.values().map(|e| e.daily_clones).max().unwrap_or(0));

    let mut canvas = Canvas::new(size);
    let frame = Frame::standard(size);
    canvas.plot_area(&frame);
    canvas.value_axis(&frame, max, "DAILY CLONES");
    canvas.date_axis(&frame, &dates);

    let bar_width = ((dates.slot_width(&frame) * 0.8) as i64).max(1);
    for (date, entry) in cumulative {
        let x = dates.x_for(&frame, *date) - bar_width / 2;
        let top = frame.y_for(entry.daily_clones, max);
        canvas.fill_rect(x, top, x + bar_width, frame.bottom, PALETTE[1]);
        if bar_width >= 4 && top < frame.bottom {
            canvas.outline_rect(x, top, x + bar_width, frame.bottom, EDGE);
        }
    }
    canvas.title("DAILY CLONE ACTIVITY");

    canvas.save(path)
}

/// Highest-ranked repositories as horizontal bars with value labels.
pub fn render_repository_breakdown(
    totals: &[RepositoryTotal],
    size: ChartSize,
    path: &Path,
) -> Result<()> {
    ensure!(!totals.is_empty(), "No repository totals to chart");

    let max_label = size.width / 3;
    let labels: Vec<String> = totals
        .iter()
        .map(|entry| fit_label(&entry.name, max_label, LABEL_SCALE))
        .collect();
    let label_width = labels
        .iter()
        .map(|label| font::text_width(label, LABEL_SCALE))
        .max()
        .unwrap_or(0);

    let mut frame = Frame::with_left(size, label_width as i64 + 24);
    // Room for the value label after the longest bar.
    frame.right -= 60;

    let max = axis_max(totals.iter().map(|e| e.total).max().unwrap_or(0));

    let mut canvas = Canvas::new(size);
    canvas.plot_area(&frame);

    for tick in 0..=VALUE_TICKS {
        let value = max / VALUE_TICKS * tick;
        let x = frame.x_for_value(value, max);
        canvas.fill_rect(x, frame.top, x + 1, frame.bottom, GRID);
        canvas.text_centered(x, frame.bottom + 8, &format_thousands(value), TICK_SCALE, TEXT);
    }
    let center = frame.left + frame.width() / 2;
    canvas.text_centered(center, frame.bottom + 28, "TOTAL CLONES", LABEL_SCALE, TEXT);

    let row_height = frame.height() / totals.len() as i64;
    let bar_height = (row_height * 7 / 10).max(1);
    let text_height = (font::GLYPH_HEIGHT * LABEL_SCALE) as i64;

    for (row, (entry, label)) in totals.iter().zip(&labels).enumerate() {
        let row_top = frame.top + row as i64 * row_height;
        let bar_top = row_top + (row_height - bar_height) / 2;
        let bar_end = frame.x_for_value(entry.total, max).max(frame.left + 1);
        let text_y = row_top + (row_height - text_height) / 2;

        canvas.fill_rect(frame.left, bar_top, bar_end, bar_top + bar_height, PALETTE[2]);
        if bar_height >= 4 {
            canvas.outline_rect(frame.left, bar_top, bar_end, bar_top + bar_height, EDGE);
        }
        canvas.text_right(frame.left - 8, text_y, label, LABEL_SCALE, TEXT);
        canvas.text(bar_end + 6, text_y, &format_thousands(entry.total), LABEL_SCALE, TEXT);
    }
    canvas.fill_rect(frame.left - 1, frame.top, frame.left, frame.bottom, AXIS);
    canvas.title("TOP REPOSITORIES BY CLONE COUNT");

    canvas.save(path)
}

/// Cumulative lines of the top repositories with a legend.
pub fn render_repository_trends(
    trends: &[(String, Vec<TrendPoint>)],
    size: ChartSize,
    path: &Path,
) -> Result<()> {
    let dates = DateScale::from_dates(
        trends
            .iter()
            .flat_map(|(_, points)| points.iter().map(|p| p.date)),
    )
    .context("No repository trends to chart")?;
    let max = axis_max(
        trends
            .iter()
            .flat_map(|(_, points)| points.iter().map(|p| p.cumulative))
            .max()
            .unwrap_or(0),
    );

    let mut canvas = Canvas::new(size);
    let frame = Frame::standard(size);
    canvas.plot_area(&frame);
    canvas.value_axis(&frame, max, "CUMULATIVE CLONES");
    canvas.date_axis(&frame, &dates);

    for (index, (_, points)) in trends.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        let pixels: Vec<(i64, i64)> = points
            .iter()
            .map(|p| (dates.x_for(&frame, p.date), frame.y_for(p.cumulative, max)))
            .collect();
        canvas.polyline(&pixels, 2, color);
        canvas.markers(&pixels, 1, color);
    }

    draw_legend(&mut canvas, &frame, trends);
    canvas.title("TOP REPOSITORIES - CLONE TRENDS");

    canvas.save(path)
}

fn draw_legend(canvas: &mut Canvas, frame: &Frame, trends: &[(String, Vec<TrendPoint>)]) {
    const SWATCH: i64 = 12;
    const ROW: i64 = 20;
    const PADDING: i64 = 8;

    let max_label = (frame.width() / 3).max(1) as u32;
    let labels: Vec<String> = trends
        .iter()
        .map(|(name, _)| fit_label(name, max_label, LABEL_SCALE))
        .collect();
    let text_width = labels
        .iter()
        .map(|label| font::text_width(label, LABEL_SCALE) as i64)
        .max()
        .unwrap_or(0);

    let x0 = frame.left + 10;
    let y0 = frame.top + 10;
    let x1 = x0 + PADDING * 3 + SWATCH + text_width;
    let y1 = y0 + PADDING * 2 + ROW * labels.len() as i64 - (ROW - SWATCH);

    canvas.fill_rect(x0, y0, x1, y1, BACKGROUND);
    canvas.outline_rect(x0, y0, x1, y1, AXIS);

    for (index, label) in labels.iter().enumerate() {
        let y = y0 + PADDING + index as i64 * ROW;
        let color = PALETTE[index % PALETTE.len()];
        canvas.fill_rect(x0 + PADDING, y, x0 + PADDING + SWATCH, y + SWATCH, color);
        canvas.text(x0 + PADDING * 2 + SWATCH, y - 1, label, LABEL_SCALE, TEXT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_cumulative() -> BTreeMap<NaiveDate, CumulativeEntry> {
        BTreeMap::from([
            (
                date("2024-01-01"),
                CumulativeEntry {
                    total_clones: 7,
                    daily_clones: 7,
                },
            ),
            (
                date("2024-01-05"),
                CumulativeEntry {
                    total_clones: 10,
                    daily_clones: 3,
                },
            ),
        ])
    }

    #[test]
    fn test_nice_ceiling() {
        assert_eq!(nice_ceiling(0), 1);
        assert_eq!(nice_ceiling(1), 1);
        assert_eq!(nice_ceiling(7), 10);
        assert_eq!(nice_ceiling(10), 10);
        assert_eq!(nice_ceiling(11), 20);
        assert_eq!(nice_ceiling(101), 200);
        assert_eq!(nice_ceiling(450), 500);
        assert_eq!(nice_ceiling(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_axis_max_leaves_room_for_ticks() {
        assert_eq!(axis_max(0), 5);
        assert_eq!(axis_max(3), 5);
        assert_eq!(axis_max(7), 10);
        assert_eq!(axis_max(1234), 2000);
    }

    #[test]
    fn test_date_scale_slots() {
        let size = ChartSize::new(1200, 600);
        let frame = Frame::standard(size);
        let scale = DateScale::from_dates([date("2024-01-05"), date("2024-01-01")]).unwrap();

        assert_eq!(scale.start, date("2024-01-01"));
        assert_eq!(scale.days, 4);
        let first = scale.x_for(&frame, date("2024-01-01"));
        let last = scale.x_for(&frame, date("2024-01-05"));
        assert!(first > frame.left && first < last && last < frame.right);

        assert!(DateScale::from_dates(Vec::<NaiveDate>::new()).is_none());
    }

    #[test]
    fn test_frame_value_mapping() {
        let frame = Frame::standard(ChartSize::new(1200, 600));
        assert_eq!(frame.y_for(0, 10), frame.bottom);
        assert_eq!(frame.y_for(10, 10), frame.top);
        assert_eq!(frame.x_for_value(0, 10), frame.left);
        assert_eq!(frame.x_for_value(10, 10), frame.right);
    }

    #[test]
    fn test_fit_label() {
        assert_eq!(fit_label("short", 1000, 2), "short");
        let fitted = fit_label("a-very-long-repository-name", 60, 1);
        assert!(fitted.ends_with(".."));
        assert!(font::text_width(&fitted, 1) <= 60);
    }

    #[test]
    fn test_chart_size_minimum() {
        assert_eq!(ChartSize::new(10, 10), ChartSize::new(320, 240));
    }

    #[test]
    fn test_render_cumulative_and_daily() {
        let dir = TempDir::new().unwrap();
        let size = ChartSize::new(800, 400);

        let cumulative_path = dir.path().join("cumulative_clones.png");
        render_cumulative_clones(&sample_cumulative(), size, &cumulative_path).unwrap();
        let image = image::open(&cumulative_path).unwrap();
        assert_eq!(image.dimensions(), (800, 400));

        let daily_path = dir.path().join("daily_activity.png");
        render_daily_activity(&sample_cumulative(), size, &daily_path).unwrap();
        assert!(daily_path.exists());
    }

    #[test]
    fn test_render_single_day() {
        let dir = TempDir::new().unwrap();
        let data = BTreeMap::from([(
            date("2024-01-01"),
            CumulativeEntry {
                total_clones: 0,
                daily_clones: 0,
            },
        )]);
        let path = dir.path().join("single.png");
        render_cumulative_clones(&data, ChartSize::new(400, 300), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_render_breakdown_and_trends() {
        let dir = TempDir::new().unwrap();
        let size = ChartSize::new(900, 500);
        let totals = vec![
            RepositoryTotal {
                name: "a-repository-with-a-really-long-name-indeed".to_string(),
                total: 1500,
            },
            RepositoryTotal {
                name: "small".to_string(),
                total: 3,
            },
        ];

        let breakdown_path = dir.path().join("repository_breakdown.png");
        render_repository_breakdown(&totals, size, &breakdown_path).unwrap();
        assert_eq!(image::open(&breakdown_path).unwrap().dimensions(), (900, 500));

        let trends = vec![
            (
                "a".to_string(),
                vec![
                    TrendPoint {
                        date: date("2024-01-01"),
                        cumulative: 5,
                    },
                    TrendPoint {
                        date: date("2024-01-03"),
                        cumulative: 9,
                    },
                ],
            ),
            (
                "b".to_string(),
                vec![TrendPoint {
                    date: date("2024-01-02"),
                    cumulative: 2,
                }],
            ),
        ];
        let trends_path = dir.path().join("repository_trends.png");
        render_repository_trends(&trends, size, &trends_path).unwrap();
        assert!(trends_path.exists());
    }

    #[test]
    fn test_render_rejects_empty_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");
        let size = ChartSize::new(400, 300);

        assert!(render_cumulative_clones(&BTreeMap::new(), size, &path).is_err());
        assert!(render_repository_breakdown(&[], size, &path).is_err());
        assert!(render_repository_trends(&[], size, &path).is_err());
        assert!(!path.exists());
    }
}
