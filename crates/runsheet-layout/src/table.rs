// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bordered tables in two orientations.
//
// Row-oriented tables repeat their banner and header on every page they
// touch; rows are measured before drawing and never split. Transposed tables
// have a fixed set of row labels and one data column per event; when there are
// more events than fit across the page they are laid out as stacked bands,
// each repeating the label column.

use tracing::{debug, instrument, warn};

use crate::canvas::Canvas;
use crate::primitives::{banner, banner_height};
use crate::style::{HEADER_FILL, LABEL_FILL, LayoutMetrics, Stroke, TextStyle, Tint};
use crate::text::MeasuredCell;

/// Default slot count for label-column tables.
pub const MIN_TRANSPOSED_DENOMINATOR: usize = 8;

/// How the content width is divided between columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPolicy {
    /// Every column gets `contentWidth / columnCount`.
    Equal,
    /// Every column gets `contentWidth / max(min_denominator, columnCount)`, so
    /// a sparse table does not stretch its few columns across the page.
    LabelColumn { min_denominator: usize },
}

impl ColumnPolicy {
    pub fn column_width(&self, content_width: f32, column_count: usize) -> f32 {
        let slots = match self {
            Self::Equal => column_count.max(1),
            Self::LabelColumn { min_denominator } => column_count.max(*min_denominator).max(1),
        };
        content_width / slots as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableOrientation {
    /// `headers` across the top, one line per entry in `rows`.
    Rows,
    /// `headers` down the left as row labels, one column per entry in `rows`.
    Transposed,
}

/// Everything needed to draw one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub title: String,
    pub headers: Vec<String>,
    /// Each entry holds one value per header, in header order.
    pub rows: Vec<Vec<String>>,
    pub policy: ColumnPolicy,
    pub orientation: TableOrientation,
}

impl TableSpec {
    /// A row-oriented table with equal column widths.
    pub fn rows(title: &str, headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
            policy: ColumnPolicy::Equal,
            orientation: TableOrientation::Rows,
        }
    }

    /// A transposed table: `labels` down the left, one column per event.
    pub fn transposed(title: &str, labels: &[&str], events: Vec<Vec<String>>) -> Self {
        Self {
            title: title.to_string(),
            headers: labels.iter().map(|h| h.to_string()).collect(),
            rows: events,
            policy: ColumnPolicy::LabelColumn {
                min_denominator: MIN_TRANSPOSED_DENOMINATOR,
            },
            orientation: TableOrientation::Transposed,
        }
    }
}

/// Column width of a transposed table with `column_count` columns, label
/// column included.
pub fn transposed_column_width(content_width: f32, column_count: usize) -> f32 {
    ColumnPolicy::LabelColumn {
        min_denominator: MIN_TRANSPOSED_DENOMINATOR,
    }
    .column_width(content_width, column_count)
}

/// Wrap every cell of a row to `column_width` and return the cells plus the
/// row height.
pub fn measure_row<S: AsRef<str>>(
    cells: &[S],
    column_width: f32,
    style: &TextStyle,
    m: &LayoutMetrics,
) -> (Vec<MeasuredCell>, f32) {
    let inner = (column_width - 2.0 * m.cell_padding).max(1.0);
    let measured: Vec<MeasuredCell> = cells
        .iter()
        .map(|c| MeasuredCell::measure(c.as_ref(), inner, style, m.line_height))
        .collect();
    let lines = measured
        .iter()
        .map(MeasuredCell::line_count)
        .max()
        .unwrap_or(1)
        .max(1);
    (measured, lines as f32 * m.line_height)
}

/// Draw one row of cells at `y`, each `widths[i]` wide.
fn draw_row(
    canvas: &mut Canvas,
    x: f32,
    y: f32,
    height: f32,
    widths: &[f32],
    cells: &[MeasuredCell],
    styles: &[(TextStyle, Option<Tint>)],
) {
    let m = canvas.metrics().clone();
    let mut cx = x;
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let (style, fill) = styles[i.min(styles.len() - 1)];
        canvas.rect(cx, y, *width, height, fill, Some(Stroke::grid()));
        let inner = (*width - 2.0 * m.cell_padding).max(1.0);
        for (n, line) in cell.lines.iter().enumerate() {
            canvas.text(
                cx + m.cell_padding,
                y + n as f32 * m.line_height,
                line,
                &style,
                inner,
            );
        }
        cx += width;
    }
}

/// Draw `spec` at the cursor.
#[instrument(skip_all, fields(title = %spec.title, rows = spec.rows.len()))]
pub fn render_table(canvas: &mut Canvas, spec: &TableSpec) {
    match spec.orientation {
        TableOrientation::Rows => render_rows(canvas, spec),
        TableOrientation::Transposed => render_transposed(canvas, spec),
    }
}

fn render_rows(canvas: &mut Canvas, spec: &TableSpec) {
    let m = canvas.metrics().clone();
    let g = *canvas.geometry();
    let columns = spec.headers.len().max(1);
    let width = spec.policy.column_width(g.content_width(), columns);
    let widths = vec![width; columns];
    let x = g.content_left();

    let header_style = [(m.label(), Some(HEADER_FILL))];
    let body_style = [(m.body(), None)];
    let (header_cells, header_height) = measure_row(&spec.headers, width, &m.label(), &m);

    let rows: Vec<(Vec<MeasuredCell>, f32)> = spec
        .rows
        .iter()
        .map(|row| measure_row(row, width, &m.body(), &m))
        .collect();

    let first = rows.first().map_or(0.0, |(_, h)| *h);
    banner(canvas, &spec.title, header_height + first);
    let y = canvas.claim(header_height);
    draw_row(canvas, x, y, header_height, &widths, &header_cells, &header_style);

    let usable = g.content_height() - banner_height(canvas) - header_height;
    let mut rows_on_page = 0usize;
    for (index, (cells, height)) in rows.iter().enumerate() {
        if *height > usable {
            warn!(row = index, height, usable, "table row taller than a page");
        }
        // An oversized row directly under a header overflows instead of
        // producing an empty continuation page.
        if rows_on_page > 0 && !canvas.fits(*height) {
            rows_on_page = 0;
            canvas.new_page();
            banner(canvas, &spec.title, header_height + height);
            let y = canvas.claim(header_height);
            draw_row(canvas, x, y, header_height, &widths, &header_cells, &header_style);
            debug!(row = index, page = canvas.page_count(), "table continued");
        }
        let y = canvas.claim(*height);
        draw_row(canvas, x, y, *height, &widths, cells, &body_style);
        rows_on_page += 1;
    }
}

fn render_transposed(canvas: &mut Canvas, spec: &TableSpec) {
    if spec.rows.is_empty() || spec.headers.is_empty() {
        debug!("transposed table has no events, skipped");
        return;
    }
    let m = canvas.metrics().clone();
    let g = *canvas.geometry();
    let x = g.content_left();
    let per_band = m.max_transposed_columns.saturating_sub(1).max(1);

    for (band_index, band) in spec.rows.chunks(per_band).enumerate() {
        let column_count = band.len() + 1;
        let width = spec.policy.column_width(g.content_width(), column_count);
        let widths = vec![width; column_count];

        // One measured line per label.
        let lines: Vec<(Vec<MeasuredCell>, f32)> = spec
            .headers
            .iter()
            .enumerate()
            .map(|(r, label)| {
                let mut cells = vec![label.as_str()];
                cells.extend(band.iter().map(|event| event.get(r).map_or("", String::as_str)));
                let (mut measured, _) = measure_row(&cells[..1], width, &m.label(), &m);
                let (data, _) = measure_row(&cells[1..], width, &m.body(), &m);
                measured.extend(data);
                let tallest = measured.iter().map(MeasuredCell::line_count).max().unwrap_or(1);
                (measured, tallest.max(1) as f32 * m.line_height)
            })
            .collect();
        let band_height: f32 = lines.iter().map(|(_, h)| *h).sum();

        if band_index == 0 {
            banner(canvas, &spec.title, band_height);
        } else if canvas.fits(m.spacer + band_height) {
            canvas.gap(m.spacer);
        } else {
            canvas.new_page();
            banner(canvas, &spec.title, band_height);
        }

        let top = canvas.claim(band_height);
        let styles = [(m.label(), Some(LABEL_FILL)), (m.body(), None)];
        let mut y = top;
        for (cells, height) in &lines {
            draw_row(canvas, x, y, *height, &widths, cells, &styles);
            y += height;
        }
        canvas.line(x + width, top, x + width, top + band_height, Stroke::separator());
        debug!(band = band_index, columns = column_count, width, "transposed band drawn");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, RenderedReport};
    use crate::text::text_width;
    use runsheet_core::RenderOptions;

    const VITAL_HEADERS: [&str; 9] = [
        "Time", "BP", "Pulse", "Resp", "SpO2", "Temp", "Glucose", "GCS", "Notes",
    ];

    fn canvas() -> Canvas {
        Canvas::new(&RenderOptions::default())
    }

    fn vitals(n: usize, notes: &str) -> Vec<Vec<String>> {
        (0..n)
            .map(|i| {
                vec![
                    format!("10:{:02}", i % 60),
                    "128/82".into(),
                    "96".into(),
                    "18".into(),
                    "97".into(),
                    "36.9".into(),
                    "5.4".into(),
                    "15".into(),
                    notes.to_string(),
                ]
            })
            .collect()
    }

    fn rects(report: &RenderedReport, page: usize) -> Vec<(f32, f32)> {
        report.pages[page]
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { y, height, .. } => Some((*y, *height)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_row_table_draws_banner_and_header_only() {
        let mut c = canvas();
        let m = c.metrics().clone();
        let before = c.cursor_y();
        render_table(&mut c, &TableSpec::rows("Vital Signs", &VITAL_HEADERS, Vec::new()));

        let width = c.geometry().content_width() / 9.0;
        let (_, header_height) = measure_row(&VITAL_HEADERS, width, &m.label(), &m);
        let advanced = c.cursor_y() - before;
        assert!((advanced - (m.banner_height + m.spacer + header_height)).abs() < 1e-3);

        let report = c.finish();
        // Banner + nine header cells.
        assert_eq!(rects(&report, 0).len(), 10);
    }

    #[test]
    fn row_height_follows_tallest_cell() {
        let mut c = canvas();
        let lh = c.metrics().line_height;
        let mut rows = vitals(2, "");
        rows[1][8] = "Pt became diaphoretic and pale, 324 mg aspirin chewed".into();
        render_table(&mut c, &TableSpec::rows("Vital Signs", &VITAL_HEADERS, rows));

        let width = c.geometry().content_width() / 9.0;
        let m = c.metrics().clone();
        let report = c.finish();
        let heights: Vec<f32> = rects(&report, 0).iter().map(|(_, h)| *h).collect();
        // Banner, header row, row 1, row 2 (nine cells each after the banner).
        let first_row = heights[10];
        let second_row = heights[19];
        assert_eq!(first_row, lh);
        let verbose = vitals(1, "Pt became diaphoretic and pale, 324 mg aspirin chewed");
        let (_, expected) = measure_row(&verbose[0], width, &m.body(), &m);
        assert_eq!(second_row, expected);
        assert!(second_row > lh);
    }

    #[test]
    fn rows_never_split_and_header_repeats() {
        let mut c = canvas();
        let limit = c.geometry().bottom_limit();
        let rows = vitals(120, "repeat obs, no change in presentation");
        render_table(&mut c, &TableSpec::rows("Vital Signs", &VITAL_HEADERS, rows));
        let report = c.finish();
        assert!(report.page_count() > 1);

        for page in &report.pages {
            let texts: Vec<&str> = page.texts().collect();
            assert!(texts.contains(&"Vital Signs"));
            assert!(texts.contains(&"Glucose"));
            for cmd in &page.commands {
                if let DrawCommand::Rect { y, height, .. } = cmd {
                    assert!(y + height <= limit + 0.01);
                }
            }
        }
    }

    #[test]
    fn transposed_width_formula() {
        let content = 523.0;
        for count in 1..=20 {
            let expected = content / (count.max(8) as f32);
            assert_eq!(transposed_column_width(content, count), expected);
        }
    }

    #[test]
    fn transposed_cells_use_formula_width() {
        let mut c = canvas();
        let events: Vec<Vec<String>> = (0..3)
            .map(|i| vec![format!("10:0{i}"), "96".to_string()])
            .collect();
        render_table(&mut c, &TableSpec::transposed("SpO2", &["Time", "SpO2 (%)"], events));
        let content = c.geometry().content_width();
        let report = c.finish();
        let widths: Vec<f32> = report.pages[0]
            .commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Rect { width, fill, .. } if *fill != Some(crate::style::BANNER_FILL) => {
                    Some(*width)
                }
                _ => None,
            })
            .collect();
        assert_eq!(widths.len(), 8);
        for w in widths {
            assert_eq!(w, transposed_column_width(content, 4));
        }
    }

    #[test]
    fn transposed_overflow_stacks_bands() {
        let mut c = canvas();
        let max = c.metrics().max_transposed_columns;
        let events: Vec<Vec<String>> = (0..25)
            .map(|i| vec![format!("11:{i:02}"), "4".to_string()])
            .collect();
        render_table(&mut c, &TableSpec::transposed("Flow Changes", &["Time", "Flow (L/min)"], events));
        let content = c.geometry().content_width();
        let report = c.finish();

        let separators = report.pages[0]
            .commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Line { .. }))
            .count();
        assert_eq!(separators, 25usize.div_ceil(max - 1));

        for page in &report.pages {
            for cmd in &page.commands {
                if let DrawCommand::Rect { x, width, .. } = cmd {
                    assert!(x + width <= page.geometry.content_left() + content + 0.01);
                }
                if let DrawCommand::Text { text, style, box_width, .. } = cmd {
                    assert!(text_width(text, style) <= box_width + 1e-3);
                }
            }
        }
    }

    #[test]
    fn transposed_without_events_draws_nothing() {
        let mut c = canvas();
        let before = c.cursor_y();
        render_table(&mut c, &TableSpec::transposed("SpO2", &["Time", "SpO2 (%)"], Vec::new()));
        assert_eq!(c.cursor_y(), before);
        assert_eq!(c.finish().texts().count(), 0);
    }
}
