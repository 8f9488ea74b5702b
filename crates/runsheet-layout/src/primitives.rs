// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout primitives — section banner, fields row, multiline block.
//
// All three measure first, then reserve space through the canvas, then draw.

use tracing::debug;

use crate::canvas::Canvas;
use crate::style::{BANNER_FILL, LayoutMetrics, Stroke};
use crate::text::{MeasuredCell, fit_line, text_width};

/// Column spans in a fields row add up to this.
pub const SPAN_DENOMINATOR: u32 = 4;

/// Narrowest value column a fields-row cell is ever given.
pub const MIN_VALUE_WIDTH: f32 = 4.0;

/// Height a banner reserves, including the spacer below it.
pub fn banner_height(canvas: &Canvas) -> f32 {
    let m = canvas.metrics();
    m.banner_height + m.spacer
}

/// Shaded full-width title bar.
///
/// `keep_with` is the height of whatever must land on the same page as the
/// banner (a table header plus its first row, say); a banner is never left
/// stranded at the bottom of a page.
pub fn banner(canvas: &mut Canvas, title: &str, keep_with: f32) {
    let m = canvas.metrics().clone();
    canvas.ensure(m.banner_height + m.spacer + keep_with);

    let g = *canvas.geometry();
    let y = canvas.claim(m.banner_height);
    canvas.rect(
        g.content_left(),
        y,
        g.content_width(),
        m.banner_height,
        Some(BANNER_FILL),
        Some(Stroke::grid()),
    );
    let style = m.banner();
    let text_top = y + (m.banner_height - m.line_height) / 2.0;
    let title_width = g.content_width() - 2.0 * m.cell_padding;
    canvas.text(
        g.content_left() + m.cell_padding,
        text_top.max(y),
        &fit_line(title, title_width, &style),
        &style,
        title_width,
    );
    canvas.gap(m.spacer);
}

/// One labeled value in a fields row.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCell {
    pub label: String,
    pub value: String,
    pub span: u32,
}

impl FieldCell {
    pub fn new(label: &str, value: impl Into<String>, span: u32) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            span,
        }
    }
}

/// A fields-row cell after measurement.
#[derive(Debug, Clone)]
struct PlacedCell {
    x: f32,
    /// Cell width less padding; label and value share it.
    inner_width: f32,
    label: String,
    label_width: f32,
    value_width: f32,
    measured: MeasuredCell,
}

fn place_one(m: &LayoutMetrics, cell: &FieldCell, x: f32, cell_width: f32) -> PlacedCell {
    let inner_width = (cell_width - 2.0 * m.cell_padding).max(MIN_VALUE_WIDTH);
    let label = fit_line(
        &format!("{}: ", cell.label),
        inner_width - MIN_VALUE_WIDTH,
        &m.label(),
    );
    let label_width = text_width(&label, &m.label());
    let value_width = inner_width - label_width;
    let measured = MeasuredCell::measure(&cell.value, value_width, &m.body(), m.line_height);
    PlacedCell {
        x: x + m.cell_padding,
        inner_width,
        label,
        label_width,
        value_width,
        measured,
    }
}

fn place_cells(canvas: &Canvas, cells: &[FieldCell]) -> Vec<PlacedCell> {
    let m = canvas.metrics();
    let g = canvas.geometry();

    let total: u32 = cells.iter().map(|c| c.span).sum();
    let denominator = total.max(SPAN_DENOMINATOR) as f32;
    if total > SPAN_DENOMINATOR {
        debug!(total, "fields row spans exceed denominator, scaling down");
    }

    let mut offset = 0u32;
    cells
        .iter()
        .map(|cell| {
            let x = g.content_left() + g.content_width() * offset as f32 / denominator;
            let cell_width = g.content_width() * cell.span as f32 / denominator;
            offset += cell.span;
            place_one(m, cell, x, cell_width)
        })
        .collect()
}

fn draw_placed(canvas: &mut Canvas, cell: &PlacedCell, y: f32) {
    let m = canvas.metrics().clone();
    canvas.text(cell.x, y, &cell.label, &m.label(), cell.inner_width);
    let value_x = cell.x + cell.label_width;
    for (i, line) in cell.measured.lines.iter().enumerate() {
        canvas.text(value_x, y + i as f32 * m.line_height, line, &m.body(), cell.value_width);
    }
}

/// Height of a fields row without the trailing spacer.
pub fn measure_fields_row(canvas: &Canvas, cells: &[FieldCell]) -> f32 {
    let lh = canvas.metrics().line_height;
    let lines = place_cells(canvas, cells)
        .iter()
        .map(|c| c.measured.line_count())
        .max()
        .unwrap_or(1)
        .max(1);
    lines as f32 * lh
}

/// Lay out labeled values across weighted column spans.
///
/// Every value is wrapped before anything is drawn; the row height is the
/// tallest cell, and the whole row moves to a new page if it does not fit.
/// Returns the row height.
pub fn fields_row(canvas: &mut Canvas, cells: &[FieldCell]) -> f32 {
    if cells.is_empty() {
        return 0.0;
    }
    let m = canvas.metrics().clone();
    let placed = place_cells(canvas, cells);
    let lines = placed
        .iter()
        .map(|c| c.measured.line_count())
        .max()
        .unwrap_or(1)
        .max(1);
    let row_height = lines as f32 * m.line_height;

    let slot = canvas.advance(row_height);
    for cell in &placed {
        draw_placed(canvas, cell, slot.y);
    }
    canvas.gap(m.spacer);
    row_height
}

/// Height of a vertical stack of labeled values in a column `width` wide.
pub fn measure_field_column(canvas: &Canvas, cells: &[FieldCell], width: f32) -> f32 {
    let m = canvas.metrics();
    cells
        .iter()
        .map(|cell| place_one(m, cell, 0.0, width).measured.height)
        .sum()
}

/// Stack labeled values vertically at (`x`, `y`) without moving the cursor.
///
/// Used beside an image in two-column sections; the caller reserves the
/// taller of the two columns. Returns the column height.
pub fn field_column(canvas: &mut Canvas, cells: &[FieldCell], x: f32, y: f32, width: f32) -> f32 {
    let m = canvas.metrics().clone();
    let mut top = y;
    for cell in cells {
        let placed = place_one(&m, cell, x, width);
        draw_placed(canvas, &placed, top);
        top += placed.measured.height;
    }
    top - y
}

/// A label followed by free text that may run across pages.
///
/// The label is kept with the first line of text; every following line is
/// checked against the bottom margin on its own. Returns the number of text
/// lines drawn.
pub fn multiline_block(canvas: &mut Canvas, label: &str, value: &str) -> usize {
    let m = canvas.metrics().clone();
    let g = *canvas.geometry();
    let x = g.content_left() + m.cell_padding;
    let width = g.content_width() - 2.0 * m.cell_padding;
    let body = m.body();
    let label_style = m.label();

    let measured = MeasuredCell::measure(value, width, &body, m.line_height);

    canvas.ensure(2.0 * m.line_height);
    let slot = canvas.advance(m.line_height);
    let heading = fit_line(&format!("{label}:"), width, &label_style);
    canvas.text(x, slot.y, &heading, &label_style, width);

    for line in &measured.lines {
        let slot = canvas.advance(m.line_height);
        canvas.text(x, slot.y, line, &body, width);
    }
    canvas.gap(m.spacer);
    measured.line_count()
}
