// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drawing surface — a per-page display list plus the layout cursor.
//
// Renderers never touch PDF operators directly. They reserve vertical space
// through `advance`/`claim`, then record positioned commands here. The PDF
// emitter turns the finished display list into bytes in one pass.

use runsheet_core::RenderOptions;
use tracing::{debug, warn};

use crate::geometry::{LayoutCursor, PageGeometry, Slot};
use crate::style::{LayoutMetrics, Stroke, TextStyle, Tint};
use crate::text::fit_line;
use crate::text::metrics::printable;

/// A decoded raster ready for embedding (RGB8, alpha already flattened).
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    pub width_px: u32,
    pub height_px: u32,
    pub rgb: Vec<u8>,
}

/// Index of an image registered with [`Canvas::add_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageId(pub usize);

/// One positioned drawing operation. `y` is always the top edge.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Text {
        x: f32,
        y: f32,
        text: String,
        style: TextStyle,
        /// Width the layout allotted to this run.
        box_width: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Tint>,
        stroke: Option<Stroke>,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: Stroke,
    },
    Image {
        image: ImageId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Everything drawn on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub geometry: PageGeometry,
    pub commands: Vec<DrawCommand>,
}

impl PageLayout {
    /// Text runs on this page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// The finished display list of one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub title: String,
    pub pages: Vec<PageLayout>,
    pub images: Vec<EmbeddedImage>,
}

impl RenderedReport {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every text run in the document.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(PageLayout::texts)
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

/// Per-generation drawing surface.
///
/// Owns its geometry, cursor and pages outright. Nothing is shared between
/// canvases.
pub struct Canvas {
    title: String,
    template: PageGeometry,
    metrics: LayoutMetrics,
    cursor: LayoutCursor,
    pages: Vec<PageLayout>,
    images: Vec<EmbeddedImage>,
}

impl Canvas {
    /// Create a canvas with its first page already started.
    pub fn new(options: &RenderOptions) -> Self {
        let template = PageGeometry::from_options(options);
        Self {
            title: options.title.clone(),
            template,
            metrics: LayoutMetrics::from_options(options),
            cursor: LayoutCursor::new(template),
            pages: vec![PageLayout {
                geometry: template,
                commands: Vec::new(),
            }],
            images: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Geometry of the current page.
    pub fn geometry(&self) -> &PageGeometry {
        self.cursor.geometry()
    }

    pub fn cursor_y(&self) -> f32 {
        self.cursor.y()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn fits(&self, height: f32) -> bool {
        self.cursor.fits(height)
    }

    pub fn at_page_top(&self) -> bool {
        self.cursor.at_page_top()
    }

    /// Append a page and move the cursor to its top margin.
    pub fn new_page(&mut self) {
        let geometry = self.template;
        self.pages.push(PageLayout {
            geometry,
            commands: Vec::new(),
        });
        self.cursor.reset(geometry);
        debug!(page = self.pages.len(), "page added");
    }

    /// Reserve `height` for a block, breaking to a new page first if it does
    /// not fit. A block taller than a whole page is placed at the top of a
    /// fresh page and allowed to overflow rather than looping.
    pub fn advance(&mut self, height: f32) -> Slot {
        let mut new_page = false;
        if !self.cursor.fits(height) && !self.cursor.at_page_top() {
            self.new_page();
            new_page = true;
        }
        let overflows = !self.cursor.fits(height);
        if overflows {
            warn!(
                height,
                room = self.cursor.remaining(),
                page = self.pages.len(),
                "block taller than a page, drawing past the bottom margin"
            );
        }
        let y = self.cursor.y();
        self.cursor.move_by(height);
        Slot {
            y,
            new_page,
            overflows,
        }
    }

    /// Reserve `height` without a fit check. Callers that already ensured room
    /// (tables after drawing their header) use this so a row cannot be pushed
    /// away from the header it was measured against.
    pub fn claim(&mut self, height: f32) -> f32 {
        let y = self.cursor.y();
        self.cursor.move_by(height);
        y
    }

    /// Break to a new page unless `height` fits. Returns whether a page was added.
    pub fn ensure(&mut self, height: f32) -> bool {
        if !self.cursor.fits(height) && !self.cursor.at_page_top() {
            self.new_page();
            true
        } else {
            false
        }
    }

    /// Vertical whitespace that never pushes the cursor past the bottom margin.
    pub fn gap(&mut self, height: f32) {
        let room = self.cursor.remaining();
        self.cursor.move_by(height.min(room));
    }

    /// Position a block of `height` so it ends exactly on the bottom margin of
    /// the current page (breaking first if it does not fit). Returns its top.
    pub fn pin_to_bottom(&mut self, height: f32) -> f32 {
        self.ensure(height);
        let top = self.geometry().bottom_limit() - height;
        self.cursor.move_to(top);
        self.cursor.y()
    }

    // -- Recording ------------------------------------------------------------

    fn current_page(&mut self) -> &mut PageLayout {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn text(&mut self, x: f32, y: f32, text: &str, style: &TextStyle, box_width: f32) {
        if text.is_empty() {
            return;
        }
        let text = printable(text).into_owned();
        self.current_page().commands.push(DrawCommand::Text {
            x,
            y,
            text,
            style: *style,
            box_width,
        });
    }

    pub fn rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Tint>,
        stroke: Option<Stroke>,
    ) {
        self.current_page().commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        });
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, stroke: Stroke) {
        self.current_page()
            .commands
            .push(DrawCommand::Line { x1, y1, x2, y2, stroke });
    }

    pub fn add_image(&mut self, image: EmbeddedImage) -> ImageId {
        self.images.push(image);
        ImageId(self.images.len() - 1)
    }

    pub fn image_size(&self, id: ImageId) -> Option<(u32, u32)> {
        self.images.get(id.0).map(|i| (i.width_px, i.height_px))
    }

    pub fn image(&mut self, image: ImageId, x: f32, y: f32, width: f32, height: f32) {
        self.current_page().commands.push(DrawCommand::Image {
            image,
            x,
            y,
            width,
            height,
        });
    }

    /// Stamp "Page X of Y" into the bottom margin of every page, with
    /// `left_note` cut to fit the left half. Only meaningful once layout is
    /// complete.
    pub fn stamp_page_numbers(&mut self, left_note: &str) {
        let style = self.metrics.small();
        let gutter = self.metrics.spacer;
        let total = self.pages.len();
        for (index, page) in self.pages.iter_mut().enumerate() {
            let g = page.geometry;
            let half = g.content_width() / 2.0;
            let y = g.bottom_limit() + (g.margins.bottom - style.size * 1.35) / 2.0;
            let label = fit_line(&format!("Page {} of {}", index + 1, total), half, &style);
            let width = crate::text::text_width(&label, &style);
            page.commands.push(DrawCommand::Text {
                x: g.content_right() - width,
                y,
                text: label,
                style,
                box_width: half,
            });

            let note_width = (half - gutter).max(0.0);
            let note = fit_line(left_note, note_width, &style);
            if !note.is_empty() {
                page.commands.push(DrawCommand::Text {
                    x: g.content_left(),
                    y,
                    text: note,
                    style,
                    box_width: note_width,
                });
            }
        }
    }

    pub fn finish(self) -> RenderedReport {
        debug!(pages = self.pages.len(), images = self.images.len(), "layout finished");
        RenderedReport {
            title: self.title,
            pages: self.pages,
            images: self.images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(&RenderOptions::default())
    }

    #[test]
    fn advance_breaks_before_overflow() {
        let mut c = canvas();
        let room = c.geometry().content_height();
        let first = c.advance(room - 10.0);
        assert!(!first.new_page);

        let second = c.advance(20.0);
        assert!(second.new_page);
        assert_eq!(second.y, c.geometry().margins.top);
        assert_eq!(c.page_count(), 2);
    }

    #[test]
    fn oversized_block_on_fresh_page_does_not_loop() {
        let mut c = canvas();
        let huge = c.geometry().content_height() * 2.0;
        let slot = c.advance(huge);
        assert!(!slot.new_page);
        assert!(slot.overflows);
        assert_eq!(c.page_count(), 1);
    }

    #[test]
    fn oversized_block_mid_page_breaks_then_overflows() {
        let mut c = canvas();
        assert!(!c.advance(40.0).overflows);
        let slot = c.advance(c.geometry().content_height() + 1.0);
        assert!(slot.new_page);
        assert!(slot.overflows);
        assert_eq!(slot.y, c.geometry().margins.top);
    }

    #[test]
    fn block_filling_the_page_exactly_does_not_overflow() {
        let mut c = canvas();
        let slot = c.advance(c.geometry().content_height());
        assert!(!slot.overflows);
    }

    #[test]
    fn gap_stops_at_bottom_margin() {
        let mut c = canvas();
        let limit = c.geometry().bottom_limit();
        c.advance(c.geometry().content_height() - 2.0);
        c.gap(50.0);
        assert!((c.cursor_y() - limit).abs() < 1e-3);
        assert_eq!(c.page_count(), 1);
    }

    #[test]
    fn pin_to_bottom_lands_on_bottom_margin() {
        let mut c = canvas();
        c.advance(100.0);
        let top = c.pin_to_bottom(80.0);
        assert!((top + 80.0 - c.geometry().bottom_limit()).abs() < 1e-3);
        assert_eq!(c.page_count(), 1);
    }

    #[test]
    fn pin_to_bottom_breaks_when_footer_cannot_fit() {
        let mut c = canvas();
        c.advance(c.geometry().content_height() - 30.0);
        c.pin_to_bottom(80.0);
        assert_eq!(c.page_count(), 2);
    }

    #[test]
    fn empty_text_is_not_recorded() {
        let mut c = canvas();
        let style = c.metrics().body();
        c.text(10.0, 10.0, "", &style, 50.0);
        c.text(10.0, 10.0, "x", &style, 50.0);
        assert_eq!(c.finish().texts().count(), 1);
    }

    #[test]
    fn page_numbers_count_every_page() {
        let mut c = canvas();
        c.new_page();
        c.new_page();
        c.stamp_page_numbers("INC-1");
        let report = c.finish();
        assert!(report.pages[0].texts().any(|t| t == "Page 1 of 3"));
        assert!(report.pages[2].texts().any(|t| t == "Page 3 of 3"));
    }

    #[test]
    fn long_footer_note_is_cut_to_its_half() {
        let mut c = canvas();
        let half = c.geometry().content_width() / 2.0;
        c.stamp_page_numbers(&format!("Incident {}", "INC-2026-".repeat(10)));
        let report = c.finish();
        let mut notes = 0;
        for cmd in &report.pages[0].commands {
            if let DrawCommand::Text {
                x,
                text,
                style,
                box_width,
                ..
            } = cmd
            {
                let width = crate::text::text_width(text, style);
                assert!(width <= *box_width + 1e-3, "{text:?}");
                if text.starts_with("Incident") {
                    notes += 1;
                    assert!(text.ends_with("..."));
                    assert!(x + width <= report.pages[0].geometry.content_left() + half);
                }
            }
        }
        assert_eq!(notes, 1);
    }
}
