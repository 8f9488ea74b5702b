// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page geometry and the vertical layout cursor.
//
// Layout coordinates are points with the origin at the top-left corner of the
// page and y growing downwards. The PDF emitter flips them.

use runsheet_core::{Margins, RenderOptions};

/// Dimensions and insets of one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn from_options(options: &RenderOptions) -> Self {
        let (width, height) = options.format.dimensions_pt(options.orientation);
        Self {
            width,
            height,
            margins: options.margins,
        }
    }

    pub fn content_left(&self) -> f32 {
        self.margins.left
    }

    pub fn content_right(&self) -> f32 {
        self.width - self.margins.right
    }

    pub fn content_width(&self) -> f32 {
        (self.width - self.margins.left - self.margins.right).max(0.0)
    }

    pub fn content_top(&self) -> f32 {
        self.margins.top
    }

    /// Lowest y any content may reach.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margins.bottom
    }

    pub fn content_height(&self) -> f32 {
        (self.bottom_limit() - self.content_top()).max(0.0)
    }
}

/// Where a reserved block landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Top of the block.
    pub y: f32,
    /// A page was inserted to make room.
    pub new_page: bool,
    /// The block is taller than a whole page and runs past the bottom margin.
    pub overflows: bool,
}

/// Tolerance for accumulated floating-point error in fit checks.
const FIT_EPSILON: f32 = 0.01;

/// The single mutable write position on the current page.
///
/// Within a page `y` never decreases; [`LayoutCursor::reset`] puts it back at
/// the top margin and is only called when a page is created.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCursor {
    y: f32,
    geometry: PageGeometry,
}

impl LayoutCursor {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            y: geometry.content_top(),
            geometry,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Whether a block of `height` fits between the cursor and the bottom margin.
    pub fn fits(&self, height: f32) -> bool {
        self.y + height <= self.geometry.bottom_limit() + FIT_EPSILON
    }

    pub fn at_page_top(&self) -> bool {
        (self.y - self.geometry.content_top()).abs() < FIT_EPSILON
    }

    pub fn remaining(&self) -> f32 {
        (self.geometry.bottom_limit() - self.y).max(0.0)
    }

    /// Move down by `height` (negative values are ignored).
    pub(crate) fn move_by(&mut self, height: f32) {
        self.y += height.max(0.0);
    }

    /// Jump forward to `y`; never moves up.
    pub(crate) fn move_to(&mut self, y: f32) {
        self.y = self.y.max(y);
    }

    /// Start a new page. Geometry is re-read from the caller every time.
    pub(crate) fn reset(&mut self, geometry: PageGeometry) {
        self.geometry = geometry;
        self.y = geometry.content_top();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runsheet_core::{Orientation, PaperSize};

    fn a4() -> PageGeometry {
        PageGeometry::from_options(&RenderOptions::default())
    }

    #[test]
    fn content_width_subtracts_margins() {
        let g = a4();
        assert!((g.content_width() - (g.width - 72.0)).abs() < 1e-3);
        assert_eq!(g.bottom_limit(), g.height - 36.0);
    }

    #[test]
    fn landscape_geometry_is_wider_than_tall() {
        let options = RenderOptions {
            orientation: Orientation::Landscape,
            format: PaperSize::Letter,
            ..Default::default()
        };
        let g = PageGeometry::from_options(&options);
        assert!(g.width > g.height);
    }

    #[test]
    fn cursor_fits_up_to_the_bottom_margin() {
        let g = a4();
        let mut cursor = LayoutCursor::new(g);
        assert!(cursor.at_page_top());
        assert!(cursor.fits(g.content_height()));
        assert!(!cursor.fits(g.content_height() + 1.0));

        cursor.move_by(100.0);
        assert!(!cursor.at_page_top());
        assert!((cursor.remaining() - (g.content_height() - 100.0)).abs() < 1e-3);
    }

    #[test]
    fn cursor_never_moves_up() {
        let mut cursor = LayoutCursor::new(a4());
        cursor.move_by(50.0);
        cursor.move_by(-20.0);
        cursor.move_to(10.0);
        assert_eq!(cursor.y(), 36.0 + 50.0);
    }

    #[test]
    fn reset_returns_to_top_margin() {
        let g = a4();
        let mut cursor = LayoutCursor::new(g);
        cursor.move_by(300.0);
        cursor.reset(g);
        assert_eq!(cursor.y(), g.margins.top);
    }
}
