// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drawing styles and the derived layout metrics.
//
// Every draw call receives its style as a value. Nothing in the canvas keeps
// an "ambient" font or colour between calls.

use runsheet_core::RenderOptions;

/// RGB colour, components in 0.0..=1.0.
pub type Tint = [f32; 3];

pub const BLACK: Tint = [0.0, 0.0, 0.0];
pub const GRID: Tint = [0.45, 0.45, 0.45];
pub const BANNER_FILL: Tint = [0.82, 0.86, 0.90];
pub const HEADER_FILL: Tint = [0.92, 0.92, 0.92];
pub const LABEL_FILL: Tint = [0.96, 0.96, 0.96];
pub const MUTED: Tint = [0.35, 0.35, 0.35];

/// One of the two built-in faces the report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
}

/// Font, size and fill colour for one run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
    pub color: Tint,
}

impl TextStyle {
    pub fn regular(size: f32) -> Self {
        Self {
            face: FontFace::Regular,
            size,
            color: BLACK,
        }
    }

    pub fn bold(size: f32) -> Self {
        Self {
            face: FontFace::Bold,
            size,
            color: BLACK,
        }
    }

    pub fn with_color(mut self, color: Tint) -> Self {
        self.color = color;
        self
    }
}

/// Outline colour and width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Tint,
    pub thickness: f32,
}

impl Stroke {
    pub fn grid() -> Self {
        Self {
            color: GRID,
            thickness: 0.5,
        }
    }

    /// Heavier rule separating a label column from data columns.
    pub fn separator() -> Self {
        Self {
            color: BLACK,
            thickness: 1.5,
        }
    }
}

/// Vertical rhythm and engine tunables, all derived from the base font size.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutMetrics {
    pub font_size: f32,
    pub line_height: f32,
    pub banner_height: f32,
    pub spacer: f32,
    pub cell_padding: f32,
    pub max_transposed_columns: usize,
    pub image_max_scale: f32,
}

impl LayoutMetrics {
    pub fn from_options(options: &RenderOptions) -> Self {
        let font_size = options.font_size.max(4.0);
        Self {
            font_size,
            line_height: (font_size * 1.35).round(),
            banner_height: (font_size * 2.0).round(),
            spacer: (font_size * 0.5).round(),
            cell_padding: 3.0,
            // A band needs the label column plus at least one data column.
            max_transposed_columns: options.max_transposed_columns.max(2),
            image_max_scale: options.image_max_scale.max(0.01),
        }
    }

    pub fn body(&self) -> TextStyle {
        TextStyle::regular(self.font_size)
    }

    pub fn label(&self) -> TextStyle {
        TextStyle::bold(self.font_size)
    }

    pub fn banner(&self) -> TextStyle {
        TextStyle::bold(self.font_size + 1.0)
    }

    pub fn title(&self) -> TextStyle {
        TextStyle::bold(self.font_size * 1.6)
    }

    pub fn small(&self) -> TextStyle {
        TextStyle::regular((self.font_size - 1.5).max(4.0)).with_color(MUTED)
    }
}
