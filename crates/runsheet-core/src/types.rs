// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page and rendering option types shared by the layout engine and its callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Points per millimetre (1 pt = 1/72 inch, 1 inch = 25.4 mm).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height), portrait.
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in points for the given orientation.
    pub fn dimensions_pt(&self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        let (w, h) = (w as f32 * PT_PER_MM, h as f32 * PT_PER_MM);
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Four-sided page insets, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    /// Same inset on every side.
    pub fn uniform(pt: f32) -> Self {
        Self {
            top: pt,
            right: pt,
            bottom: pt,
            left: pt,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(36.0)
    }
}

/// Options for one generation call.
///
/// The first five fields are the caller-facing rendering options; the rest are
/// engine tunables that normally come from [`crate::EngineConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    pub orientation: Orientation,
    pub format: PaperSize,
    /// Global base font size in points.
    pub font_size: f32,
    pub margins: Margins,
    /// Signed document to splice after the generated pages.
    #[serde(skip)]
    pub append_document: Option<Vec<u8>>,
    /// Title printed in the header banner and the PDF metadata.
    pub title: String,
    /// Transposed tables split into stacked bands above this many columns
    /// (label column included).
    pub max_transposed_columns: usize,
    /// Upper bound on the raster scale factor for embedded images.
    pub image_max_scale: f32,
    /// Timestamp printed in the header banner; `None` means "now".
    #[serde(skip)]
    pub generated_at: Option<DateTime<Utc>>,
}

impl RenderOptions {
    /// Attach an external document to append after generation.
    pub fn with_append_document(mut self, bytes: Vec<u8>) -> Self {
        self.append_document = Some(bytes);
        self
    }

    /// Pin the banner timestamp (deterministic output for tests and re-prints).
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            format: PaperSize::A4,
            font_size: 9.0,
            margins: Margins::default(),
            append_document: None,
            title: "Patient Care Report".into(),
            max_transposed_columns: 12,
            image_max_scale: 1.0,
            generated_at: None,
        }
    }
}
