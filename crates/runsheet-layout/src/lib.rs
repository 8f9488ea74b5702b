// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// runsheet-layout — Paginated layout engine for patient care reports.
//
// Measures and wraps text, lays out field rows and tables against a single
// page cursor, embeds the body diagram, serialises the display list to PDF
// and appends externally signed documents.

pub mod artifact;
pub mod canvas;
pub mod engine;
pub mod geometry;
pub mod image;
pub mod pdf;
pub mod primitives;
pub mod sections;
pub mod style;
pub mod table;
pub mod text;

// Re-export the primary entry points so callers can use
// `runsheet_layout::generate` etc.
pub use artifact::{Artifact, ObjectUrl, ObjectUrlRegistry, report_filename};
pub use canvas::{Canvas, RenderedReport};
pub use engine::{generate, layout, render_pdf};
pub use pdf::{PdfReader, PdfWriter, append_document};
