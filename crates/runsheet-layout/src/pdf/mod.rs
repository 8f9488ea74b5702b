// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — serialising the display list and appending external documents.

pub mod reader;
pub mod writer;

pub use reader::{PdfReader, append_document, page_count};
pub use writer::PdfWriter;
