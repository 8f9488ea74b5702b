// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text module — glyph metrics and measured word wrap.

pub mod metrics;
pub mod wrap;

pub use metrics::{printable, text_width};
pub use wrap::{MeasuredCell, fit_line, wrap};
