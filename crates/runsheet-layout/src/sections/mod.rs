// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Section renderers — one function per report section, composed from the
// layout primitives and always run in the same order.

pub mod clinical;
pub mod closing;
pub mod incident;

use chrono::{DateTime, Utc};
use runsheet_core::ReportRecord;
use tracing::debug;

use crate::canvas::{Canvas, ImageId};

/// Inputs shared by every section.
pub struct SectionContext<'a> {
    pub record: &'a ReportRecord,
    /// Decoded body diagram, if the annotation decoded.
    pub diagram: Option<ImageId>,
    pub generated_at: DateTime<Utc>,
}

/// Lay out the whole report onto `canvas`.
pub fn render_report(canvas: &mut Canvas, ctx: &SectionContext<'_>) {
    incident::header(canvas, ctx);
    incident::basic_info(canvas, ctx.record);
    incident::patient_info(canvas, ctx.record);
    clinical::medical_history(canvas, ctx.record);
    clinical::assessment(canvas, ctx.record);
    clinical::injury_and_pain(canvas, ctx);
    clinical::oxygen(canvas, ctx.record);
    clinical::spo2(canvas, ctx.record);
    closing::transport(canvas, ctx.record);
    closing::attestation(canvas, ctx.record);

    let note = format!("Incident {}", ctx.record.basic.incident_number.trim());
    canvas.stamp_page_numbers(&note);
    debug!(pages = canvas.page_count(), "sections rendered");
}
