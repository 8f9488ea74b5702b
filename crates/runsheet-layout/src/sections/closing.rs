// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transport / transfer of care, and the crew attestation footer pinned to the
// bottom of the last page.

use runsheet_core::ReportRecord;
use runsheet_core::record::{CrewMember, is_blank};
use tracing::debug;

use crate::canvas::Canvas;
use crate::primitives::{
    FieldCell, banner, banner_height, fields_row, measure_fields_row, multiline_block,
};
use crate::style::Stroke;
use crate::text::{MeasuredCell, fit_line};

pub const ATTESTATION: &str = "I certify that the information in this report is accurate and \
    complete to the best of my knowledge, and that care was handed over as recorded above.";

const SIGNATURES: [&str; 2] = ["Crew signature / date", "Receiving staff signature / date"];

pub fn transport(canvas: &mut Canvas, record: &ReportRecord) {
    let t = &record.transport;
    let first = vec![
        FieldCell::new("Disposition", t.disposition.label(), 1),
        FieldCell::new("Destination", t.destination.as_str(), 2),
        FieldCell::new("Mode", t.mode.label(), 1),
    ];
    banner(canvas, "Transport & Transfer of Care", measure_fields_row(canvas, &first));
    fields_row(canvas, &first);
    fields_row(
        canvas,
        &[
            FieldCell::new("Received By", t.receiving_staff.as_str(), 2),
            FieldCell::new("Transfer Time", t.transfer_time.as_str(), 2),
        ],
    );
    if !is_blank(&t.handover_notes) {
        multiline_block(canvas, "Handover Notes", &t.handover_notes);
    }
}

fn crew_rows(record: &ReportRecord) -> Vec<Vec<FieldCell>> {
    let blank = [CrewMember::default()];
    let crew: &[CrewMember] = if record.crew.is_empty() {
        &blank
    } else {
        &record.crew
    };
    crew.iter()
        .map(|member| {
            vec![
                FieldCell::new("Crew", member.name.as_str(), 2),
                FieldCell::new("Role", member.role.as_str(), 1),
                FieldCell::new("Cert.", member.certification.as_str(), 1),
            ]
        })
        .collect()
}

/// Total height of the attestation block, spacers included.
pub fn measure_attestation(canvas: &Canvas, record: &ReportRecord) -> f32 {
    let m = canvas.metrics();
    let width = canvas.geometry().content_width() - 2.0 * m.cell_padding;
    let rows: f32 = crew_rows(record)
        .iter()
        .map(|row| measure_fields_row(canvas, row) + m.spacer)
        .sum();
    let statement = MeasuredCell::measure(ATTESTATION, width, &m.body(), m.line_height);
    banner_height(canvas) + rows + statement.height + m.spacer + signature_height(canvas)
}

fn signature_height(canvas: &Canvas) -> f32 {
    // Blank writing space, the rule, and its caption.
    3.0 * canvas.metrics().line_height
}

/// Crew list, attestation statement and signature lines, ending exactly on
/// the bottom margin of the last page.
pub fn attestation(canvas: &mut Canvas, record: &ReportRecord) {
    let height = measure_attestation(canvas, record);
    let top = canvas.pin_to_bottom(height);
    debug!(top, height, page = canvas.page_count(), "attestation pinned");

    banner(canvas, "Crew & Attestation", 0.0);
    for row in crew_rows(record) {
        fields_row(canvas, &row);
    }

    let m = canvas.metrics().clone();
    let g = *canvas.geometry();
    let x = g.content_left() + m.cell_padding;
    let width = g.content_width() - 2.0 * m.cell_padding;
    let statement = MeasuredCell::measure(ATTESTATION, width, &m.body(), m.line_height);
    for line in &statement.lines {
        let slot = canvas.advance(m.line_height);
        canvas.text(x, slot.y, line, &m.body(), width);
    }
    canvas.gap(m.spacer);

    let slot = canvas.advance(signature_height(canvas));
    let rule_y = slot.y + 2.0 * m.line_height;
    let column = g.content_width() / SIGNATURES.len() as f32;
    let style = m.small();
    for (i, caption) in SIGNATURES.iter().enumerate() {
        let left = g.content_left() + i as f32 * column + m.cell_padding;
        let right = left + column - 4.0 * m.cell_padding;
        canvas.line(left, rule_y, right, rule_y, Stroke::grid());
        let caption_width = (right - left).max(0.0);
        let caption = fit_line(caption, caption_width, &style);
        canvas.text(left, rule_y + 1.0, &caption, &style, caption_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runsheet_core::RenderOptions;

    #[test]
    fn attestation_ends_on_bottom_margin() {
        let mut record = ReportRecord::default();
        record.crew = vec![
            CrewMember {
                name: "A. Medic".into(),
                role: "Paramedic".into(),
                certification: "P-1182".into(),
            },
            CrewMember {
                name: "B. Driver".into(),
                role: "EMT".into(),
                certification: "E-0931".into(),
            },
        ];
        let mut canvas = Canvas::new(&RenderOptions::default());
        canvas.advance(200.0);
        attestation(&mut canvas, &record);
        assert_eq!(canvas.page_count(), 1);
        assert!((canvas.cursor_y() - canvas.geometry().bottom_limit()).abs() < 0.05);

        let report = canvas.finish();
        assert!(report.contains_text("B. Driver"));
        assert!(report.contains_text("Receiving staff signature / date"));
    }

    #[test]
    fn attestation_moves_to_new_page_when_short_of_room() {
        let record = ReportRecord::default();
        let mut canvas = Canvas::new(&RenderOptions::default());
        let height = measure_attestation(&canvas, &record);
        canvas.advance(canvas.geometry().content_height() - height / 2.0);
        attestation(&mut canvas, &record);
        assert_eq!(canvas.page_count(), 2);
        assert!((canvas.cursor_y() - canvas.geometry().bottom_limit()).abs() < 0.05);
    }

    #[test]
    fn transport_skips_blank_handover_notes() {
        let record = ReportRecord::default();
        let mut canvas = Canvas::new(&RenderOptions::default());
        transport(&mut canvas, &record);
        let report = canvas.finish();
        assert!(report.contains_text("Transported"));
        assert!(!report.contains_text("Handover Notes"));
    }
}
