// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Clinical sections: history, assessment with vital signs, injury diagram
// with pain scale, oxygen therapy and SpO2 readings.

use runsheet_core::ReportRecord;
use runsheet_core::record::{PainAssessment, is_blank};
use tracing::debug;

use super::SectionContext;
use crate::canvas::Canvas;
use crate::image::{Anchor, image_height, place_image};
use crate::primitives::{
    FieldCell, banner, banner_height, field_column, fields_row, measure_field_column,
    measure_fields_row, multiline_block,
};
use crate::table::{TableSpec, render_table};

pub const VITAL_SIGN_HEADERS: [&str; 9] = [
    "Time", "BP", "Pulse", "Resp", "SpO2", "Temp", "Glucose", "GCS", "Notes",
];

/// Height reserved for a diagram that was supplied but failed to decode.
pub const DIAGRAM_PLACEHOLDER: f32 = 120.0;

fn narrative_if_present(canvas: &mut Canvas, label: &str, value: &str) {
    if !is_blank(value) {
        multiline_block(canvas, label, value);
    }
}

pub fn medical_history(canvas: &mut Canvas, record: &ReportRecord) {
    let h = &record.history;
    let lh = canvas.metrics().line_height;
    banner(canvas, "Medical History", 2.0 * lh);
    multiline_block(canvas, "Chief Complaint", &h.chief_complaint);
    fields_row(
        canvas,
        &[
            FieldCell::new("Medications", h.medications.as_str(), 2),
            FieldCell::new("Allergies", h.allergies.as_str(), 2),
        ],
    );
    fields_row(
        canvas,
        &[FieldCell::new("Last Oral Intake", h.last_oral_intake.as_str(), 4)],
    );
    narrative_if_present(canvas, "History", &h.history);
    narrative_if_present(canvas, "Events Leading", &h.events_leading);
}

pub fn assessment(canvas: &mut Canvas, record: &ReportRecord) {
    let a = &record.assessment;
    let first = vec![
        FieldCell::new("AVPU", a.consciousness.map_or("", |c| c.label()), 1),
        FieldCell::new("GCS", a.gcs_summary(), 1),
        FieldCell::new("Impression", a.primary_impression.as_str(), 2),
    ];
    banner(canvas, "Assessment & Treatment", measure_fields_row(canvas, &first));
    fields_row(canvas, &first);
    fields_row(
        canvas,
        &[
            FieldCell::new("Skin", a.skin.as_str(), 2),
            FieldCell::new("Pupils", a.pupils.as_str(), 2),
        ],
    );
    narrative_if_present(canvas, "Treatment", &a.treatment);
    narrative_if_present(canvas, "Narrative", &a.narrative);

    let rows: Vec<Vec<String>> = a
        .recorded_vitals()
        .map(|v| v.columns().iter().map(|c| c.trim().to_string()).collect())
        .collect();
    render_table(
        canvas,
        &TableSpec::rows("Vital Signs", &VITAL_SIGN_HEADERS, rows),
    );
    let spacer = canvas.metrics().spacer;
    canvas.gap(spacer);
}

fn pain_is_blank(p: &PainAssessment) -> bool {
    p.severity.is_none()
        && [&p.location, &p.onset, &p.provocation, &p.quality, &p.radiation, &p.time]
            .iter()
            .all(|v| is_blank(v))
}

fn pain_cells(p: &PainAssessment) -> Vec<FieldCell> {
    vec![
        FieldCell::new("Location", p.location.as_str(), 2),
        FieldCell::new("Severity", p.severity_label(), 1),
        FieldCell::new("Time", p.time.as_str(), 1),
        FieldCell::new("Onset", p.onset.as_str(), 2),
        FieldCell::new("Provocation", p.provocation.as_str(), 2),
        FieldCell::new("Quality", p.quality.as_str(), 2),
        FieldCell::new("Radiation", p.radiation.as_str(), 2),
    ]
}

/// Body diagram on the left, OPQRST pain fields on the right.
///
/// Without an annotation the pain fields are laid out as ordinary rows. An
/// annotation that failed to decode keeps its (blank) region so the page
/// layout does not shift.
pub fn injury_and_pain(canvas: &mut Canvas, ctx: &SectionContext<'_>) {
    let record = ctx.record;
    let has_annotation = record.annotation.as_deref().is_some_and(|a| !is_blank(a));
    if !has_annotation && pain_is_blank(&record.pain) {
        debug!("no diagram or pain assessment, section skipped");
        return;
    }

    let cells = pain_cells(&record.pain);
    if !has_annotation {
        banner(canvas, "Pain Assessment", measure_fields_row(canvas, &cells[..3]));
        fields_row(canvas, &cells[..3]);
        fields_row(canvas, &cells[3..5]);
        fields_row(canvas, &cells[5..]);
        return;
    }

    let m = canvas.metrics().clone();
    let g = *canvas.geometry();
    let column = g.content_width() / 2.0;
    let image_box = column - 2.0 * m.cell_padding;
    let max_image = g.content_height() - banner_height(canvas);

    let text_height = measure_field_column(canvas, &cells, column);
    let image_h = match ctx.diagram {
        Some(id) => image_height(canvas, id, image_box, max_image),
        None => DIAGRAM_PLACEHOLDER,
    };
    let block = image_h.max(text_height);

    banner(canvas, "Injury Diagram & Pain Assessment", block);
    let slot = canvas.advance(block);
    match ctx.diagram {
        Some(id) => {
            place_image(
                canvas,
                id,
                (g.content_left() + m.cell_padding, slot.y),
                image_box,
                max_image,
                Anchor::Left,
            );
        }
        None => debug!("diagram unavailable, region left blank"),
    }
    field_column(canvas, &cells, g.content_left() + column, slot.y, column);
    canvas.gap(m.spacer);
}

pub fn oxygen(canvas: &mut Canvas, record: &ReportRecord) {
    let Some(o) = &record.oxygen else {
        return;
    };
    let first = vec![
        FieldCell::new("Indication", o.indication.as_str(), 2),
        FieldCell::new("Device", o.delivery_device.as_str(), 2),
    ];
    banner(canvas, "Oxygen Therapy", measure_fields_row(canvas, &first));
    fields_row(canvas, &first);
    fields_row(
        canvas,
        &[
            FieldCell::new("Initial Flow (L/min)", o.initial_flow_rate.as_str(), 2),
            FieldCell::new("Started", o.start_time.as_str(), 1),
            FieldCell::new("Stopped", o.end_time.as_str(), 1),
        ],
    );

    let changes: Vec<Vec<String>> = o
        .recorded_changes()
        .map(|c| vec![c.time.trim().to_string(), c.rate.trim().to_string()])
        .collect();
    if !changes.is_empty() {
        render_table(
            canvas,
            &TableSpec::transposed("Flow Rate Changes", &["Time", "Flow (L/min)"], changes),
        );
        let spacer = canvas.metrics().spacer;
        canvas.gap(spacer);
    }
    narrative_if_present(canvas, "Oxygen Notes", &o.notes);
}

pub fn spo2(canvas: &mut Canvas, record: &ReportRecord) {
    let readings: Vec<Vec<String>> = record
        .recorded_spo2()
        .map(|r| vec![r.time.trim().to_string(), r.value.trim().to_string()])
        .collect();
    if readings.is_empty() {
        return;
    }
    render_table(
        canvas,
        &TableSpec::transposed("SpO2 Readings", &["Time", "SpO2 (%)"], readings),
    );
    let spacer = canvas.metrics().spacer;
    canvas.gap(spacer);
}
