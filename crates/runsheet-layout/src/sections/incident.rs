// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Header, incident and patient sections.

use runsheet_core::ReportRecord;

use super::SectionContext;
use crate::canvas::Canvas;
use crate::primitives::{FieldCell, banner, fields_row, measure_fields_row};
use crate::style::Stroke;
use crate::text::{fit_line, text_width};

/// Report title, generation stamp and a heavy rule.
pub fn header(canvas: &mut Canvas, ctx: &SectionContext<'_>) {
    let m = canvas.metrics().clone();
    let g = *canvas.geometry();
    let title_style = m.title();
    let stamp_style = m.small();
    let height = (title_style.size * 1.35).round();

    let slot = canvas.advance(height);
    let stamp = fit_line(
        &format!("Generated: {}", ctx.generated_at.format("%Y-%m-%d %H:%M UTC")),
        g.content_width(),
        &stamp_style,
    );
    let stamp_width = text_width(&stamp, &stamp_style);
    let stamp_y = slot.y + (height - m.line_height).max(0.0);
    canvas.text(
        g.content_right() - stamp_width,
        stamp_y,
        &stamp,
        &stamp_style,
        g.content_width(),
    );

    let title_room = (g.content_width() - stamp_width - m.spacer).max(0.0);
    let title = fit_line(&canvas_title(canvas), title_room, &title_style);
    canvas.text(g.content_left(), slot.y, &title, &title_style, title_room);

    let rule_y = canvas.claim(m.spacer / 2.0);
    canvas.line(g.content_left(), rule_y, g.content_right(), rule_y, Stroke::separator());
    canvas.gap(m.spacer);
}

fn canvas_title(canvas: &Canvas) -> String {
    let title = canvas.title().trim();
    if title.is_empty() {
        "Patient Care Report".to_string()
    } else {
        title.to_string()
    }
}

pub fn basic_info(canvas: &mut Canvas, record: &ReportRecord) {
    let b = &record.basic;
    let first = vec![
        FieldCell::new("Date", b.date.as_str(), 1),
        FieldCell::new("Incident No.", b.incident_number.as_str(), 1),
        FieldCell::new("Unit", b.unit_number.as_str(), 1),
        FieldCell::new("Call Type", b.call_type.label(), 1),
    ];
    banner(canvas, "Incident Information", measure_fields_row(canvas, &first));
    fields_row(canvas, &first);
    fields_row(canvas, &[FieldCell::new("Location", b.location.as_str(), 4)]);
    fields_row(
        canvas,
        &[
            FieldCell::new("Call Received", b.call_received.as_str(), 1),
            FieldCell::new("Dispatched", b.dispatched.as_str(), 1),
            FieldCell::new("En Route", b.en_route.as_str(), 1),
            FieldCell::new("On Scene", b.on_scene.as_str(), 1),
        ],
    );
    fields_row(
        canvas,
        &[
            FieldCell::new("Left Scene", b.departed_scene.as_str(), 1),
            FieldCell::new("At Destination", b.at_destination.as_str(), 1),
            FieldCell::new("In Service", b.in_service.as_str(), 2),
        ],
    );
}

pub fn patient_info(canvas: &mut Canvas, record: &ReportRecord) {
    let p = &record.patient;
    let first = vec![
        FieldCell::new("Name", p.name.as_str(), 2),
        FieldCell::new("Age", p.age.as_str(), 1),
        FieldCell::new("Sex", p.sex.label(), 1),
    ];
    banner(canvas, "Patient Information", measure_fields_row(canvas, &first));
    fields_row(canvas, &first);
    fields_row(
        canvas,
        &[
            FieldCell::new("DOB", p.date_of_birth.as_str(), 1),
            FieldCell::new("Weight (kg)", p.weight_kg.as_str(), 1),
            FieldCell::new("Phone", p.phone.as_str(), 1),
            FieldCell::new("ID", p.identifier.as_str(), 1),
        ],
    );
    fields_row(canvas, &[FieldCell::new("Address", p.address.as_str(), 4)]);
}
