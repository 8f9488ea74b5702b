// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the runsheet-layout crate: full-report layout and
// layout plus PDF serialisation on a busy synthetic record.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use runsheet_core::record::{CrewMember, FlowChange, OxygenTherapy, TimedReading, VitalSigns};
use runsheet_core::{RenderOptions, ReportRecord};
use runsheet_layout::{PdfWriter, layout};

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// A record with long narratives and enough time-series rows to span several
/// pages and split the transposed tables into bands.
fn busy_record() -> ReportRecord {
    let mut record = ReportRecord::default();
    record.basic.date = "2026-03-14".into();
    record.basic.incident_number = "INC-0042".into();
    record.basic.unit_number = "M12".into();
    record.basic.location = "Junction of Mill Lane and Station Road".into();
    record.patient.name = "Jo Bloggs".into();
    record.history.chief_complaint = "Shortness of breath, worsening over two hours. ".repeat(6);
    record.history.history = "COPD, type 2 diabetes, previous MI. ".repeat(10);
    record.assessment.narrative =
        "Patient found sitting upright, tripod position, speaking in short phrases. ".repeat(20);

    record.assessment.vital_signs = (0..30)
        .map(|i| VitalSigns {
            time: format!("10:{:02}", i * 2 % 60),
            blood_pressure: "142/88".into(),
            pulse: format!("{}", 100 + i % 7),
            respiration: "24".into(),
            spo2: format!("{}", 88 + i % 6),
            notes: "after nebuliser".into(),
            ..VitalSigns::default()
        })
        .collect();
    record.oxygen = Some(OxygenTherapy {
        flow_changes: (0..20)
            .map(|i| FlowChange {
                time: format!("10:{:02}", i * 3 % 60),
                rate: format!("{}", 2 + i % 4),
            })
            .collect(),
        ..OxygenTherapy::default()
    });
    record.spo2_readings = (0..25)
        .map(|i| TimedReading {
            time: format!("10:{:02}", i * 2 % 60),
            value: format!("{}", 88 + i % 8),
        })
        .collect();
    record.crew = vec![CrewMember {
        name: "A. Medic".into(),
        role: "Paramedic".into(),
        certification: "P-1182".into(),
    }];
    record
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_layout(c: &mut Criterion) {
    let record = busy_record();
    let options = RenderOptions::default();

    c.bench_function("layout (busy record)", |b| {
        b.iter(|| black_box(layout(black_box(&record), &options, None)));
    });
}

fn bench_layout_and_serialise(c: &mut Criterion) {
    let record = busy_record();
    let options = RenderOptions::default();
    let writer = PdfWriter::new(options.title.as_str());

    c.bench_function("layout + PDF (busy record)", |b| {
        b.iter(|| {
            let report = layout(&record, &options, None);
            black_box(writer.render(&report).ok());
        });
    });
}

criterion_group!(benches, bench_layout, bench_layout_and_serialise);
criterion_main!(benches);
