// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report engine — validate, lay out, serialise, optionally append a signed
// document, and package the result as an artifact.
//
// Every call builds its own canvas and writer; nothing is shared between calls
// except the object URL registry handed in by the caller.

use chrono::Utc;
use runsheet_core::error::{ReportError, Result};
use runsheet_core::{RenderOptions, ReportRecord};
use tracing::{debug, info, instrument, warn};

use crate::artifact::{Artifact, ObjectUrlRegistry, report_filename};
use crate::canvas::{Canvas, EmbeddedImage, RenderedReport};
use crate::image::decode_annotation;
use crate::pdf::{PdfWriter, append_document, page_count};
use crate::sections::{SectionContext, render_report};

/// Lay out `record` into a display list. `diagram` is the already decoded
/// body diagram, if any.
pub fn layout(
    record: &ReportRecord,
    options: &RenderOptions,
    diagram: Option<EmbeddedImage>,
) -> RenderedReport {
    let mut canvas = Canvas::new(options);
    let diagram = diagram.map(|image| canvas.add_image(image));
    let ctx = SectionContext {
        record,
        diagram,
        generated_at: options.generated_at.unwrap_or_else(Utc::now),
    };
    render_report(&mut canvas, &ctx);
    canvas.finish()
}

/// Decode the annotation, if any. Failures are logged and yield `None`.
pub fn decode_diagram(record: &ReportRecord) -> Option<EmbeddedImage> {
    let raw = record.annotation.as_deref()?;
    match decode_annotation(raw) {
        Ok(image) => Some(image),
        Err(err) => {
            warn!(error = %err, "annotation unusable, leaving diagram area blank");
            None
        }
    }
}

/// Synchronous render to PDF bytes, signed document appended if supplied.
#[instrument(skip_all, fields(incident = %record.basic.incident_number))]
pub fn render_pdf(record: &ReportRecord, options: &RenderOptions) -> Result<Vec<u8>> {
    record.validate()?;
    let report = layout(record, options, decode_diagram(record));
    let bytes = PdfWriter::new(options.title.as_str()).render(&report)?;
    match &options.append_document {
        Some(external) => append_document(&bytes, external),
        None => Ok(bytes),
    }
}

/// Generate a report artifact.
///
/// Raster decoding and the merge run on the blocking pool; layout and
/// serialisation run on the calling task. A record missing required fields
/// is rejected before anything is drawn.
#[instrument(skip_all, fields(incident = %record.basic.incident_number))]
pub async fn generate(
    record: &ReportRecord,
    options: &RenderOptions,
    registry: &ObjectUrlRegistry,
) -> Result<Artifact> {
    record.validate()?;

    let diagram = match record.annotation.clone() {
        Some(raw) => {
            let decoded = tokio::task::spawn_blocking(move || decode_annotation(&raw))
                .await
                .map_err(|e| ReportError::Join(e.to_string()))?;
            match decoded {
                Ok(image) => Some(image),
                Err(err) => {
                    warn!(error = %err, "annotation unusable, leaving diagram area blank");
                    None
                }
            }
        }
        None => None,
    };

    let report = layout(record, options, diagram);
    let generated_pages = report.page_count();
    debug!(pages = generated_pages, "layout complete");
    let mut bytes = PdfWriter::new(options.title.as_str()).render(&report)?;

    let pages = match options.append_document.clone() {
        Some(external) => {
            let base = bytes;
            let (merged, total) = tokio::task::spawn_blocking(move || {
                let merged = append_document(&base, &external)?;
                let total = page_count(&merged)?;
                Ok::<_, ReportError>((merged, total))
            })
            .await
            .map_err(|e| ReportError::Join(e.to_string()))??;
            bytes = merged;
            total
        }
        None => generated_pages,
    };

    let filename = report_filename(
        &record.basic.date,
        &record.basic.incident_number,
        &record.patient.name,
    );
    let artifact = Artifact::new(bytes, filename, pages, registry);
    info!(
        filename = artifact.filename(),
        pages,
        bytes = artifact.size(),
        sha256 = artifact.sha256(),
        "report generated"
    );
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use lopdf::Document;
    use runsheet_core::record::VitalSigns;
    use std::io::Cursor;

    fn record(incident: &str, patient: &str) -> ReportRecord {
        let mut record = ReportRecord::default();
        record.basic.date = "2026-03-14".into();
        record.basic.incident_number = incident.into();
        record.basic.unit_number = "M12".into();
        record.patient.name = patient.into();
        record.history.chief_complaint = "Fall from ladder, left wrist pain".into();
        record.assessment.vital_signs = vec![VitalSigns {
            time: "10:42".into(),
            blood_pressure: "128/84".into(),
            pulse: "92".into(),
            ..VitalSigns::default()
        }];
        record
    }

    fn pinned() -> RenderOptions {
        let at = chrono::DateTime::parse_from_rfc3339("2026-03-14T11:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        RenderOptions::default().with_generated_at(at)
    }

    fn page_contents(bytes: &[u8]) -> Vec<Vec<u8>> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|id| doc.get_page_content(*id).unwrap())
            .collect()
    }

    fn png_data_uri() -> String {
        let img = RgbaImage::from_pixel(40, 80, Rgba([200, 30, 30, 255]));
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(png))
    }

    #[tokio::test]
    async fn generates_artifact_with_filename_and_live_url() {
        let registry = ObjectUrlRegistry::new();
        let artifact = generate(&record("INC-7", "Jo Bloggs"), &pinned(), &registry)
            .await
            .unwrap();
        assert_eq!(artifact.filename(), "PCR_2026_03_14_INC_7_Jo_Bloggs.pdf");
        assert!(artifact.bytes().starts_with(b"%PDF-"));
        assert_eq!(artifact.size(), artifact.bytes().len());
        assert!(registry.is_live(artifact.url()));
        assert_eq!(artifact.page_count(), page_contents(artifact.bytes()).len());
    }

    #[tokio::test]
    async fn missing_fields_fail_before_drawing() {
        let registry = ObjectUrlRegistry::new();
        let mut incomplete = record("INC-7", "");
        incomplete.basic.unit_number.clear();
        let err = generate(&incomplete, &pinned(), &registry)
            .await
            .unwrap_err();
        match err {
            ReportError::MissingRequiredFields(fields) => {
                assert_eq!(fields, vec!["patient name", "unit number"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(registry.live_count(), 0);
    }

    #[tokio::test]
    async fn appended_pages_follow_unchanged_report_pages() {
        let registry = ObjectUrlRegistry::new();
        let rec = record("INC-9", "Jo Bloggs");
        let plain = render_pdf(&rec, &pinned()).unwrap();

        let mut signed_rec = record("SIGNED", "Someone Else");
        signed_rec.history.history = "x ".repeat(4000);
        let signed = render_pdf(&signed_rec, &pinned()).unwrap();
        let signed_pages = page_contents(&signed).len();
        assert!(signed_pages >= 2);

        let options = pinned().with_append_document(signed);
        let artifact = generate(&rec, &options, &registry).await.unwrap();

        let base = page_contents(&plain);
        let merged = page_contents(artifact.bytes());
        assert_eq!(merged.len(), base.len() + signed_pages);
        assert_eq!(&merged[..base.len()], &base[..]);
        assert_eq!(artifact.page_count(), merged.len());
    }

    #[tokio::test]
    async fn corrupt_signed_document_aborts_generation() {
        let registry = ObjectUrlRegistry::new();
        let options = pinned().with_append_document(b"%PDF-1.4 truncated".to_vec());
        let err = generate(&record("INC-1", "Jo"), &options, &registry)
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::Merge(_)));
        assert_eq!(registry.live_count(), 0);
    }

    #[tokio::test]
    async fn bad_annotation_degrades_to_blank_diagram() {
        let registry = ObjectUrlRegistry::new();
        let mut rec = record("INC-2", "Jo");
        rec.annotation = Some("data:image/png;base64,@@@not-base64@@@".into());
        let artifact = generate(&rec, &pinned(), &registry).await.unwrap();
        assert!(artifact.bytes().starts_with(b"%PDF-"));
    }

    #[test]
    fn decoded_annotation_is_embedded() {
        let mut rec = record("INC-3", "Jo");
        rec.annotation = Some(png_data_uri());
        let report = layout(&rec, &pinned(), decode_diagram(&rec));
        assert_eq!(report.images.len(), 1);
        assert!(report.contains_text("Injury Diagram & Pain Assessment"));
    }

    #[test]
    fn concurrent_threads_produce_identical_reports() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| render_pdf(&record("INC-5", "Jo Bloggs"), &pinned()).unwrap())
            })
            .collect();
        let outputs: Vec<Vec<Vec<u8>>> = handles
            .into_iter()
            .map(|h| page_contents(&h.join().unwrap()))
            .collect();
        for output in &outputs[1..] {
            assert_eq!(output, &outputs[0]);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_generations_do_not_interfere() {
        let registry = ObjectUrlRegistry::new();
        let mut tasks = Vec::new();
        for i in 0..6 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                let rec = record(&format!("INC-{i}"), &format!("Patient {i}"));
                generate(&rec, &pinned(), &registry).await.unwrap()
            }));
        }

        let mut names = Vec::new();
        for (i, task) in tasks.into_iter().enumerate() {
            let artifact = task.await.unwrap();
            let rec = record(&format!("INC-{i}"), &format!("Patient {i}"));
            let expected = render_pdf(&rec, &pinned()).unwrap();
            assert_eq!(page_contents(artifact.bytes()), page_contents(&expected));
            assert_eq!(
                registry.resolve(artifact.url()).as_deref().map(Vec::as_slice),
                Some(artifact.bytes())
            );
            names.push(artifact.filename().to_string());
        }
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 6);
        assert_eq!(registry.live_count(), 6);
    }
}
