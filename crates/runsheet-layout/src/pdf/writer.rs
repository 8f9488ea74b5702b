// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — serialise a laid-out report using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. Layout coordinates are top-left based; every y is
// flipped against the page height here and nowhere else.

use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Point, Polygon, PolygonRing, Pt, RawImage, RawImageData, RawImageFormat, Rgb,
    TextItem, WindingOrder, XObjectId, XObjectTransform,
};
use runsheet_core::PT_PER_MM;
use runsheet_core::error::{ReportError, Result};
use tracing::{debug, info, instrument};

use crate::canvas::{DrawCommand, PageLayout, RenderedReport};
use crate::style::{FontFace, Stroke, TextStyle, Tint};

/// Fraction of the font size from the top of a line box to the baseline.
const BASELINE: f32 = 0.9;

/// Turns a [`RenderedReport`] display list into PDF bytes.
pub struct PdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: String,
}

impl PdfWriter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Serialise every page of `report`.
    #[instrument(skip_all, fields(pages = report.pages.len(), images = report.images.len()))]
    pub fn render(&self, report: &RenderedReport) -> Result<Vec<u8>> {
        if report.pages.is_empty() {
            return Err(ReportError::Serialization("report has no pages".into()));
        }

        let mut doc = PdfDocument::new(&self.title);

        let images: Vec<Registered> = report
            .images
            .iter()
            .map(|img| {
                let raw = RawImage {
                    pixels: RawImageData::U8(img.rgb.clone()),
                    width: img.width_px as usize,
                    height: img.height_px as usize,
                    data_format: RawImageFormat::RGB8,
                    tag: Vec::new(),
                };
                Registered {
                    id: doc.add_image(&raw),
                    width_px: img.width_px,
                    height_px: img.height_px,
                }
            })
            .collect();

        let mut pages = Vec::with_capacity(report.pages.len());
        for (index, page) in report.pages.iter().enumerate() {
            let ops = page_ops(page, &images)?;
            debug!(page = index + 1, ops = ops.len(), "page emitted");
            pages.push(PdfPage::new(
                Mm(page.geometry.width / PT_PER_MM),
                Mm(page.geometry.height / PT_PER_MM),
                ops,
            ));
        }
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !output.starts_with(b"%PDF-") {
            return Err(ReportError::Serialization(
                "serialiser produced no PDF header".into(),
            ));
        }
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "printpdf reported warnings");
        }

        info!(bytes = output.len(), "PDF serialised");
        Ok(output)
    }
}

/// An image added to the document, with the pixel size needed for scaling.
struct Registered {
    id: XObjectId,
    width_px: u32,
    height_px: u32,
}

fn rgb(tint: Tint) -> Color {
    Color::Rgb(Rgb {
        r: tint[0],
        g: tint[1],
        b: tint[2],
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

fn builtin(style: &TextStyle) -> BuiltinFont {
    match style.face {
        FontFace::Regular => BuiltinFont::Helvetica,
        FontFace::Bold => BuiltinFont::HelveticaBold,
    }
}

fn stroke_ops(ops: &mut Vec<Op>, stroke: &Stroke) {
    ops.push(Op::SetOutlineColor {
        col: rgb(stroke.color),
    });
    ops.push(Op::SetOutlineThickness {
        pt: Pt(stroke.thickness),
    });
}

/// Emit one page. Every command runs inside its own graphics-state save /
/// restore pair so no colour or line width carries over.
fn page_ops(page: &PageLayout, images: &[Registered]) -> Result<Vec<Op>> {
    let page_h = page.geometry.height;
    let mut ops = Vec::new();

    for command in &page.commands {
        ops.push(Op::SaveGraphicsState);
        match command {
            DrawCommand::Text { x, y, text, style, .. } => {
                let font = builtin(style);
                ops.push(Op::StartTextSection);
                ops.push(Op::SetTextCursor {
                    pos: Point {
                        x: Pt(*x),
                        y: Pt(page_h - y - style.size * BASELINE),
                    },
                });
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(style.size),
                    font,
                });
                ops.push(Op::SetFillColor {
                    col: rgb(style.color),
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(text.clone())],
                    font,
                });
                ops.push(Op::EndTextSection);
            }
            DrawCommand::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                let top = page_h - y;
                let bottom = top - height;
                let corners = vec![
                    point(*x, bottom),
                    point(x + width, bottom),
                    point(x + width, top),
                    point(*x, top),
                ];
                if let Some(fill) = fill {
                    ops.push(Op::SetFillColor { col: rgb(*fill) });
                    ops.push(Op::DrawPolygon {
                        polygon: Polygon {
                            rings: vec![PolygonRing {
                                points: corners.clone(),
                            }],
                            mode: PaintMode::Fill,
                            winding_order: WindingOrder::NonZero,
                        },
                    });
                }
                if let Some(stroke) = stroke {
                    stroke_ops(&mut ops, stroke);
                    ops.push(Op::DrawLine {
                        line: Line {
                            points: corners,
                            is_closed: true,
                        },
                    });
                }
            }
            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
            } => {
                stroke_ops(&mut ops, stroke);
                ops.push(Op::DrawLine {
                    line: Line {
                        points: vec![point(*x1, page_h - y1), point(*x2, page_h - y2)],
                        is_closed: false,
                    },
                });
            }
            DrawCommand::Image {
                image,
                x,
                y,
                width,
                height,
            } => {
                let registered = images.get(image.0).ok_or_else(|| {
                    ReportError::Serialization(format!("image {} was never registered", image.0))
                })?;
                // At 72 dpi one pixel is one point before scaling.
                ops.push(Op::UseXobject {
                    id: registered.id.clone(),
                    transform: XObjectTransform {
                        translate_x: Some(Pt(*x)),
                        translate_y: Some(Pt(page_h - y - height)),
                        rotate: None,
                        scale_x: Some(width / registered.width_px.max(1) as f32),
                        scale_y: Some(height / registered.height_px.max(1) as f32),
                        dpi: Some(72.0),
                    },
                });
            }
        }
        ops.push(Op::RestoreGraphicsState);
    }

    Ok(ops)
}
