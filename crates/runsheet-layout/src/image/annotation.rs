// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Annotation decoding — turn the serialized body-diagram payload into a flat
// RGB raster the PDF emitter can embed.
//
// The drawing surface hands over either a JSON object
// `{ "image": "data:image/png;base64,...", "strokes": [...] }` or just the data
// URI. Only the raster is used; stroke data is ignored.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STD};
use image::{DynamicImage, GenericImageView};
use runsheet_core::error::{ReportError, Result};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::canvas::EmbeddedImage;

#[derive(Debug, Deserialize)]
struct AnnotationPayload {
    image: String,
}

/// Decode an annotation string into an embeddable image.
#[instrument(skip(raw), fields(len = raw.len()))]
pub fn decode_annotation(raw: &str) -> Result<EmbeddedImage> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ReportError::Annotation("annotation is empty".into()));
    }

    let source = if raw.starts_with('{') {
        let payload: AnnotationPayload = serde_json::from_str(raw)
            .map_err(|e| ReportError::Annotation(format!("invalid annotation JSON: {e}")))?;
        payload.image
    } else {
        raw.to_string()
    };

    let bytes = decode_data_uri(&source)?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| ReportError::Annotation(format!("failed to decode image: {e}")))?;
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(ReportError::Annotation("image has no pixels".into()));
    }
    debug!(width, height, "annotation decoded");

    Ok(EmbeddedImage {
        width_px: width,
        height_px: height,
        rgb: flatten_onto_white(&img),
    })
}

/// Accepts `data:<mime>;base64,<data>` or bare base64.
fn decode_data_uri(src: &str) -> Result<Vec<u8>> {
    let encoded = match src.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest.split_once(',').ok_or_else(|| {
                ReportError::Annotation("data URI is missing the ',' separator".into())
            })?;
            if !header.contains(";base64") {
                return Err(ReportError::Annotation(
                    "only base64 data URIs are supported".into(),
                ));
            }
            data
        }
        None => src,
    };

    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64_STD
        .decode(compact.as_bytes())
        .map_err(|e| ReportError::Annotation(format!("base64 decode error: {e}")))
}

/// Composite any transparency over a white page and drop the alpha channel.
fn flatten_onto_white(img: &DynamicImage) -> Vec<u8> {
    let rgba = img.to_rgba8();
    let mut out = Vec::with_capacity(rgba.width() as usize * rgba.height() as usize * 3);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let a = a as u32;
        for c in [r, g, b] {
            let blended = (c as u32 * a + 255 * (255 - a) + 127) / 255;
            out.push(blended as u8);
        }
    }
    out
}
