// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — annotation decoding and aspect-preserving placement.

pub mod annotation;
pub mod compositor;

pub use annotation::decode_annotation;
pub use compositor::{Anchor, fit_scale, image_height, place_image};
