// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image compositor — aspect-preserving placement of an embedded raster.

use crate::canvas::{Canvas, ImageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Center,
}

/// Scale factor for an image of native size `native` (pt) in a box `box_width`
/// wide: `min(box_width / native_width, max_scale)`, further reduced so the
/// height never exceeds `max_height`.
pub fn fit_scale(native: (f32, f32), box_width: f32, max_scale: f32, max_height: f32) -> f32 {
    let (w, h) = native;
    if w <= 0.0 || h <= 0.0 {
        return 0.0;
    }
    let mut scale = (box_width / w).min(max_scale);
    if h * scale > max_height {
        scale = max_height / h;
    }
    scale.max(0.0)
}

/// Native size of a registered image in points, one pixel to the point.
fn native_size(canvas: &Canvas, image: ImageId) -> Option<(f32, f32)> {
    canvas
        .image_size(image)
        .map(|(w, h)| (w as f32, h as f32))
}

/// Height `image` will occupy in a box `box_width` wide, at most `max_height`
/// (never more than a page's content height).
pub fn image_height(canvas: &Canvas, image: ImageId, box_width: f32, max_height: f32) -> f32 {
    let Some(native) = native_size(canvas, image) else {
        return 0.0;
    };
    let max_height = max_height.min(canvas.geometry().content_height());
    native.1 * fit_scale(native, box_width, canvas.metrics().image_max_scale, max_height)
}

/// Draw `image` at (`x`, `y`) inside a box `box_width` wide and at most
/// `max_height` tall. Returns the occupied height; the cursor is not moved.
pub fn place_image(
    canvas: &mut Canvas,
    image: ImageId,
    (x, y): (f32, f32),
    box_width: f32,
    max_height: f32,
    anchor: Anchor,
) -> f32 {
    let Some(native) = native_size(canvas, image) else {
        return 0.0;
    };
    let max_scale = canvas.metrics().image_max_scale;
    let max_height = max_height.min(canvas.geometry().content_height());
    let scale = fit_scale(native, box_width, max_scale, max_height);

    let width = native.0 * scale;
    let height = native.1 * scale;
    let left = match anchor {
        Anchor::Left => x,
        Anchor::Center => x + (box_width - width) / 2.0,
    };
    canvas.image(image, left, y, width, height);
    height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, EmbeddedImage};
    use runsheet_core::RenderOptions;

    fn image(w: u32, h: u32) -> EmbeddedImage {
        EmbeddedImage {
            width_px: w,
            height_px: h,
            rgb: vec![255; (w * h * 3) as usize],
        }
    }

    #[test]
    fn scale_is_capped() {
        assert_eq!(fit_scale((100.0, 50.0), 400.0, 1.0, 1000.0), 1.0);
        assert_eq!(fit_scale((800.0, 400.0), 400.0, 1.0, 1000.0), 0.5);
        assert_eq!(fit_scale((100.0, 1000.0), 400.0, 1.0, 500.0), 0.5);
        assert_eq!(fit_scale((0.0, 10.0), 400.0, 1.0, 500.0), 0.0);
    }

    #[test]
    fn placement_preserves_aspect_ratio() {
        let mut c = Canvas::new(&RenderOptions::default());
        let id = c.add_image(image(600, 300));
        let h = place_image(&mut c, id, (36.0, 100.0), 200.0, f32::MAX, Anchor::Center);
        assert!((h - 100.0).abs() < 1e-3);
        assert_eq!(image_height(&c, id, 200.0, f32::MAX), h);

        let report = c.finish();
        let DrawCommand::Image { x, width, height, .. } = report.pages[0].commands[0] else {
            panic!("expected image command");
        };
        assert!((width / height - 2.0).abs() < 1e-4);
        assert!((x - 36.0).abs() < 1e-3);
    }

    #[test]
    fn tall_image_is_clamped_to_max_height() {
        let mut c = Canvas::new(&RenderOptions::default());
        let id = c.add_image(image(100, 2000));
        let h = place_image(&mut c, id, (0.0, 0.0), 300.0, 250.0, Anchor::Left);
        assert!((h - 250.0).abs() < 1e-3);
    }

    #[test]
    fn small_image_is_centered() {
        let mut c = Canvas::new(&RenderOptions::default());
        let id = c.add_image(image(100, 100));
        place_image(&mut c, id, (0.0, 0.0), 300.0, f32::MAX, Anchor::Center);
        let report = c.finish();
        let DrawCommand::Image { x, width, .. } = report.pages[0].commands[0] else {
            panic!("expected image command");
        };
        assert_eq!(width, 100.0);
        assert_eq!(x, 100.0);
    }
}
