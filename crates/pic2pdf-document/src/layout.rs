// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page layout — fit an image inside the drawable area and centre it.
//
// Policy: take the full drawable width unless that overflows vertically, in
// which case take the full drawable height. Exactly one dimension is clamped to
// the drawable bound; the other follows from the aspect ratio.

use pic2pdf_core::{PageGeometry, Placement};

/// Compute where an image of `width_px` x `height_px` goes on a page.
///
/// Returns `None` when either dimension is zero.
pub fn place(geometry: &PageGeometry, width_px: u32, height_px: u32) -> Option<Placement> {
    if width_px == 0 || height_px == 0 {
        return None;
    }

    let drawable_w = geometry.drawable_width();
    let drawable_h = geometry.drawable_height();
    let margin = geometry.margin_mm();

    // f64 for the ratio so very wide or tall images keep their proportions.
    let aspect = f64::from(width_px) / f64::from(height_px);

    let mut width = f64::from(drawable_w);
    let mut height = width / aspect;
    if height > f64::from(drawable_h) {
        height = f64::from(drawable_h);
        width = height * aspect;
    }

    let x = f64::from(margin) + (f64::from(drawable_w) - width) / 2.0;
    let y = f64::from(margin) + (f64::from(drawable_h) - height) / 2.0;

    Some(Placement {
        x: x as f32,
        y: y as f32,
        width: width as f32,
        height: height as f32,
    })
}
