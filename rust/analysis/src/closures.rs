// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closure areas: openings between two wall pieces
//!
//! Two pieces that share the same cross-section and face each other across an
//! empty gap are read as one wall with an opening. The gap rectangle is the
//! closure area. Gaps in outer walls are windows, gaps in inner walls are
//! doors.

use crate::image_ops::is_clear;
use crate::segments::PixelRect;
use image::GrayImage;

#[derive(Debug, Clone, Copy)]
pub struct GapLimits {
    /// Slack when comparing the cross-sections of the two pieces
    pub tolerance: u32,
    pub min_gap: u32,
    pub max_gap: u32,
}

#[inline]
fn aligned(a0: u32, a1: u32, b0: u32, b1: u32, tolerance: u32) -> bool {
    a0.abs_diff(b0) <= tolerance && a1.abs_diff(b1) <= tolerance
}

/// Gap between two pieces side by side on one row band
fn horizontal_gap(a: &PixelRect, b: &PixelRect, limits: &GapLimits) -> Option<PixelRect> {
    if !aligned(a.y0, a.y1, b.y0, b.y1, limits.tolerance) {
        return None;
    }
    let (left, right) = if a.x1 <= b.x0 { (a, b) } else { (b, a) };
    if left.x1 > right.x0 {
        return None;
    }
    // Inner cross-section so the closure never reaches past either piece
    Some(PixelRect::new(
        left.x1,
        left.y0.max(right.y0),
        right.x0,
        left.y1.min(right.y1),
    ))
}

/// Gap between two pieces stacked in one column band
fn vertical_gap(a: &PixelRect, b: &PixelRect, limits: &GapLimits) -> Option<PixelRect> {
    if !aligned(a.x0, a.x1, b.x0, b.x1, limits.tolerance) {
        return None;
    }
    let (top, bottom) = if a.y1 <= b.y0 { (a, b) } else { (b, a) };
    if top.y1 > bottom.y0 {
        return None;
    }
    Some(PixelRect::new(
        top.x0.max(bottom.x0),
        top.y1,
        top.x1.min(bottom.x1),
        bottom.y0,
    ))
}

/// Closure areas between pairs of `pieces`
///
/// A gap counts when its length is within the limits and `walls` has no wall
/// pixel inside it, so a piece sitting between two others blocks the longer
/// pairing. Each pair is reported at most once.
pub fn find_closure_areas(pieces: &[PixelRect], walls: &GrayImage, limits: &GapLimits) -> Vec<PixelRect> {
    let mut closures = Vec::new();
    for (i, a) in pieces.iter().enumerate() {
        for b in &pieces[i + 1..] {
            let gap = horizontal_gap(a, b, limits)
                .map(|g| (g, g.width()))
                .or_else(|| vertical_gap(a, b, limits).map(|g| (g, g.height())));

            let Some((gap, length)) = gap else {
                continue;
            };
            if length < limits.min_gap || length > limits.max_gap || gap.area() == 0 {
                continue;
            }
            if !is_clear(walls, &gap) {
                tracing::trace!(?a, ?b, "Gap is blocked");
                continue;
            }
            if !closures.contains(&gap) {
                closures.push(gap);
            }
        }
    }
    closures
}
