// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary mask operations
//!
//! Masks are `GrayImage`s where 255 marks a wall pixel and 0 marks free space.

use crate::error::{AnalysisError, Result};
use crate::segments::PixelRect;
use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;

pub const WALL: Luma<u8> = Luma([255]);
pub const FREE: Luma<u8> = Luma([0]);

/// Wall mask from a drawing with dark walls on a light background
///
/// Pixels at or below the Otsu level become walls. A uniform image has no
/// walls.
pub fn wall_mask(grayscale: &GrayImage) -> GrayImage {
    let mut pixels = grayscale.pixels().map(|p| p.0[0]);
    let first = pixels.next();
    if pixels.all(|v| Some(v) == first) {
        return GrayImage::new(grayscale.width(), grayscale.height());
    }

    let level = imageproc::contrast::otsu_level(grayscale);
    tracing::debug!(level, "Otsu level");

    let mut mask = GrayImage::new(grayscale.width(), grayscale.height());
    for (x, y, pixel) in grayscale.enumerate_pixels() {
        if pixel.0[0] <= level {
            mask.put_pixel(x, y, WALL);
        }
    }
    mask
}

/// Morphological opening with a square of the given radius
///
/// Wall strokes narrower than `2 * radius + 1` disappear; wider ones keep
/// their shape.
pub fn open_walls(mask: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return mask.clone();
    }
    let eroded = imageproc::morphology::erode(mask, Norm::LInf, radius);
    imageproc::morphology::dilate(&eroded, Norm::LInf, radius)
}

/// Pixels set in `a` but not in `b`
pub fn subtract(a: &GrayImage, b: &GrayImage) -> GrayImage {
    let mut result = a.clone();
    for (out, other) in result.pixels_mut().zip(b.pixels()) {
        if other.0[0] > 0 {
            *out = FREE;
        }
    }
    result
}

/// Swap wall and free pixels
pub fn invert(mask: &GrayImage) -> GrayImage {
    let mut result = mask.clone();
    for pixel in result.pixels_mut() {
        pixel.0[0] = 255 - pixel.0[0];
    }
    result
}

/// Paint `rect` as wall
pub fn fill_rect(mask: &mut GrayImage, rect: &PixelRect) {
    let x1 = rect.x1.min(mask.width());
    let y1 = rect.y1.min(mask.height());
    for y in rect.y0..y1 {
        for x in rect.x0..x1 {
            mask.put_pixel(x, y, WALL);
        }
    }
}

/// Whether no wall pixel lies inside `rect`
pub fn is_clear(mask: &GrayImage, rect: &PixelRect) -> bool {
    let x1 = rect.x1.min(mask.width());
    let y1 = rect.y1.min(mask.height());
    (rect.y0..y1).all(|y| (rect.x0..x1).all(|x| mask.get_pixel(x, y).0[0] == 0))
}

/// Convert RGBA bytes to a grayscale image (ITU-R BT.601 luminance)
pub fn rgba_to_grayscale(rgba: &[u8], width: u32, height: u32) -> Result<GrayImage> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(AnalysisError::PixelBuffer {
            len: rgba.len(),
            width,
            height,
        });
    }

    let mut gray = GrayImage::new(width, height);
    for (pixel, chunk) in gray.pixels_mut().zip(rgba.chunks_exact(4)) {
        let luma = 0.299 * chunk[0] as f32 + 0.587 * chunk[1] as f32 + 0.114 * chunk[2] as f32;
        *pixel = Luma([luma.round() as u8]);
    }
    Ok(gray)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([255]))
    }

    fn draw_dark(img: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) {
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
    }

    fn count_walls(mask: &GrayImage) -> usize {
        mask.pixels().filter(|p| p.0[0] > 0).count()
    }

    #[test]
    fn test_wall_mask_picks_dark_pixels() {
        let mut img = white(10, 10);
        draw_dark(&mut img, 0, 0, 5, 10);
        img.put_pixel(7, 7, Luma([30]));

        let mask = wall_mask(&img);
        assert_eq!(mask.get_pixel(0, 0), &WALL);
        assert_eq!(mask.get_pixel(7, 7), &WALL);
        assert_eq!(mask.get_pixel(9, 0), &FREE);
    }

    #[test]
    fn test_uniform_image_has_no_walls() {
        assert_eq!(count_walls(&wall_mask(&white(8, 8))), 0);
        assert_eq!(count_walls(&wall_mask(&GrayImage::new(8, 8))), 0);
    }

    #[test]
    fn test_opening_drops_thin_strokes() {
        let mut img = white(60, 60);
        draw_dark(&mut img, 10, 10, 50, 20); // 10px thick
        draw_dark(&mut img, 10, 40, 50, 42); // 2px thick
        let mask = wall_mask(&img);

        let opened = open_walls(&mask, 2);
        assert_eq!(count_walls(&opened), 40 * 10);
        assert_eq!(opened.get_pixel(30, 41), &FREE);

        let wider = open_walls(&mask, 5);
        assert_eq!(count_walls(&wider), 0);

        assert_eq!(open_walls(&mask, 0), mask);
    }

    #[test]
    fn test_subtract_and_invert() {
        let mut a = GrayImage::new(3, 1);
        a.put_pixel(0, 0, WALL);
        a.put_pixel(1, 0, WALL);
        let mut b = GrayImage::new(3, 1);
        b.put_pixel(1, 0, WALL);

        let diff = subtract(&a, &b);
        assert_eq!(diff.get_pixel(0, 0), &WALL);
        assert_eq!(diff.get_pixel(1, 0), &FREE);

        let inverted = invert(&diff);
        assert_eq!(inverted.get_pixel(0, 0), &FREE);
        assert_eq!(inverted.get_pixel(2, 0), &WALL);
    }

    #[test]
    fn test_fill_and_clear() {
        let mut mask = GrayImage::new(20, 20);
        let rect = PixelRect::new(5, 5, 10, 8);
        assert!(is_clear(&mask, &rect));

        fill_rect(&mut mask, &rect);
        assert_eq!(count_walls(&mask), 15);
        assert!(!is_clear(&mask, &PixelRect::new(9, 7, 12, 12)));
        assert!(is_clear(&mask, &PixelRect::new(10, 0, 20, 20)));

        // Clipped to the image
        fill_rect(&mut mask, &PixelRect::new(18, 18, 40, 40));
        assert_eq!(count_walls(&mask), 19);
    }

    #[test]
    fn test_rgba_to_grayscale() {
        let rgba = vec![
            255, 255, 255, 255, // White
            0, 0, 0, 255, // Black
            255, 0, 0, 255, // Red
            0, 255, 0, 255, // Green
        ];
        let gray = rgba_to_grayscale(&rgba, 2, 2).unwrap();
        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(1, 0).0[0], 0);
        assert_eq!(gray.get_pixel(0, 1).0[0], 76);
        assert_eq!(gray.get_pixel(1, 1).0[0], 150);

        assert!(matches!(
            rgba_to_grayscale(&rgba[..12], 2, 2),
            Err(AnalysisError::PixelBuffer { len: 12, .. })
        ));
    }
}
