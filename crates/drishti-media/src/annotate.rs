//! Frame annotation: draw a marker circle and alert label on a decoded frame.
//!
//! A pure, frame-local operation. The marker is clamped so the full circle
//! stays inside the image bounds, and the default radius scales with the
//! smaller image dimension (floor 20 px).

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use tracing::debug;

use crate::error::{MediaError, MediaResult};

const MARKER_COLOR: Rgb<u8> = Rgb([220, 20, 20]);
const STROKE_WIDTH: f32 = 3.0;
const LABEL: &str = "ALERT!";
const LABEL_SCALE: u32 = 2;

/// Minimum marker radius in pixels.
pub const MIN_RADIUS: u32 = 20;

/// Draw a circular marker and an "ALERT!" label at `(x, y)` and write the
/// annotated copy to `output`.
///
/// `radius` defaults to a tenth of the smaller image dimension, floored at
/// [`MIN_RADIUS`]. Returns the output path on success.
pub fn annotate_frame(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    x: u32,
    y: u32,
    radius: Option<u32>,
) -> MediaResult<PathBuf> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    let mut img = image::open(input)?.to_rgb8();
    let (width, height) = img.dimensions();

    let radius = radius.unwrap_or_else(|| (width.min(height) / 10).max(MIN_RADIUS));
    let (cx, cy) = clamp_center(x, y, radius, width, height);

    draw_circle(&mut img, cx, cy, radius);
    draw_label(&mut img, cx.saturating_sub(radius), cy.saturating_sub(radius + 24));

    img.save(output)?;
    debug!(
        input = %input.display(),
        output = %output.display(),
        cx, cy, radius,
        "Annotated frame"
    );
    Ok(output.to_path_buf())
}

/// Clamp the marker center so the circle stays fully inside the image.
fn clamp_center(x: u32, y: u32, radius: u32, width: u32, height: u32) -> (u32, u32) {
    let clamp = |v: u32, max: u32| {
        if max <= 2 * radius {
            max / 2
        } else {
            v.clamp(radius, max - radius)
        }
    };
    (clamp(x, width), clamp(y, height))
}

/// Draw a circle outline with a fixed stroke width.
fn draw_circle(img: &mut RgbImage, cx: u32, cy: u32, radius: u32) {
    let (width, height) = img.dimensions();
    let r = radius as f32;
    let half_stroke = STROKE_WIDTH / 2.0;

    let x0 = cx.saturating_sub(radius + 2);
    let y0 = cy.saturating_sub(radius + 2);
    let x1 = (cx + radius + 2).min(width.saturating_sub(1));
    let y1 = (cy + radius + 2).min(height.saturating_sub(1));

    for py in y0..=y1 {
        for px in x0..=x1 {
            let dx = px as f32 - cx as f32;
            let dy = py as f32 - cy as f32;
            let dist = (dx * dx + dy * dy).sqrt();
            if (dist - r).abs() <= half_stroke {
                img.put_pixel(px, py, MARKER_COLOR);
            }
        }
    }
}

/// 5x7 bitmap glyphs for the characters of the alert label.
fn glyph(c: char) -> Option<[u8; 7]> {
    match c {
        'A' => Some([0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'L' => Some([0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        'E' => Some([0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
        'R' => Some([0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
        'T' => Some([0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
        '!' => Some([0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100]),
        _ => None,
    }
}

/// Render the alert label starting at `(x, y)`.
fn draw_label(img: &mut RgbImage, x: u32, y: u32) {
    let (width, height) = img.dimensions();
    let mut pen_x = x;

    for c in LABEL.chars() {
        let Some(rows) = glyph(c) else { continue };
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..5u32 {
                if bits & (1 << (4 - col)) == 0 {
                    continue;
                }
                // Each glyph pixel becomes a LABEL_SCALE square
                for sy in 0..LABEL_SCALE {
                    for sx in 0..LABEL_SCALE {
                        let px = pen_x + col * LABEL_SCALE + sx;
                        let py = y + row as u32 * LABEL_SCALE + sy;
                        if px < width && py < height {
                            img.put_pixel(px, py, MARKER_COLOR);
                        }
                    }
                }
            }
        }
        pen_x += 6 * LABEL_SCALE;
    }
}
