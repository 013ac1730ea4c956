//! Sprite decoding and half-block rendering.
//!
//! PokeAPI sprites are small PNGs with wide transparent margins. They are
//! cropped to their opaque pixels and drawn two pixels per terminal cell with
//! `▀`/`▄`, so no terminal graphics protocol is needed.

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use serde::{Deserialize, Serialize};

const ALPHA_CUTOFF: u8 = 128;
const UPPER_HALF: &str = "\u{2580}";
const LOWER_HALF: &str = "\u{2584}";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteData {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA.
    pub pixels: Vec<u8>,
}

impl SpriteData {
    fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let px = self.pixels.get(idx..idx + 4)?;
        if px[3] < ALPHA_CUTOFF {
            return None;
        }
        Some([px[0], px[1], px[2]])
    }

    /// Terminal cells needed to draw the sprite inside `max_cols` x `max_rows`.
    pub fn fit(&self, max_cols: u16, max_rows: u16) -> (u16, u16) {
        if self.width == 0 || self.height == 0 || max_cols == 0 || max_rows == 0 {
            return (0, 0);
        }
        let scale = (max_cols as f32 / self.width as f32)
            .min(max_rows as f32 * 2.0 / self.height as f32)
            .min(1.0);
        let cols = ((self.width as f32 * scale).round() as u16).clamp(1, max_cols);
        let pixel_rows = ((self.height as f32 * scale).round() as u16).max(1);
        let rows = pixel_rows.div_ceil(2).clamp(1, max_rows);
        (cols, rows)
    }

    /// Nearest-neighbour downscale to half-block lines.
    pub fn lines(&self, max_cols: u16, max_rows: u16) -> Vec<Line<'static>> {
        let (cols, rows) = self.fit(max_cols, max_rows);
        if cols == 0 || rows == 0 {
            return Vec::new();
        }
        let pixel_rows = rows as u32 * 2;
        let sample = |col: u16, prow: u32| {
            let x = col as u32 * self.width / cols as u32;
            let y = prow * self.height / pixel_rows;
            self.pixel(x, y)
        };

        (0..rows)
            .map(|row| {
                let spans = (0..cols)
                    .map(|col| {
                        let top = sample(col, row as u32 * 2);
                        let bottom = sample(col, row as u32 * 2 + 1);
                        half_block(top, bottom)
                    })
                    .collect::<Vec<_>>();
                Line::from(spans)
            })
            .collect()
    }
}

fn rgb(px: [u8; 3]) -> Color {
    Color::Rgb(px[0], px[1], px[2])
}

fn half_block(top: Option<[u8; 3]>, bottom: Option<[u8; 3]>) -> Span<'static> {
    match (top, bottom) {
        (Some(top), Some(bottom)) => {
            Span::styled(UPPER_HALF, Style::default().fg(rgb(top)).bg(rgb(bottom)))
        }
        (Some(top), None) => Span::styled(UPPER_HALF, Style::default().fg(rgb(top))),
        (None, Some(bottom)) => Span::styled(LOWER_HALF, Style::default().fg(rgb(bottom))),
        (None, None) => Span::raw(" "),
    }
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteData, String> {
    let image = image::load_from_memory(bytes)
        .map_err(|err| err.to_string())?
        .to_rgba8();
    let (width, height) = image.dimensions();

    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0;
    let mut max_y = 0;
    for (x, y, px) in image.enumerate_pixels() {
        if px.0[3] >= ALPHA_CUTOFF {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if min_x > max_x || min_y > max_y {
        return Err("sprite has no visible pixels".to_string());
    }

    let cropped = image::imageops::crop_imm(
        &image,
        min_x,
        min_y,
        max_x - min_x + 1,
        max_y - min_y + 1,
    )
    .to_image();
    let (width, height) = cropped.dimensions();
    Ok(SpriteData {
        width,
        height,
        pixels: cropped.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageBuffer, Rgba};

    use super::*;

    fn png(width: u32, height: u32, paint: impl Fn(u32, u32) -> Rgba<u8>) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, paint);
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_decode_crops_transparent_margin() {
        let bytes = png(10, 10, |x, y| {
            if (3..5).contains(&x) && (2..8).contains(&y) {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        let sprite = decode_sprite(&bytes).unwrap();
        assert_eq!((sprite.width, sprite.height), (2, 6));
        assert_eq!(sprite.pixels.len(), 2 * 6 * 4);
    }

    #[test]
    fn test_decode_rejects_blank_and_garbage() {
        let blank = png(4, 4, |_, _| Rgba([0, 0, 0, 0]));
        assert!(decode_sprite(&blank).is_err());
        assert!(decode_sprite(b"not a png").is_err());
    }

    #[test]
    fn test_fit_keeps_aspect_and_never_upscales() {
        let sprite = SpriteData {
            width: 40,
            height: 40,
            pixels: vec![255; 40 * 40 * 4],
        };
        assert_eq!(sprite.fit(20, 5), (10, 5));
        assert_eq!(sprite.fit(200, 200), (40, 20));
        assert_eq!(sprite.fit(0, 5), (0, 0));
    }

    #[test]
    fn test_lines_use_half_blocks() {
        // Top row opaque, bottom row transparent.
        let mut pixels = vec![200, 10, 10, 255, 200, 10, 10, 255];
        pixels.extend([0, 0, 0, 0, 0, 0, 0, 0]);
        let sprite = SpriteData {
            width: 2,
            height: 2,
            pixels,
        };
        let lines = sprite.lines(2, 1);
        assert_eq!(lines.len(), 1);
        let text: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, format!("{UPPER_HALF}{UPPER_HALF}"));
    }
}
