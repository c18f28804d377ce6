//! Caption font loading, measurement and drawing.
//!
//! The caption prefers a bold outline font from disk. When none of the
//! candidates can be read or parsed it falls back to the Spleen 12x24 bitmap
//! font compiled into the binary, so a caption is always drawn.

use crate::config::CaptionOptions;
use crate::error::{Error, Result};
use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use spleen_font::{FONT_12X24, PSF2Font};
use std::fs;
use std::path::{Path, PathBuf};

const BITMAP_CELL_WIDTH: u32 = 12;
const BITMAP_CELL_HEIGHT: u32 = 24;

/// Tight box around the pixels a string covers, relative to the draw origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkBounds {
    /// Offset of the leftmost inked column from the origin
    pub left: i32,
    /// Offset of the topmost inked row from the origin
    pub top: i32,
    /// Inked width
    pub width: u32,
    /// Inked height
    pub height: u32,
}

impl InkBounds {
    fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            width: (right - left).max(0) as u32,
            height: (bottom - top).max(0) as u32,
        }
    }
}

/// Font used for the caption
pub enum CaptionFont {
    /// TrueType/OpenType font loaded from disk
    Outline {
        /// Parsed font
        font: FontVec,
        /// Pixel scale
        scale: PxScale,
        /// File the font was read from
        source: PathBuf,
    },
    /// Built-in Spleen 12x24, each font pixel drawn as a `scale` square
    Bitmap {
        /// Integer magnification
        scale: u32,
    },
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline { scale, source, .. } => f
                .debug_struct("Outline")
                .field("scale", &scale.y)
                .field("source", source)
                .finish(),
            Self::Bitmap { scale } => f.debug_struct("Bitmap").field("scale", scale).finish(),
        }
    }
}

impl CaptionFont {
    /// Load the first usable candidate, or the built-in font if none loads.
    pub fn load(options: &CaptionOptions) -> Self {
        for path in &options.font_paths {
            match Self::from_file(path, options.font_size) {
                Ok(font) => {
                    tracing::debug!(path = %path.display(), "Loaded caption font");
                    return font;
                }
                Err(e) => tracing::debug!("Skipping font candidate: {e}"),
            }
        }
        tracing::debug!("No bold font available, using built-in bitmap font");
        Self::builtin(options.font_size)
    }

    /// Read and parse an outline font at `size` pixels.
    pub fn from_file(path: &Path, size: f32) -> Result<Self> {
        let bytes = fs::read(path)
            .map_err(|e| Error::Font(format!("Failed to read {}: {e}", path.display())))?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| Error::Font(format!("Failed to parse {}: {e}", path.display())))?;
        Ok(Self::Outline {
            font,
            scale: PxScale::from(size),
            source: path.to_path_buf(),
        })
    }

    /// Built-in font magnified to roughly `size` pixels tall.
    pub fn builtin(size: f32) -> Self {
        let scale = (size / BITMAP_CELL_HEIGHT as f32).floor().max(1.0) as u32;
        Self::Bitmap { scale }
    }

    /// Short description for reports: the font file, or `builtin`.
    pub fn describe(&self) -> String {
        match self {
            Self::Outline { source, .. } => source.display().to_string(),
            Self::Bitmap { scale } => format!("builtin spleen 12x24 x{scale}"),
        }
    }

    /// Measure the inked area of `text`. `None` when nothing would be drawn.
    pub fn ink_bounds(&self, text: &str) -> Result<Option<InkBounds>> {
        match self {
            Self::Outline { font, scale, .. } => Ok(outline_bounds(font, *scale, text)),
            Self::Bitmap { scale } => {
                let dots = bitmap_dots(text)?;
                let mut edges: Option<(u32, u32, u32, u32)> = None;
                for (x, y) in dots {
                    edges = Some(match edges {
                        None => (x, y, x + 1, y + 1),
                        Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x + 1), b.max(y + 1)),
                    });
                }
                Ok(edges.map(|(l, t, r, b)| {
                    let s = *scale as i32;
                    InkBounds::from_edges(l as i32 * s, t as i32 * s, r as i32 * s, b as i32 * s)
                }))
            }
        }
    }

    /// Draw `text` with its layout origin at (`x`, `y`).
    pub fn draw(
        &self,
        canvas: &mut RgbaImage,
        x: i32,
        y: i32,
        text: &str,
        color: Rgba<u8>,
    ) -> Result<()> {
        match self {
            Self::Outline { font, scale, .. } => {
                draw_text_mut(canvas, color, x, y, *scale, font, text);
            }
            Self::Bitmap { scale } => {
                let s = *scale as i64;
                for (dx, dy) in bitmap_dots(text)? {
                    let px = x as i64 + dx as i64 * s;
                    let py = y as i64 + dy as i64 * s;
                    fill_square(canvas, px, py, *scale, color);
                }
            }
        }
        Ok(())
    }
}

/// Glyph placement matches `imageproc::drawing::draw_text_mut`, so measured
/// and drawn ink agree.
fn outline_bounds(font: &FontVec, scale: PxScale, text: &str) -> Option<InkBounds> {
    let scaled = font.as_scaled(scale);
    let mut caret = 0.0f32;
    let mut prev: Option<GlyphId> = None;
    let mut edges: Option<(i32, i32, i32, i32)> = None;

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
        caret += scaled.h_advance(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        if let Some(prev) = prev {
            caret += scaled.kern(id, prev);
        }
        prev = Some(id);

        let bb = outlined.px_bounds();
        let left = bb.min.x.round() as i32;
        let top = bb.min.y.round() as i32;
        let right = left + bb.width().round() as i32;
        let bottom = top + bb.height().round() as i32;
        edges = Some(match edges {
            None => (left, top, right, bottom),
            Some((l, t, r, b)) => (l.min(left), t.min(top), r.max(right), b.max(bottom)),
        });
    }

    edges.map(|(l, t, r, b)| InkBounds::from_edges(l, t, r, b))
}

/// Set pixels of `text` in unscaled font units, one 12x24 cell per char.
fn bitmap_dots(text: &str) -> Result<Vec<(u32, u32)>> {
    let mut font = PSF2Font::new(FONT_12X24)
        .map_err(|_| Error::Font("built-in Spleen font failed to load".to_string()))?;

    let mut dots = Vec::new();
    let mut utf8 = [0u8; 4];
    for (index, ch) in text.chars().enumerate() {
        let cell_x = index as u32 * BITMAP_CELL_WIDTH;
        let bytes = ch.encode_utf8(&mut utf8).as_bytes();
        // Characters outside the font render as '?'.
        let lookup: &[u8] = if font.glyph_for_utf8(bytes).is_some() {
            bytes
        } else {
            b"?"
        };
        let Some(glyph) = font.glyph_for_utf8(lookup) else {
            continue;
        };
        for (row_y, row) in glyph.enumerate() {
            for (col_x, on) in row.enumerate() {
                if on {
                    dots.push((cell_x + col_x as u32, row_y as u32));
                }
            }
        }
    }
    Ok(dots)
}

fn fill_square(canvas: &mut RgbaImage, x: i64, y: i64, side: u32, color: Rgba<u8>) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    for py in y.max(0)..(y + side as i64).min(h) {
        for px in x.max(0)..(x + side as i64).min(w) {
            canvas.put_pixel(px as u32, py as u32, color);
        }
    }
}
