//! Card layout arithmetic
//!
//! All positions are computed once from the canvas size before anything is
//! drawn. Centering uses integer division, so an element is symmetric about
//! the midpoint up to one pixel.

use crate::config::QrOptions;
use crate::error::{Error, Result};
use serde::Serialize;

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the rightmost column.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the bottom row.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Offset that centers `inner` within `outer`.
pub fn centered_offset(outer: u32, inner: u32) -> u32 {
    outer.saturating_sub(inner) / 2
}

/// Displayed symbol side: `round(canvas_width * fraction)`.
pub fn qr_display_size(canvas_width: u32, fraction: f64) -> u32 {
    (canvas_width as f64 * fraction).round() as u32
}

/// Logo side: `floor(qr_size / divisor)`.
pub fn logo_size(qr_size: u32, divisor: f64) -> u32 {
    (qr_size as f64 / divisor).floor() as u32
}

/// Resolved positions of everything placed on the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// Whole canvas
    pub canvas: Rect,
    /// Displayed QR symbol
    pub qr: Rect,
    /// Slot reserved for the logo, centered in the symbol (zero-sized when the
    /// symbol is too small to hold one)
    pub logo: Rect,
}

impl Layout {
    /// Lay out a canvas of `width` x `height`.
    pub fn compute(width: u32, height: u32, qr: &QrOptions, logo_divisor: f64) -> Result<Self> {
        let canvas = Rect::new(0, 0, width, height);

        let qr_size = qr_display_size(width, qr.width_fraction);
        if qr_size == 0 {
            return Err(Error::Layout(format!(
                "canvas width {width} leaves no room for the QR code"
            )));
        }
        let qr_rect = Rect::new(centered_offset(width, qr_size), qr.top_margin, qr_size, qr_size);
        if !canvas.contains(&qr_rect) {
            return Err(Error::Layout(format!(
                "QR code {qr_size}x{qr_size} at y={} overflows {width}x{height} canvas",
                qr.top_margin
            )));
        }

        // May be empty on a tiny symbol; only an actual logo needs the room.
        let side = logo_size(qr_size, logo_divisor);
        let inset = centered_offset(qr_size, side);
        let logo = Rect::new(qr_rect.x + inset, qr_rect.y + inset, side, side);

        Ok(Self {
            canvas,
            qr: qr_rect,
            logo,
        })
    }

    /// Vertical space between the bottom of the symbol and the canvas edge.
    pub fn caption_gap(&self) -> u32 {
        self.canvas.bottom() - self.qr.bottom()
    }

    /// Place a `width` x `height` caption: centered horizontally, and
    /// vertically centered in the gap under the symbol.
    pub fn caption_rect(&self, width: u32, height: u32) -> Result<Rect> {
        if width > self.canvas.width || height > self.caption_gap() {
            return Err(Error::Layout(format!(
                "caption {width}x{height} does not fit the {}x{} space under the QR code",
                self.canvas.width,
                self.caption_gap()
            )));
        }
        let x = centered_offset(self.canvas.width, width);
        let y = self.qr.bottom() + centered_offset(self.caption_gap(), height);
        Ok(Rect::new(x, y, width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LOGO_SIZE_DIVISOR, PageOptions};
    use pretty_assertions::assert_eq;

    fn default_layout() -> Layout {
        let (w, h) = PageOptions::default().canvas_size().unwrap();
        Layout::compute(w, h, &QrOptions::default(), LOGO_SIZE_DIVISOR).unwrap()
    }

    #[test]
    fn default_card_layout() {
        let layout = default_layout();
        assert_eq!(layout.canvas, Rect::new(0, 0, 1417, 1713));
        assert_eq!(layout.qr, Rect::new(106, 100, 1204, 1204));
        assert_eq!(layout.logo, Rect::new(106 + 468, 100 + 468, 267, 267));
        assert_eq!(layout.caption_gap(), 1713 - 1304);
    }

    #[test]
    fn qr_offset_is_half_the_slack_for_many_widths() {
        for width in [100u32, 101, 640, 999, 1417, 2480, 3508] {
            let size = qr_display_size(width, 0.85);
            assert_eq!(size, (width as f64 * 0.85).round() as u32);
            let offset = centered_offset(width, size);
            assert_eq!(offset, (width - size) / 2);
            assert!(size + offset <= width);
        }
    }

    #[test]
    fn logo_is_inside_qr() {
        for width in [200u32, 777, 1417, 4000] {
            let layout =
                Layout::compute(width, width * 2, &QrOptions::default(), LOGO_SIZE_DIVISOR)
                    .unwrap();
            assert!(layout.qr.contains(&layout.logo));
            assert!(layout.canvas.contains(&layout.qr));
        }
    }

    #[test]
    fn logo_is_centered_in_qr() {
        let layout = default_layout();
        let left = layout.logo.x - layout.qr.x;
        let right = layout.qr.right() - layout.logo.right();
        assert!(left.abs_diff(right) <= 1);
        assert_eq!(layout.logo.x - layout.qr.x, layout.logo.y - layout.qr.y);
    }

    #[test]
    fn qr_taller_than_canvas_is_rejected() {
        let result = Layout::compute(1000, 600, &QrOptions::default(), LOGO_SIZE_DIVISOR);
        assert!(matches!(result, Err(Error::Layout(_))));
    }

    #[test]
    fn tiny_symbol_gets_an_empty_logo_slot() {
        let qr = QrOptions {
            top_margin: 0,
            ..QrOptions::default()
        };
        let layout = Layout::compute(5, 20, &qr, LOGO_SIZE_DIVISOR).unwrap();
        assert_eq!(layout.qr.width, 4);
        assert_eq!(layout.logo.width, 0);
        assert!(layout.qr.contains(&layout.logo));
    }

    #[test]
    fn caption_is_centered_in_gap() {
        let layout = default_layout();
        let rect = layout.caption_rect(901, 120).unwrap();
        assert_eq!(rect.x, (1417 - 901) / 2);
        assert_eq!(rect.y, 1304 + (409 - 120) / 2);
        assert!(layout.canvas.contains(&rect));
    }

    #[test]
    fn oversized_caption_is_rejected() {
        let layout = default_layout();
        assert!(layout.caption_rect(1418, 10).is_err());
        assert!(layout.caption_rect(10, 410).is_err());
    }

    #[test]
    fn contains_is_inclusive_of_edges() {
        let outer = Rect::new(10, 10, 100, 100);
        assert!(outer.contains(&outer));
        assert!(outer.contains(&Rect::new(60, 60, 50, 50)));
        assert!(!outer.contains(&Rect::new(61, 60, 50, 50)));
        assert!(!outer.contains(&Rect::new(9, 10, 5, 5)));
    }
}
