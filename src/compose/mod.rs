//! Card composition
//!
//! [`ImageComposer`] runs the whole generation pass: encode the symbol, lay
//! out the canvas, paste the symbol and logo, draw the caption, and hand the
//! result to [`crate::output`] for saving.

pub mod caption;
pub mod layout;
pub mod logo;

pub use caption::{CaptionFont, InkBounds};
pub use layout::{Layout, Rect};

use crate::config::StampConfig;
use crate::error::{Error, Result};
use crate::output::{self, StampReport};
use crate::qr::{QrDecoder, QrEncoder};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A composed card, not yet written to disk
#[derive(Debug)]
pub struct Composition {
    /// Opaque RGBA canvas
    pub canvas: RgbaImage,
    /// Positions used while drawing
    pub layout: Layout,
    /// QR version picked by the encoder
    pub qr_version: i16,
    /// QR modules per side
    pub qr_modules: u32,
    /// Where the logo was pasted, if it was found
    pub logo: Option<Rect>,
    /// Inked caption area, if the caption drew anything
    pub caption: Option<Rect>,
    /// Font the caption was drawn with
    pub font: String,
}

/// Builds one print card from a [`StampConfig`]
#[derive(Debug, Clone)]
pub struct ImageComposer {
    config: StampConfig,
}

impl ImageComposer {
    /// Validate the configuration and create a composer.
    pub fn new(config: StampConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration this composer draws with.
    pub fn config(&self) -> &StampConfig {
        &self.config
    }

    /// Compose the card in memory.
    pub fn compose(&self) -> Result<Composition> {
        let config = &self.config;
        let (width, height) = config.page.canvas_size()?;
        let layout = Layout::compute(width, height, &config.qr, config.logo.size_divisor)?;

        let symbol = QrEncoder::from_options(&config.qr).encode(&config.qr.url)?;
        tracing::info!(
            url = %config.qr.url,
            version = symbol.version,
            modules = symbol.modules,
            "Generated QR symbol"
        );

        let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);

        let qr = imageops::resize(
            &symbol.image,
            layout.qr.width,
            layout.qr.height,
            FilterType::Lanczos3,
        );
        let qr = DynamicImage::ImageLuma8(qr).to_rgba8();
        paste(&mut canvas, &qr, &layout.qr);

        let logo = match logo::load_logo(&config.logo.path)? {
            Some(img) => {
                if layout.logo.width == 0 {
                    return Err(Error::Layout(format!(
                        "QR code of {}px is too small for a logo at 1/{}",
                        layout.qr.width, config.logo.size_divisor
                    )));
                }
                let fitted = logo::fit_logo(&img, layout.logo.width);
                paste(&mut canvas, &fitted, &layout.logo);
                tracing::debug!(rect = ?layout.logo, "Pasted logo");
                Some(layout.logo)
            }
            None => None,
        };

        let font = CaptionFont::load(&config.caption);
        let caption = self.draw_caption(&mut canvas, &layout, &font)?;

        Ok(Composition {
            canvas,
            layout,
            qr_version: symbol.version,
            qr_modules: symbol.modules,
            logo,
            caption,
            font: font.describe(),
        })
    }

    fn draw_caption(
        &self,
        canvas: &mut RgbaImage,
        layout: &Layout,
        font: &CaptionFont,
    ) -> Result<Option<Rect>> {
        let caption = &self.config.caption;
        let Some(ink) = font.ink_bounds(&caption.text)? else {
            tracing::debug!("Caption is blank, nothing to draw");
            return Ok(None);
        };

        let rect = layout.caption_rect(ink.width, ink.height)?;
        // Shift the layout origin so the ink, not the glyph cell, lands on `rect`.
        let x = rect.x as i32 - ink.left;
        let y = rect.y as i32 - ink.top;
        font.draw(canvas, x, y, &caption.text, caption.fill_color()?)?;
        tracing::debug!(?rect, font = %font.describe(), "Drew caption");

        Ok(Some(rect))
    }

    /// Compose, optionally verify, and save the card. Returns what was written.
    pub fn run(&self) -> Result<StampReport> {
        let composition = self.compose()?;

        let verified = if self.config.output.verify {
            QrDecoder::new().verify(
                &DynamicImage::ImageRgba8(composition.canvas.clone()),
                &self.config.qr.url,
            )?;
            tracing::info!("Composed card scans back to the target URL");
            Some(true)
        } else {
            None
        };

        let path = &self.config.output.path;
        output::write_png(&composition.canvas, path, self.config.page.pixels_per_metre())?;
        tracing::info!(path = %path.display(), "Saved card");

        Ok(StampReport::new(
            path,
            self.config.page.dpi,
            &composition,
            verified,
        ))
    }
}

/// Alpha-composite `src` onto `canvas` at the top-left of `at`.
fn paste(canvas: &mut RgbaImage, src: &RgbaImage, at: &Rect) {
    imageops::overlay(canvas, src, at.x as i64, at.y as i64);
}
