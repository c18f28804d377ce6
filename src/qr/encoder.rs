//! QR code encoder

use crate::config::QrOptions;
use crate::error::{Error, Result};
use image::{GrayImage, Luma};
use qrcode::{Color, EcLevel, QrCode, Version};

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// A rendered, unscaled QR symbol
#[derive(Debug, Clone)]
pub struct QrSymbol {
    /// Black-on-white bitmap, quiet zone included
    pub image: GrayImage,
    /// Symbol version picked by the encoder (1..=40)
    pub version: i16,
    /// Modules per side, quiet zone excluded
    pub modules: u32,
}

/// QR code encoder
///
/// Always lets the encoder pick the smallest version that fits the payload.
#[derive(Debug, Clone)]
pub struct QrEncoder {
    ecc_level: EcLevel,
    box_size: u32,
    border: u32,
}

impl QrEncoder {
    /// Create an encoder at level H with the given module size and quiet zone.
    pub fn new(box_size: u32, border: u32) -> Self {
        Self {
            ecc_level: EcLevel::H,
            box_size,
            border,
        }
    }

    /// Create an encoder from the `[qr]` configuration section.
    pub fn from_options(options: &QrOptions) -> Self {
        Self::new(options.box_size, options.border)
    }

    /// Override the error correction level.
    pub fn with_ecc_level(mut self, ecc_level: EcLevel) -> Self {
        self.ecc_level = ecc_level;
        self
    }

    /// Encode a string into a black-on-white symbol bitmap.
    ///
    /// Each dark module becomes a `box_size` square; the quiet zone is
    /// `border` modules wide on every side.
    pub fn encode(&self, data: &str) -> Result<QrSymbol> {
        if self.box_size == 0 {
            return Err(Error::QrEncode("module size must be at least 1".to_string()));
        }

        let code = QrCode::with_error_correction_level(data.as_bytes(), self.ecc_level)
            .map_err(|e| Error::QrEncode(format!("Failed to create QR code: {}", e)))?;

        let version = match code.version() {
            Version::Normal(v) | Version::Micro(v) => v,
        };
        let modules = code.width() as u32;
        let side = (modules + 2 * self.border)
            .checked_mul(self.box_size)
            .ok_or_else(|| Error::QrEncode("rendered symbol is too large".to_string()))?;

        let mut image = GrayImage::from_pixel(side, side, LIGHT);
        let offset = self.border * self.box_size;

        for (i, color) in code.to_colors().iter().enumerate() {
            if *color != Color::Dark {
                continue;
            }
            let x = offset + (i as u32 % modules) * self.box_size;
            let y = offset + (i as u32 / modules) * self.box_size;
            for dy in 0..self.box_size {
                for dx in 0..self.box_size {
                    image.put_pixel(x + dx, y + dy, DARK);
                }
            }
        }

        tracing::debug!(version, modules, side, "Encoded QR symbol");

        Ok(QrSymbol {
            image,
            version,
            modules,
        })
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::from_options(&QrOptions::default())
    }
}
