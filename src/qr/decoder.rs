//! Scan-back of composed cards with rqrr

use crate::error::{Error, Result};
use image::{DynamicImage, GrayImage};

/// Reads QR codes back out of rendered images
#[derive(Debug, Default)]
pub struct QrDecoder {}

impl QrDecoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self {}
    }

    /// Text of the first QR code found in `img`.
    pub fn decode(&self, img: &DynamicImage) -> Result<String> {
        self.decode_gray(img.to_luma8())
    }

    /// Text of the first QR code found in a grayscale image.
    pub fn decode_gray(&self, img: GrayImage) -> Result<String> {
        let mut prepared = rqrr::PreparedImage::prepare(img);
        let grids = prepared.detect_grids();
        let grid = grids.first().ok_or(Error::NoQrCodeFound)?;

        let (meta, text) = grid
            .decode()
            .map_err(|e| Error::QrDecode(format!("Decode failed: {e:?}")))?;
        tracing::debug!(
            version = ?meta.version,
            ecc_level = meta.ecc_level,
            len = text.len(),
            "Decoded QR code"
        );
        Ok(text)
    }

    /// Check that `img` scans back to `expected`.
    pub fn verify(&self, img: &DynamicImage, expected: &str) -> Result<()> {
        let text = match self.decode(img) {
            Ok(text) => text,
            Err(Error::NoQrCodeFound) => {
                return Err(Error::Verification(
                    "no QR code detected in composed image".to_string(),
                ));
            }
            Err(e) => return Err(Error::Verification(e.to_string())),
        };

        if text != expected {
            return Err(Error::Verification(format!(
                "decoded '{text}', expected '{expected}'"
            )));
        }
        Ok(())
    }
}
