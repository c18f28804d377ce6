//! Writing the composed card and describing what was written

use crate::compose::{Composition, Rect};
use crate::error::Result;
use image::RgbaImage;
use png::{BitDepth, ColorType, Encoder, PixelDimensions, Unit};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Save `canvas` as an 8-bit RGB PNG tagged with `pixels_per_metre` on both axes.
///
/// The parent directory must already exist; it is not created.
pub fn write_png(canvas: &RgbaImage, path: &Path, pixels_per_metre: u32) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = Encoder::new(BufWriter::new(file), canvas.width(), canvas.height());
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_pixel_dims(Some(PixelDimensions {
        xppu: pixels_per_metre,
        yppu: pixels_per_metre,
        unit: Unit::Meter,
    }));

    // The canvas is opaque, so dropping alpha loses nothing.
    let rgb: Vec<u8> = canvas
        .pixels()
        .flat_map(|p| [p[0], p[1], p[2]])
        .collect();

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&rgb)?;
    writer.finish()?;
    Ok(())
}

/// Summary of one generation run
#[derive(Debug, Clone, Serialize)]
pub struct StampReport {
    /// File that was written
    pub output: PathBuf,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Print resolution tagged in the file
    pub dpi: u32,
    /// QR symbol version
    pub qr_version: i16,
    /// QR modules per side
    pub qr_modules: u32,
    /// Displayed QR symbol
    pub qr: Rect,
    /// Logo placement, `null` when no logo was found
    pub logo: Option<Rect>,
    /// Caption ink box, `null` when the caption was blank
    pub caption: Option<Rect>,
    /// Font the caption was drawn with
    pub font: String,
    /// `true` when the card was decoded and matched; `null` when not checked
    pub verified: Option<bool>,
}

impl StampReport {
    /// Build a report for `composition` saved at `output`.
    pub fn new(output: &Path, dpi: u32, composition: &Composition, verified: Option<bool>) -> Self {
        Self {
            output: output.to_path_buf(),
            width: composition.canvas.width(),
            height: composition.canvas.height(),
            dpi,
            qr_version: composition.qr_version,
            qr_modules: composition.qr_modules,
            qr: composition.layout.qr,
            logo: composition.logo,
            caption: composition.caption,
            font: composition.font.clone(),
            verified,
        }
    }

    /// Human-readable lines for terminal presentation.
    pub fn human(&self) -> Vec<String> {
        let mut lines = vec![format!("Success! Saved to {}", self.output.display())];
        lines.push(format!(
            "  Canvas: {}x{} px at {} dpi",
            self.width, self.height, self.dpi
        ));
        lines.push(format!(
            "  QR: version {} ({} modules), {}px at ({}, {})",
            self.qr_version, self.qr_modules, self.qr.width, self.qr.x, self.qr.y
        ));
        match self.logo {
            Some(logo) => lines.push(format!(
                "  Logo: {}px at ({}, {})",
                logo.width, logo.x, logo.y
            )),
            None => lines.push("  Logo: none".to_string()),
        }
        lines.push(format!("  Font: {}", self.font));
        if self.verified == Some(true) {
            lines.push("  Verified: scans back to the target URL".to_string());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn png_carries_dpi_and_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagged.png");
        let canvas = RgbaImage::from_pixel(7, 5, Rgba([10, 20, 30, 255]));
        write_png(&canvas, &path, 11811).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (7, 5));
        assert_eq!(info.color_type, ColorType::Rgb);
        let dims = info.pixel_dims.unwrap();
        assert_eq!((dims.xppu, dims.yppu), (11811, 11811));
        assert_eq!(dims.unit, Unit::Meter);

        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.get_pixel(3, 2).0, [10, 20, 30]);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/card.png");
        let canvas = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        let result = write_png(&canvas, &path, 11811);
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
