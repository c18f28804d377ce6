//! Center logo loading

use crate::error::Result;
use image::imageops::{self, FilterType};
use image::{ImageReader, RgbaImage};
use std::io::ErrorKind;
use std::path::Path;

/// Load the logo with its alpha channel.
///
/// The format is sniffed from the file contents, so a misnamed or
/// extensionless logo still loads. A missing file is not an error: it is
/// logged and `None` is returned so the card is produced without a center
/// icon. Any other failure (unreadable or undecodable file) propagates.
pub fn load_logo(path: &Path) -> Result<Option<RgbaImage>> {
    let reader = match ImageReader::open(path) {
        Ok(reader) => reader,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(
                path = %path.display(),
                "Logo not found. Generating without center icon."
            );
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let img = reader.with_guessed_format()?.decode()?;
    Ok(Some(img.to_rgba8()))
}

/// Resample the logo to a `side` x `side` square.
pub fn fit_logo(logo: &RgbaImage, side: u32) -> RgbaImage {
    imageops::resize(logo, side, side, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use image::Rgba;

    fn marked_logo() -> RgbaImage {
        let mut src = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0]));
        src.put_pixel(4, 4, Rgba([200, 10, 10, 255]));
        src
    }

    #[test]
    fn missing_logo_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let logo = load_logo(&dir.path().join("icon.png")).unwrap();
        assert!(logo.is_none());
    }

    #[test]
    fn corrupt_logo_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(load_logo(&path), Err(Error::Image(_))));
    }

    #[test]
    fn logo_keeps_transparency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        marked_logo().save(&path).unwrap();

        let logo = load_logo(&path).unwrap().unwrap();
        assert_eq!(logo.get_pixel(0, 0)[3], 0);
        assert_eq!(logo.get_pixel(4, 4), &Rgba([200, 10, 10, 255]));
    }

    #[test]
    fn extensionless_logo_is_detected_by_content() {
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("icon.png");
        marked_logo().save(&png_path).unwrap();
        let bare = dir.path().join("icon");
        std::fs::copy(&png_path, &bare).unwrap();

        let logo = load_logo(&bare).unwrap().expect("logo should load");
        assert_eq!(logo.get_pixel(4, 4), &Rgba([200, 10, 10, 255]));
    }

    #[test]
    fn misnamed_logo_is_detected_by_content() {
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("icon.png");
        marked_logo().save(&png_path).unwrap();
        let misnamed = dir.path().join("icon.jpg");
        std::fs::copy(&png_path, &misnamed).unwrap();

        let logo = load_logo(&misnamed).unwrap().expect("logo should load");
        assert_eq!(logo.dimensions(), (8, 8));
    }

    #[test]
    fn fit_logo_is_square() {
        let src = RgbaImage::from_pixel(40, 20, Rgba([1, 2, 3, 255]));
        let fitted = fit_logo(&src, 16);
        assert_eq!(fitted.dimensions(), (16, 16));
    }
}
