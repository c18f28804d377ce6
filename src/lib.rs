//! qrstamp - print-ready QR code cards
//!
//! Composes a single static image for print: a level-H QR code, a brand logo
//! pasted over its center, and a caption underneath, on a canvas sized from a
//! physical page size and DPI. The result is saved as a PNG whose `pHYs`
//! chunk carries the print resolution.
//!
//! # Features
//!
//! - **QR encoding**: smallest fitting version at error-correction level H
//! - **Logo overlay**: best-effort; a missing logo file only skips the logo
//! - **Caption**: bold outline font, with a built-in bitmap font fallback
//! - **Verification**: optionally decode the composed card before saving
//!
//! # Example
//!
//! ```no_run
//! use qrstamp::{ImageComposer, StampConfig};
//!
//! fn main() -> qrstamp::Result<()> {
//!     let mut config = StampConfig::default();
//!     config.qr.url = "https://example.com".to_string();
//!
//!     let report = ImageComposer::new(config)?.run()?;
//!     println!("Saved to {}", report.output.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod compose;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod qr;

// Re-exports for convenience
pub use error::{Error, Result};

pub use compose::{Composition, ImageComposer, Layout, Rect};
pub use config::{
    CaptionOptions, LogRotation, LoggingOptions, LogoOptions, OutputOptions, PageOptions,
    QrOptions, StampConfig,
};
pub use output::StampReport;
pub use qr::{QrDecoder, QrEncoder, QrSymbol};
