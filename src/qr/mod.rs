//! QR code encoding and decoding
//!
//! The encoder renders the black-on-white symbol that gets scaled onto the
//! card. The decoder reads a composed card back so a logo overlay can be
//! checked against the error-correction budget.

mod decoder;
mod encoder;

pub use decoder::QrDecoder;
pub use encoder::{QrEncoder, QrSymbol};
