//! qrstamp runtime configuration handling
//!
//! Every field defaults to the values the stock card is printed with, so an
//! empty (or absent) configuration file reproduces it exactly.

use crate::error::{Error, Result};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Link encoded into the card.
pub const DEFAULT_URL: &str = "https://alhazenlabs.com/strips";
/// Logo pasted over the center of the symbol.
pub const DEFAULT_LOGO_PATH: &str = "assets/icon.png";
/// Where the composed card is written.
pub const DEFAULT_OUTPUT_PATH: &str = "alhazen_qr.png";
/// Caption drawn under the symbol.
pub const DEFAULT_CAPTION: &str = "PRODUCT DETAILS";

/// Physical card width in centimetres.
pub const DEFAULT_WIDTH_CM: f64 = 12.0;
/// Physical card height in centimetres.
pub const DEFAULT_HEIGHT_CM: f64 = 14.5;
/// Print resolution.
pub const DEFAULT_DPI: u32 = 300;

/// Pixel size of one QR module before scaling.
pub const DEFAULT_BOX_SIZE: u32 = 30;
/// Quiet zone, in modules.
pub const DEFAULT_BORDER: u32 = 2;
/// Share of the canvas width taken by the displayed symbol.
pub const QR_WIDTH_FRACTION: f64 = 0.85;
/// Gap between the top edge and the symbol, in pixels.
pub const QR_TOP_MARGIN: u32 = 100;

/// Logo side = symbol side / divisor. 4.5 covers ~5% of the symbol area.
pub const LOGO_SIZE_DIVISOR: f64 = 4.5;
/// Smallest divisor accepted: a logo covering more than a quarter of the
/// symbol eats the whole level-H recovery budget.
pub const MIN_LOGO_SIZE_DIVISOR: f64 = 2.0;

/// Caption font size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 130.0;

const CM_PER_INCH: f64 = 2.54;

/// Top-level configuration structure loaded from disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StampConfig {
    /// Physical page size and resolution
    pub page: PageOptions,
    /// QR symbol encoding and placement
    pub qr: QrOptions,
    /// Center logo
    pub logo: LogoOptions,
    /// Caption text and font
    pub caption: CaptionOptions,
    /// Output file
    pub output: OutputOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl StampConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No qrstamp.toml / qrstamp.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrstamp.toml", "qrstamp.yaml", "qrstamp.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrstamp");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.logging.apply_env_overrides();
        if let Ok(logo) = env::var("QRSTAMP_LOGO") {
            self.logo.path = PathBuf::from(logo);
        }
        if let Ok(output) = env::var("QRSTAMP_OUTPUT") {
            self.output.path = PathBuf::from(output);
        }
    }

    /// Reject values that cannot produce a valid card.
    pub fn validate(&self) -> Result<()> {
        self.page.canvas_size()?;
        self.qr.validate()?;
        self.logo.validate()?;
        self.caption.validate()?;
        Ok(())
    }
}

/// Physical print size
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    /// Card width in centimetres
    pub width_cm: f64,
    /// Card height in centimetres
    pub height_cm: f64,
    /// Print resolution, written into the PNG pHYs chunk
    pub dpi: u32,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            width_cm: DEFAULT_WIDTH_CM,
            height_cm: DEFAULT_HEIGHT_CM,
            dpi: DEFAULT_DPI,
        }
    }
}

impl PageOptions {
    /// Canvas size in pixels: `round(cm * dpi / 2.54)` on each axis.
    pub fn canvas_size(&self) -> Result<(u32, u32)> {
        if self.dpi == 0 {
            return Err(Error::Config("dpi must be positive".to_string()));
        }
        let width = cm_to_px(self.width_cm, self.dpi)?;
        let height = cm_to_px(self.height_cm, self.dpi)?;
        Ok((width, height))
    }

    /// Resolution expressed as pixels per metre, the unit PNG stores.
    pub fn pixels_per_metre(&self) -> u32 {
        (self.dpi as f64 / 0.0254).round() as u32
    }
}

fn cm_to_px(cm: f64, dpi: u32) -> Result<u32> {
    if !cm.is_finite() || cm <= 0.0 {
        return Err(Error::Config(format!(
            "Page dimension must be a positive length, got {cm} cm"
        )));
    }
    let px = (cm * dpi as f64 / CM_PER_INCH).round();
    if px < 1.0 || px > u32::MAX as f64 {
        return Err(Error::Config(format!(
            "Page dimension {cm} cm at {dpi} dpi is out of range"
        )));
    }
    Ok(px as u32)
}

/// QR symbol settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    /// Payload encoded into the symbol
    pub url: String,
    /// Pixel size of one module in the unscaled bitmap
    pub box_size: u32,
    /// Quiet zone width in modules
    pub border: u32,
    /// Displayed symbol width as a share of the canvas width
    pub width_fraction: f64,
    /// Distance from the top edge to the symbol
    pub top_margin: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            box_size: DEFAULT_BOX_SIZE,
            border: DEFAULT_BORDER,
            width_fraction: QR_WIDTH_FRACTION,
            top_margin: QR_TOP_MARGIN,
        }
    }
}

impl QrOptions {
    fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(Error::Config("qr.url must not be empty".to_string()));
        }
        if self.box_size == 0 {
            return Err(Error::Config("qr.box_size must be at least 1".to_string()));
        }
        if !(self.width_fraction > 0.0 && self.width_fraction <= 1.0) {
            return Err(Error::Config(format!(
                "qr.width_fraction must be in (0, 1], got {}",
                self.width_fraction
            )));
        }
        Ok(())
    }
}

/// Center logo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoOptions {
    /// Logo image path; a missing file only skips the logo
    pub path: PathBuf,
    /// Displayed symbol side divided by this gives the logo side
    pub size_divisor: f64,
}

impl Default for LogoOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LOGO_PATH),
            size_divisor: LOGO_SIZE_DIVISOR,
        }
    }
}

impl LogoOptions {
    fn validate(&self) -> Result<()> {
        if !self.size_divisor.is_finite() || self.size_divisor < MIN_LOGO_SIZE_DIVISOR {
            return Err(Error::Config(format!(
                "logo.size_divisor must be at least {MIN_LOGO_SIZE_DIVISOR}, got {}",
                self.size_divisor
            )));
        }
        Ok(())
    }
}

/// Caption settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionOptions {
    /// Text drawn under the symbol
    pub text: String,
    /// Font size in pixels
    pub font_size: f32,
    /// Bold font candidates, tried in order
    pub font_paths: Vec<PathBuf>,
    /// Fill color: a name (`black`, `white`, ...) or `#rrggbb`
    pub color: String,
}

impl Default for CaptionOptions {
    fn default() -> Self {
        Self {
            text: DEFAULT_CAPTION.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_paths: default_font_paths(),
            color: "black".to_string(),
        }
    }
}

impl CaptionOptions {
    fn validate(&self) -> Result<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(Error::Config(format!(
                "caption.font_size must be positive, got {}",
                self.font_size
            )));
        }
        self.fill_color().map(|_| ())
    }

    /// Parse the configured fill color.
    pub fn fill_color(&self) -> Result<Rgba<u8>> {
        parse_color(&self.color)
    }
}

/// Bold sans candidates across Windows, macOS and common Linux layouts.
pub fn default_font_paths() -> Vec<PathBuf> {
    [
        "arialbd.ttf",
        "C:\\Windows\\Fonts\\arialbd.ttf",
        "/Library/Fonts/Arial Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "/usr/share/fonts/truetype/msttcorefonts/Arial_Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

/// Parse `#rrggbb` or a handful of color names into an opaque RGBA pixel.
pub fn parse_color(value: &str) -> Result<Rgba<u8>> {
    let value = value.trim();
    let named = match value.to_ascii_lowercase().as_str() {
        "black" => Some([0, 0, 0]),
        "white" => Some([255, 255, 255]),
        "red" => Some([255, 0, 0]),
        "green" => Some([0, 128, 0]),
        "blue" => Some([0, 0, 255]),
        "gray" | "grey" => Some([128, 128, 128]),
        _ => None,
    };
    if let Some([r, g, b]) = named {
        return Ok(Rgba([r, g, b, 255]));
    }

    let hex = value
        .strip_prefix('#')
        .filter(|h| h.len() == 6 && h.is_ascii())
        .ok_or_else(|| Error::Config(format!("Unknown color '{value}'")))?;
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|e| Error::Config(format!("Invalid color '{value}': {e}")))
    };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}

/// Output file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// PNG destination; its directory must already exist
    pub path: PathBuf,
    /// Decode the composed card before saving and fail if it does not scan
    pub verify: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            verify: false,
        }
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QRSTAMP_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stderr logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("QRSTAMP_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("QRSTAMP_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("QRSTAMP_LOG_COLOR") {
            match color.to_ascii_lowercase().as_str() {
                "0" | "false" | "off" => self.color = false,
                "1" | "true" | "on" => self.color = true,
                _ => {}
            }
        }
        if let Ok(rotation) = env::var("QRSTAMP_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_page_is_twelve_by_fourteen_and_a_half_at_300dpi() {
        let page = PageOptions::default();
        assert_eq!(page.canvas_size().unwrap(), (1417, 1713));
        assert_eq!(page.pixels_per_metre(), 11811);
    }

    #[test]
    fn zero_dpi_is_rejected() {
        let page = PageOptions {
            dpi: 0,
            ..PageOptions::default()
        };
        assert!(matches!(page.canvas_size(), Err(Error::Config(_))));
    }

    #[test]
    fn negative_length_is_rejected() {
        let page = PageOptions {
            width_cm: -1.0,
            ..PageOptions::default()
        };
        assert!(page.canvas_size().is_err());
    }

    #[test]
    fn toml_overrides_merge_onto_defaults() {
        let config: StampConfig = toml::from_str(
            r##"
            [qr]
            url = "https://example.com"

            [caption]
            text = "SCAN ME"
            color = "#102030"
            "##,
        )
        .unwrap();

        assert_eq!(config.qr.url, "https://example.com");
        assert_eq!(config.qr.box_size, DEFAULT_BOX_SIZE);
        assert_eq!(config.caption.text, "SCAN ME");
        assert_eq!(config.caption.fill_color().unwrap(), Rgba([0x10, 0x20, 0x30, 255]));
        assert_eq!(config.logo.path, PathBuf::from(DEFAULT_LOGO_PATH));
    }

    #[test]
    fn yaml_config_is_accepted() {
        let config: StampConfig = serde_yaml::from_str(
            "output:\n  path: out/card.png\n  verify: true\npage:\n  dpi: 600\n",
        )
        .unwrap();
        assert_eq!(config.output.path, PathBuf::from("out/card.png"));
        assert!(config.output.verify);
        assert_eq!(config.page.dpi, 600);
        assert_eq!(config.page.width_cm, DEFAULT_WIDTH_CM);
    }

    #[test]
    fn unsupported_extension_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qrstamp.ini");
        fs::write(&path, "").unwrap();
        assert!(matches!(StampConfig::from_file(&path), Err(Error::Config(_))));
    }

    #[test]
    fn defaults_validate() {
        StampConfig::default().validate().unwrap();
    }

    #[test]
    fn oversized_logo_is_rejected() {
        let mut config = StampConfig::default();
        config.logo.size_divisor = 1.5;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn width_fraction_must_fit_canvas() {
        let mut config = StampConfig::default();
        config.qr.width_fraction = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_named_and_hex_colors() {
        assert_eq!(parse_color("Black").unwrap(), Rgba([0, 0, 0, 255]));
        assert_eq!(parse_color("#ff8000").unwrap(), Rgba([255, 128, 0, 255]));
        assert!(parse_color("#ff80").is_err());
        assert!(parse_color("chartreuse").is_err());
        assert!(parse_color("#gg0000").is_err());
    }
}
