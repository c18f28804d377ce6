//! qrstamp command-line entrypoint

use clap::Parser;
use qrstamp::{ImageComposer, Result, StampConfig, logging};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "qrstamp",
    version,
    about = "Compose a print-ready QR code card with a logo and caption"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to qrstamp.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Link to encode
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Logo image pasted over the QR center
    #[arg(long, value_name = "PATH")]
    logo: Option<PathBuf>,

    /// Caption drawn under the QR code
    #[arg(long, value_name = "TEXT")]
    caption: Option<String>,

    /// Output PNG path
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Decode the composed card and fail if it does not scan back to the URL
    #[arg(long)]
    verify: bool,

    /// Print the run report as JSON instead of human-readable text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = StampConfig::load(cli.config.as_deref())?;

    if let Some(url) = cli.url {
        config.qr.url = url;
    }
    if let Some(logo) = cli.logo {
        config.logo.path = logo;
    }
    if let Some(caption) = cli.caption {
        config.caption.text = caption;
    }
    if let Some(output) = cli.output {
        config.output.path = output;
    }
    if cli.verify {
        config.output.verify = true;
    }

    logging::init(&config.logging)?;

    let report = ImageComposer::new(config)?.run()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in report.human() {
            println!("{line}");
        }
    }

    Ok(())
}
