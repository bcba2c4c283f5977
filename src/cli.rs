//! Command line driver.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use cnctext_core::Font;
use cnctext_settings::Config;
use tracing::{info, warn};

pub const USAGE: &str = "\
Usage: cnctext [--config FILE] [--font FILE] [--version] [--help]

Reads labels from stdin, one per line. Tabs separate the text lines of a
label, top to bottom. The engraving program is written to stdout.

Options:
  --config FILE   configuration file (.toml or .json)
  --font FILE     stroke font (.chr), overrides font.path
  --version       print version and exit
  --help          print this help and exit";

/// Options for a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub font: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Run(RunOptions),
    Version,
    Help,
}

/// Parses command line arguments, program name excluded.
pub fn parse_args<I>(args: I) -> anyhow::Result<Action>
where
    I: IntoIterator<Item = String>,
{
    let mut options = RunOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(Action::Version),
            "--help" | "-h" => return Ok(Action::Help),
            "--config" | "-c" => {
                let value = args.next().ok_or_else(|| anyhow!("--config needs a file"))?;
                options.config = Some(PathBuf::from(value));
            }
            "--font" | "-f" => {
                let value = args.next().ok_or_else(|| anyhow!("--font needs a file"))?;
                options.font = Some(PathBuf::from(value));
            }
            other => bail!("unexpected argument '{}'\n\n{}", other, USAGE),
        }
    }

    Ok(Action::Run(options))
}

/// Splits input into labels: one per non-blank line, tab separated text lines.
pub fn parse_labels(input: &str) -> Vec<Vec<String>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            let parts: Vec<&str> = line.split('\t').collect();
            let kept: Vec<String> = parts
                .iter()
                .filter(|part| !part.trim().is_empty())
                .map(|part| part.to_string())
                .collect();
            if kept.len() != parts.len() {
                warn!(
                    "Skipped {} empty text line(s) in label on input line {}",
                    parts.len() - kept.len(),
                    number + 1
                );
            }
            kept
        })
        .collect()
}

fn load_config(options: &RunOptions) -> anyhow::Result<Config> {
    let mut config = Config::load_or_default(options.config.as_deref()).with_context(|| {
        match &options.config {
            Some(path) => format!("Failed to load config {}", path.display()),
            None => "Failed to load default config".to_string(),
        }
    })?;

    if let Some(font) = &options.font {
        config.font.path = Some(font.clone());
    }
    Ok(config)
}

fn load_font(path: &Path) -> anyhow::Result<Font> {
    let font =
        Font::from_file(path).with_context(|| format!("Failed to load font {}", path.display()))?;
    info!("Loaded {} glyphs from {}", font.len(), path.display());
    Ok(font)
}

/// Generates the engraving program for `input`.
pub fn run(options: &RunOptions, input: &str) -> anyhow::Result<String> {
    let config = load_config(options)?;
    let font_path = config
        .font
        .path
        .as_deref()
        .ok_or_else(|| anyhow!("No font given; use --font or set font.path in the config"))?;
    let font = load_font(font_path)?;

    let labels = parse_labels(input);
    if labels.is_empty() {
        warn!("No labels on input");
    }

    config
        .generator(&font)
        .generate(&labels)
        .context("Failed to generate program")
}
