//! Command-line argument definitions for the Treeflow CLI.

use std::path::Path;

use clap::{Parser, ValueEnum};

/// Image format written by the CLI.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    /// Format implied by a file extension; PNG unless the path ends in `.svg`.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Png,
        }
    }
}

/// Command-line arguments for the Treeflow flowchart tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input flowchart JSON file
    #[arg(required_unless_present = "source_text", conflicts_with = "source_text")]
    pub input: Option<String>,

    /// Output file; named after the flowchart title when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format; inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Text to send to the content-generation service instead of reading a file
    #[arg(long)]
    pub source_text: Option<String>,

    /// Content-generation endpoint, overriding the configured one
    #[arg(long)]
    pub endpoint: Option<String>,
}

impl Args {
    /// The format to write, from `--format` or the output extension.
    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_else(|| {
            self.output
                .as_deref()
                .map_or(OutputFormat::Png, OutputFormat::from_path)
        })
    }
}
