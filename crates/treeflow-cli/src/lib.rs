//! Treeflow CLI library
//!
//! Reads a flowchart document (from a file or from the content-generation
//! service), lays it out and writes it as SVG or PNG.

pub mod config;
pub mod error_adapter;
pub mod generate;

mod args;
mod error;

pub use args::{Args, OutputFormat};
pub use error::CliError;

use std::{fs, path::PathBuf};

use log::info;

use treeflow::{FlowchartBuilder, export::file_name_for_title};

use generate::{GenerateError, GeneratorClient};

/// Run the Treeflow CLI application
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - JSON syntax errors in the flowchart document
/// - Generator request failures
/// - Rasterization errors
pub fn run(args: &Args) -> Result<PathBuf, CliError> {
    let config = config::load_config(args.config.as_ref())?;
    let (app_config, generator_config) = config.into_parts();

    let source = match (&args.input, &args.source_text) {
        (Some(input), _) => {
            info!(input_path = input; "Reading flowchart");
            fs::read_to_string(input)?
        }
        (None, Some(text)) => {
            let endpoint = args
                .endpoint
                .as_deref()
                .or(generator_config.endpoint())
                .ok_or(GenerateError::MissingEndpoint)?;
            let client = GeneratorClient::new(
                endpoint,
                generator_config.options().clone(),
                generator_config.timeout(),
            )?;
            client.generate(text)?
        }
        (None, None) => return Err(GenerateError::MissingEndpoint.into()),
    };

    let builder = FlowchartBuilder::new(app_config);
    let flowchart = builder.parse(&source)?;

    let format = args.output_format();
    let output = match &args.output {
        Some(output) => PathBuf::from(output),
        None => {
            let png_name = PathBuf::from(file_name_for_title(flowchart.title()));
            let name = match format {
                OutputFormat::Png => png_name,
                OutputFormat::Svg => png_name.with_extension("svg"),
            };
            builder.config().export().output_dir().join(name)
        }
    };

    match format {
        OutputFormat::Svg => fs::write(&output, builder.render_svg(&flowchart)?)?,
        OutputFormat::Png => fs::write(&output, builder.render_png(&flowchart)?)?,
    }

    info!(output_file:? = output, format:? = format; "Flowchart exported successfully");

    Ok(output)
}
