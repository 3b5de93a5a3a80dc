//! CLI argument definitions for the preview host.

use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dpv",
    version,
    about = "Data-package preview - stream a CSV resource into a terminal grid",
    long_about = "Load a data-package JSON document, stream its first CSV resource,\n\
                  and render the resulting grid in the terminal. Large files are\n\
                  truncated at the 50,000-row ceiling, matching the embedded widget."
)]
pub struct Cli {
    /// Path to the data-package JSON document.
    #[arg(value_name = "DATAPACKAGE")]
    pub datapackage: PathBuf,

    /// Also print the field-information table.
    #[arg(long = "fields")]
    pub fields: bool,

    /// Maximum number of data rows to print (streamed rows are retained
    /// regardless; this only bounds the rendering).
    #[arg(long = "rows", value_name = "N", default_value_t = 20)]
    pub rows: usize,

    /// Sort the printed rows by this column before rendering.
    #[arg(long = "sort-by", value_name = "COLUMN")]
    pub sort_by: Option<String>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,
}
