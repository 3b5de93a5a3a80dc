//! Terminal host for the data-package preview widget.

use anyhow::Context;
use clap::Parser;

mod cli;
mod logging;
mod render;

use dpv_model::DataPackageDocument;
use dpv_widget::{Preview, ROW_LIMIT};

use crate::cli::Cli;
use crate::render::{field_info_table, group_thousands, preview_table};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = logging::init_logging(
        cli.verbosity.tracing_level_filter(),
        cli.verbosity.is_present(),
    ) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let raw = std::fs::read_to_string(&cli.datapackage)
        .with_context(|| format!("failed to read {}", cli.datapackage.display()))?;
    let document: DataPackageDocument =
        serde_json::from_str(&raw).context("invalid data-package document")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .build()
        .context("failed to start runtime")?;
    let state = runtime.block_on(async {
        let preview = Preview::spawn(document);
        preview.wait_terminal().await
    });

    // Like the embedded widget, a fatal error replaces the grid.
    if let Some(error) = &state.error {
        println!("There was an error: {error}");
        return Ok(1);
    }

    println!("Download {} ({})", state.filename, state.download_url);
    if state.too_large {
        println!(
            "This file is too large and only {} rows were streamed.",
            group_thousands(ROW_LIMIT)
        );
    }
    if cli.fields {
        println!("{}", field_info_table(&state));
    }
    println!("{}", preview_table(&state, cli.rows, cli.sort_by.as_deref()));
    println!(
        "{} of {} streamed rows shown",
        cli.rows.min(state.rows.len()),
        group_thousands(state.rows.len())
    );
    Ok(0)
}
