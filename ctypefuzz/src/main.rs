mod cli;
mod util;

use anyhow::{Context, Result};
use ctypefuzz_lib::{entropy::RngEntropy, fuzz};
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::io::Write;

fn main() -> Result<()> {
    let Some(args) = cli::parse_args(std::env::args_os())? else {
        return Ok(());
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CTYPEFUZZ_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = cli::extract_generate_opts(&args)?;

    let mut entropy = match args.seed() {
        Some(seed) => RngEntropy::seeded(seed),
        None => RngEntropy::from_os(),
    };
    info!(seed = entropy.seed(), "rerun with `--seed {}`", entropy.seed());

    let line = fuzz::typedef(&opts, &mut entropy, args.name())?;

    let mut output = cli::open_output(&args)?;
    writeln!(output, "{line}").context("Failed to write to output")?;
    output.flush().context("Failed to write to output")?;

    Ok(())
}
