//! wordtally - a CLI for local text files
//!
//! wordtally provides:
//! - Text file listing with size, word count and content hash
//! - Keyword search across text files
//! - Concurrent word frequency counting with a bounded worker pool
//! - Unified output format (jsonl/json/md/raw)

use anyhow::Result;
use clap::Parser;

mod backends;
mod cli;
mod core;
mod tally;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
