//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::backends::count::CountFormat;
use crate::backends::scan::ScanOptions;
use crate::core::logging;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::tally::counter::TallyConfig;

/// wordtally - list, search and count words in local text files.
#[derive(Parser, Debug)]
#[command(name = "wordtally")]
#[command(
    author,
    version,
    about,
    long_about = r#"wordtally works on the text files under a root directory.

Each command prints a ResultSet in the selected format (default: jsonl).

Output formats:
- jsonl: one JSON object per line (best for piping into other tools)
- json: a single JSON array
- md: human-friendly Markdown
- raw: excerpts only

Examples:
    wordtally list
    wordtally search "invoice" --scope letters
    wordtally count notes.txt --workers 4
    wordtally count notes.txt --count-format summary
"#
)]
pub struct Cli {
    /// Root directory for all operations.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory for all operations (defaults to the current directory).\n\n\
All paths emitted in results are relative to this root, and positional paths/\n\
scopes are interpreted relative to it."
    )]
    pub root: PathBuf,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw"
    )]
    pub format: String,

    /// Disable colored output (when applicable).
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output in logs and text summaries. This is useful when\n\
piping to files or when your terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (warnings and errors only on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug diagnostics on stderr (pool lifecycle, scan totals).\n\
RUST_LOG, when set, takes precedence."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count word frequencies in one file using multiple workers.
    #[command(
        long_about = "Read FILE line by line and count words on a pool of worker threads.\n\
Words are lowercased and stripped of everything but ASCII letters.\n\n\
The ranking is ordered by count (descending), then by word (ascending).\n\
If the workers do not finish within --timeout-secs, the run is cut short\n\
and the partial ranking is reported with a PARTIAL_COMPLETION error item.\n\n\
Examples:\n\
  wordtally count notes.txt\n\
  wordtally count notes.txt --workers 8 --top 25\n\
  wordtally count notes.txt --count-format summary\n"
    )]
    Count {
        /// File to count (relative to ROOT unless absolute).
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of worker threads (defaults to available parallelism).
        #[arg(
            short,
            long,
            env = "WORDTALLY_WORKERS",
            value_name = "N",
            allow_negative_numbers = true
        )]
        workers: Option<i64>,

        /// Maximum number of ranked words to show.
        #[arg(long, default_value = "10", value_name = "N")]
        top: usize,

        /// Show every distinct word instead of the top N.
        #[arg(long, conflicts_with = "top")]
        all: bool,

        /// Seconds to wait for workers before ranking partial counts.
        #[arg(
            long,
            env = "WORDTALLY_TIMEOUT_SECS",
            default_value = "60",
            value_name = "SECS"
        )]
        timeout_secs: u64,

        /// Output format for count (standard/summary/json).
        #[arg(
            long = "count-format",
            default_value = "standard",
            value_name = "FORMAT",
            long_help = "Select the output format for the count command.\n\n\
Supported values:\n\
- standard (default): ResultSet rendered with --format\n\
- summary: 'Top N Words:' followed by 'word: count' lines\n\
- json: the full run report as a JSON object"
        )]
        count_format: String,
    },

    /// List text files with size, word count and content hash.
    #[command(
        long_about = "Scan ROOT (or --scope) for text files and emit one file item per match,\n\
sorted by path. .gitignore rules are respected unless --no-ignore is given.\n\n\
Examples:\n\
  wordtally list\n\
  wordtally list --ext txt,md --hidden\n"
    )]
    List {
        /// Limit scanning to a subdirectory under ROOT.
        #[arg(long, value_name = "PATH")]
        scope: Option<PathBuf>,

        /// Include hidden files/directories (dotfiles).
        #[arg(long)]
        hidden: bool,

        /// Disable .gitignore and other ignore rules.
        #[arg(long)]
        no_ignore: bool,

        /// File extensions to include (comma-separated).
        #[arg(long = "ext", value_delimiter = ',', default_value = "txt", value_name = "EXTS")]
        extensions: Vec<String>,
    },

    /// Find lines containing a keyword.
    #[command(
        long_about = "Search the text files under ROOT (or --scope) for KEYWORD\n\
(case-sensitive substring) and emit one match item per matching line.\n\n\
Examples:\n\
  wordtally search invoice\n\
  wordtally search TODO --scope drafts --ext txt,md\n"
    )]
    Search {
        /// Keyword to look for.
        #[arg(value_name = "KEYWORD")]
        keyword: String,

        /// Limit search to a subdirectory under ROOT.
        #[arg(long, value_name = "PATH")]
        scope: Option<PathBuf>,

        /// Include hidden files/directories (dotfiles).
        #[arg(long)]
        hidden: bool,

        /// File extensions to include (comma-separated).
        #[arg(long = "ext", value_delimiter = ',', default_value = "txt", value_name = "EXTS")]
        extensions: Vec<String>,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    logging::init(logging::level_for(cli.quiet, cli.verbose), !cli.no_color);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let format: OutputFormat = cli.format.parse().unwrap_or_else(|err: String| {
        log::warn!("{}; falling back to jsonl", err);
        OutputFormat::default()
    });
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    // Get absolute root path
    let root = cli.root.canonicalize().unwrap_or(cli.root);

    match cli.command {
        Commands::Count {
            file,
            workers,
            top,
            all,
            timeout_secs,
            count_format,
        } => {
            let mut config = workers.map(TallyConfig::new).unwrap_or_default();
            config = config
                .with_top_n(if all { usize::MAX } else { top })
                .with_timeout(Duration::from_secs(timeout_secs));
            let count_fmt: CountFormat = count_format.parse().unwrap_or_else(|err: String| {
                log::warn!("{}; falling back to standard", err);
                CountFormat::default()
            });
            crate::backends::count::run_count(&root, &file, &config, count_fmt, render_config)
        }

        Commands::List {
            scope,
            hidden,
            no_ignore,
            extensions,
        } => {
            let options = ScanOptions {
                scope,
                hidden,
                ignore: !no_ignore,
                extensions,
            };
            crate::backends::scan::run_list(&root, &options, render_config)
        }

        Commands::Search {
            keyword,
            scope,
            hidden,
            extensions,
        } => {
            let options = ScanOptions {
                scope,
                hidden,
                extensions,
                ..Default::default()
            };
            crate::backends::search::run_search(&root, &keyword, &options, render_config)
        }
    }
}
