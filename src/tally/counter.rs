//! Concurrent word tally: read lines, dispatch them to the pool, rank the table

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::tally::error::TallyError;
use crate::tally::normalize::{normalize_line, tokens};
use crate::tally::pool::{Termination, WorkerPool};
use crate::tally::rank::{rank, WordCount, DEFAULT_TOP_N};
use crate::tally::table::WordTable;

/// Default bound on the completion barrier
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings for one tally run
#[derive(Debug, Clone)]
pub struct TallyConfig {
    /// Requested worker count; must be at least 1
    pub workers: i64,
    /// Maximum number of ranked entries
    pub top_n: usize,
    /// How long to wait for the pool to drain
    pub timeout: Duration,
}

impl TallyConfig {
    pub fn new(workers: i64) -> Self {
        Self {
            workers,
            top_n: DEFAULT_TOP_N,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the worker count before any work starts
    pub fn validate(&self) -> Result<NonZeroUsize, TallyError> {
        usize::try_from(self.workers)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or(TallyError::InvalidConcurrency {
                requested: self.workers,
            })
    }
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self::new(default_workers() as i64)
    }
}

/// Available parallelism, falling back to 4
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
}

/// Whether every dispatched line was counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Complete,
    /// The barrier timed out; `abandoned` lines were running or still queued
    Partial { abandoned: usize },
}

/// Result of one tally run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallyReport {
    /// Name of the counted source
    pub source: String,
    /// Ranked entries, count descending then word ascending
    pub top: Vec<WordCount>,
    pub outcome: Outcome,
    pub workers: usize,
    pub lines_read: usize,
    pub lines_dispatched: usize,
    /// Lines that were not valid UTF-8 and were decoded lossily
    pub lines_lossy: usize,
    pub total_words: u64,
    pub distinct_words: usize,
    pub elapsed_ms: u64,
    /// Bound that applied to the completion barrier
    pub timeout_secs: u64,
    /// Full unranked table
    #[serde(skip)]
    pub counts: BTreeMap<String, u64>,
}

impl TallyReport {
    pub fn is_partial(&self) -> bool {
        matches!(self.outcome, Outcome::Partial { .. })
    }

    /// `Top N Words:` followed by one `word: count` line per entry
    pub fn summary(&self) -> String {
        let mut out = format!("Top {} Words:", self.top.len());
        for entry in &self.top {
            out.push_str(&format!("\n{}: {}", entry.word, entry.count));
        }
        out
    }
}

/// Count one line into the shared table
pub fn count_line(line: &str, table: &WordTable) {
    let normalized = normalize_line(line);
    for token in tokens(&normalized) {
        if !table.increment(token) {
            log::debug!("table sealed, dropping late increment for '{}'", token);
            return;
        }
    }
}

/// Tally the words of a file
pub fn count_file(path: &Path, config: &TallyConfig) -> Result<TallyReport, TallyError> {
    // Reject bad concurrency before touching the filesystem
    config.validate()?;

    let name = path.display().to_string();
    let file = File::open(path).map_err(|e| TallyError::unreadable(&name, e))?;
    count_reader(BufReader::new(file), &name, config)
}

/// Tally the words of any buffered line source
pub fn count_reader<R: BufRead>(
    reader: R,
    source: &str,
    config: &TallyConfig,
) -> Result<TallyReport, TallyError> {
    count_reader_with(reader, source, config, count_line)
}

/// Tally with a custom per-line step.
///
/// `process` runs on worker threads, once per dispatched line.
pub fn count_reader_with<R, F>(
    mut reader: R,
    source: &str,
    config: &TallyConfig,
    process: F,
) -> Result<TallyReport, TallyError>
where
    R: BufRead,
    F: Fn(&str, &WordTable) + Send + Sync + 'static,
{
    let workers = config.validate()?;
    let started = Instant::now();

    let table = Arc::new(WordTable::new());
    let process = Arc::new(process);
    let mut pool = WorkerPool::new(workers);

    log::info!(
        "counting words in '{}' with {} worker(s)",
        source,
        workers
    );

    let mut buf = Vec::new();
    let mut lines_read = 0usize;
    let mut lines_dispatched = 0usize;
    let mut lines_lossy = 0usize;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::error!(
                    "read failed in '{}' after {} line(s): {}",
                    source,
                    lines_read,
                    e
                );
                pool.shutdown_now();
                return Err(TallyError::unreadable(source, e));
            }
        }
        lines_read += 1;

        // Undecodable bytes become U+FFFD, which normalization strips
        let line = match String::from_utf8_lossy(trim_line_ending(&buf)) {
            Cow::Borrowed(line) => line.to_owned(),
            Cow::Owned(line) => {
                log::warn!(
                    "line {} of '{}' is not valid UTF-8, invalid bytes ignored",
                    lines_read,
                    source
                );
                lines_lossy += 1;
                line
            }
        };

        let table = Arc::clone(&table);
        let process = Arc::clone(&process);
        match pool.submit(move || process(line.as_str(), table.as_ref())) {
            Ok(true) => lines_dispatched += 1,
            Ok(false) => log::warn!("pool rejected line {} of '{}'", lines_read, source),
            Err(e) => {
                log::error!("no worker thread could be started: {}", e);
                pool.shutdown_now();
                return Err(e);
            }
        }
    }

    let outcome = match pool.await_termination(config.timeout) {
        Termination::Drained => Outcome::Complete,
        Termination::TimedOut { abandoned } => {
            let err = TallyError::PartialCompletion {
                abandoned,
                timeout_secs: config.timeout.as_secs(),
            };
            log::warn!("{}; ranking partial counts", err);
            Outcome::Partial { abandoned }
        }
    };

    // Nothing may change the table once ranking starts
    table.seal();
    let snapshot = table.snapshot();

    let counts: BTreeMap<String, u64> = snapshot
        .iter()
        .map(|(word, count)| (word.clone(), *count))
        .collect();
    let total_words = counts.values().sum();
    let distinct_words = counts.len();
    let top = rank(snapshot, config.top_n);

    let report = TallyReport {
        source: source.to_string(),
        top,
        outcome,
        workers: workers.get(),
        lines_read,
        lines_dispatched,
        lines_lossy,
        total_words,
        distinct_words,
        elapsed_ms: started.elapsed().as_millis() as u64,
        timeout_secs: config.timeout.as_secs(),
        counts,
    };

    log::info!(
        "counted {} word(s), {} distinct, from {} line(s) in {}ms",
        report.total_words,
        report.distinct_words,
        report.lines_dispatched,
        report.elapsed_ms
    );

    Ok(report)
}

/// Strip a trailing `\n` or `\r\n`
fn trim_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}
