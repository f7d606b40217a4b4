//! Tally module - Concurrent word frequency counting
//!
//! Provides:
//! - normalize: per-line cleanup and tokenizing
//! - table: lock-striped shared count table
//! - pool: fixed worker pool with a bounded completion barrier
//! - rank: deterministic top-N ordering
//! - counter: the end-to-end run (read → dispatch → barrier → rank)

pub mod counter;
pub mod error;
pub mod normalize;
pub mod pool;
pub mod rank;
pub mod table;
