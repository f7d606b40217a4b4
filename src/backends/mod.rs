//! Backends module - Commands over local text files
//!
//! Provides:
//! - scan: text file discovery and listing with the ignore walker
//! - search: keyword search over scanned files
//! - count: concurrent word frequency tally of one file

pub mod count;
pub mod scan;
pub mod search;
