//! Core module - Shared data structures and utilities
//!
//! This module provides:
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - Path normalization utilities
//! - Logging setup
//! - Common utilities

pub mod logging;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
