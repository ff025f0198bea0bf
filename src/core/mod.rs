//! Core library modules for osrm-pipeline
//!
//! This module contains the internal implementation details of the osrm-pipeline library.

pub mod error;
pub mod runner;
pub mod sink;
pub mod toolset;

// Re-export main types for internal use
pub use runner::Pipeline;
pub use toolset::ToolPaths;
