//! Error types for the osrm-pipeline library
//!
//! Provides typed failures for tool resolution, profile enumeration and stage
//! execution, plus fuzzy matching for misspelled profile names.

use std::fmt;
use std::io;
use std::path::PathBuf;

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::core::toolset::Stage;

/// Suggest a correction for a potentially misspelled profile name.
///
/// Returns `None` when the input already names a known profile
/// (case-insensitive) or when nothing scores above the similarity threshold.
pub fn suggest_profile(input: &str, available: &[String]) -> Option<String> {
    // Exact case-insensitive match needs no suggestion
    for name in available {
        if name.eq_ignore_ascii_case(input) {
            return None;
        }
    }

    let input_lower = input.to_lowercase();
    let mut best_match = None;
    let mut best_score = 0.0f64;

    // Minimum similarity threshold (0.0 to 1.0). 0.65 balances precision
    // (no suggestion for "truck" against car/bicycle/foot) vs recall
    // (catches typos like "bycicle" → "bicycle").
    let min_threshold = 0.65;

    for candidate in available {
        let candidate_lower = candidate.to_lowercase();

        // Jaro-Winkler: strong for transposition/prefix typos ("carr" → "car").
        let jw_score = jaro_winkler(&input_lower, &candidate_lower);

        // Normalized Levenshtein: better for insertions/deletions ("fot" → "foot").
        let lev_score = normalized_levenshtein(&input_lower, &candidate_lower);

        let combined_score = (jw_score * 0.7) + (lev_score * 0.3);

        if combined_score >= min_threshold && combined_score > best_score {
            best_score = combined_score;
            best_match = Some(candidate.clone());
        }
    }

    best_match
}

/// Main error type for osrm-pipeline operations
#[derive(Debug)]
pub enum Error {
    /// No OSRM installation could be located
    EngineNotFound(String),

    /// The profile directory could not be read
    ProfileDir { path: PathBuf, source: io::Error },

    /// A stage tool could not be started at all
    Spawn {
        stage: Stage,
        program: PathBuf,
        source: io::Error,
    },

    /// A stage tool ran and exited unsuccessfully
    StageFailed {
        stage: Stage,
        input: PathBuf,
        code: Option<i32>,
    },

    /// File I/O error
    IoError(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EngineNotFound(msg) => {
                write!(f, "OSRM installation not found: {msg}")
            }
            Error::ProfileDir { path, source } => {
                write!(
                    f,
                    "Failed to read profile directory {}: {source}",
                    path.display()
                )
            }
            Error::Spawn {
                stage,
                program,
                source,
            } => {
                write!(
                    f,
                    "Failed to spawn '{}' for {stage} stage: {source}",
                    program.display()
                )
            }
            Error::StageFailed {
                stage,
                input,
                code: Some(code),
            } => {
                write!(
                    f,
                    "Stage '{stage}' failed on {} with exit code {code}",
                    input.display()
                )
            }
            Error::StageFailed {
                stage,
                input,
                code: None,
            } => {
                write!(
                    f,
                    "Stage '{stage}' failed on {} (terminated by signal)",
                    input.display()
                )
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {err}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ProfileDir { source, .. } => Some(source),
            Error::Spawn { source, .. } => Some(source),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IoError(err)
    }
}

/// Convenience result type for osrm-pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
