//! # OSRM Pipeline Library
//!
//! An async orchestration library for the OSRM preprocessing toolchain:
//! graph extraction, contraction and datastore publication, each driven as
//! an external tool with its output streamed to the caller.
//!
//! ## Features
//!
//! - **Independent stages**: `extract`, `contract` and `datastore` are
//!   separate async operations; callers chain them by feeding one stage's
//!   resolved graph path into the next, or re-run any stage alone
//! - **Live tool output**: every chunk a tool writes to stdout or stderr is
//!   forwarded to an optional `AsyncWrite` sink as it arrives
//! - **Typed failures**: a nonzero exit reports the stage name, the input
//!   path and the verbatim exit code
//! - **Zero configuration**: the installed OSRM package is discovered from
//!   `OSRM_LIB_DIR` or by probing for `node_modules/osrm/lib`
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Full preprocessing chain for one map extract
//!     let graph = osrm_pipeline::extract("/data/monaco.osm.pbf", "car").await?;
//!     osrm_pipeline::contract(&graph).await?;
//!     osrm_pipeline::datastore(&graph).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming Tool Output
//!
//! ```rust,no_run
//! use osrm_pipeline::StageOptions;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let log = tokio::fs::File::create("extract.log").await?;
//!     let options = StageOptions {
//!         stdout: Some(Box::new(log)),
//!         ..Default::default()
//!     };
//!
//!     osrm_pipeline::extract_with_options("/data/monaco.osm.pbf", "car", options).await?;
//!
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

// Re-export core types that users might need
pub use crate::core::error::{suggest_profile, Error, Result};
pub use crate::core::sink::{StageOptions, StageSink};
pub use crate::core::toolset::{graph_path, Stage, GRAPH_EXTENSION, PROFILE_EXTENSION};

// Internal modules
mod core;

/// List the routing profiles shipped with the discovered OSRM installation
///
/// Scans the installation's profile directory for `.lua` scripts and returns
/// their names with the extension stripped.
///
/// # Examples
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// for name in osrm_pipeline::profile_names().await? {
///     println!("profile: {name}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn profile_names() -> Result<Vec<String>> {
    let pipeline = Pipeline::new()?;
    pipeline.profile_names().await
}

/// Extract a routing graph from raw map data
///
/// Runs `osrm-extract` on `input` with the named profile and resolves to the
/// derived `.osrm` graph path next to the input. Tool output is discarded;
/// use [`extract_with_options`] to capture it.
///
/// # Arguments
/// * `input` - Raw map data file (e.g. a `.osm.pbf` extract)
/// * `profile` - Profile name, e.g. "car" for `<profiles>/car.lua`
///
/// # Examples
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let graph = osrm_pipeline::extract("/data/berlin.osm.pbf", "car").await?;
/// assert_eq!(graph, std::path::PathBuf::from("/data/berlin.osrm"));
/// # Ok(())
/// # }
/// ```
pub async fn extract(input: impl AsRef<Path>, profile: &str) -> Result<PathBuf> {
    let pipeline = Pipeline::new()?;
    pipeline
        .extract(input, profile, StageOptions::default())
        .await
}

/// Extract a routing graph with custom stage options
///
/// Like [`extract`], with the tool's stdout and stderr forwarded to the
/// sinks in `options` as the tool runs.
///
/// # Examples
/// ```rust,no_run
/// use osrm_pipeline::StageOptions;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let options = StageOptions {
///     stderr: Some(Box::new(tokio::io::stderr())),
///     ..Default::default()
/// };
///
/// let graph = osrm_pipeline::extract_with_options(
///     "/data/berlin.osm.pbf",
///     "bicycle",
///     options,
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn extract_with_options(
    input: impl AsRef<Path>,
    profile: &str,
    options: StageOptions,
) -> Result<PathBuf> {
    let pipeline = Pipeline::new()?;
    pipeline.extract(input, profile, options).await
}

/// Build the contraction hierarchy over an extracted graph
///
/// Runs `osrm-contract` on `graph` and resolves to the same path once the
/// graph file set has been rewritten in place.
///
/// # Examples
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// osrm_pipeline::contract("/data/berlin.osrm").await?;
/// # Ok(())
/// # }
/// ```
pub async fn contract(graph: impl AsRef<Path>) -> Result<PathBuf> {
    let pipeline = Pipeline::new()?;
    pipeline.contract(graph, StageOptions::default()).await
}

/// Contract a graph with custom stage options
pub async fn contract_with_options(
    graph: impl AsRef<Path>,
    options: StageOptions,
) -> Result<PathBuf> {
    let pipeline = Pipeline::new()?;
    pipeline.contract(graph, options).await
}

/// Publish a prepared graph into the shared datastore
///
/// Runs `osrm-datastore` on `graph` so running routing processes can attach
/// to the new data. Re-running replaces the previous datastore contents.
///
/// # Examples
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// osrm_pipeline::datastore("/data/berlin.osrm").await?;
/// # Ok(())
/// # }
/// ```
pub async fn datastore(graph: impl AsRef<Path>) -> Result<PathBuf> {
    let pipeline = Pipeline::new()?;
    pipeline.datastore(graph, StageOptions::default()).await
}

/// Publish a graph with custom stage options
pub async fn datastore_with_options(
    graph: impl AsRef<Path>,
    options: StageOptions,
) -> Result<PathBuf> {
    let pipeline = Pipeline::new()?;
    pipeline.datastore(graph, options).await
}

/// Advanced API: drive the stages through an explicitly configured pipeline
///
/// For embedders that resolve tool locations themselves (packaged installs,
/// tests) instead of relying on discovery.
///
/// # Examples
/// ```rust,no_run
/// use osrm_pipeline::{Pipeline, StageOptions, ToolPaths};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tools = ToolPaths::from_lib_dir("/opt/osrm/lib");
///
/// let pipeline = Pipeline::with_tools(tools);
/// let graph = pipeline
///     .extract("/data/berlin.osm.pbf", "car", StageOptions::default())
///     .await?;
/// # Ok(())
/// # }
/// ```
pub use crate::core::{Pipeline, ToolPaths};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_path_from_input() {
        assert_eq!(
            graph_path(Path::new("/data/berlin.osm.pbf")),
            PathBuf::from("/data/berlin.osrm")
        );
        assert_eq!(
            graph_path(Path::new("monaco.pbf")),
            PathBuf::from("monaco.osrm")
        );
    }

    #[test]
    fn test_pipeline_keeps_injected_tools() {
        let tools = ToolPaths::from_lib_dir("/opt/osrm/lib");
        let pipeline = Pipeline::with_tools(tools.clone());

        assert_eq!(pipeline.tools().extract_bin, tools.extract_bin);
        assert_eq!(pipeline.tools().profile_dir, tools.profile_dir);
    }
}
