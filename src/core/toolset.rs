//! Tool and artifact path resolution for the OSRM toolchain
//!
//! Locates the stage executables and the profile directory inside an installed
//! OSRM package and derives graph paths from input file names.

use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};

/// File extension of the graph artifact produced by extraction
pub const GRAPH_EXTENSION: &str = "osrm";

/// File extension marking a routing profile script
pub const PROFILE_EXTENSION: &str = "lua";

/// Environment variable overriding installation discovery
pub const LIB_DIR_ENV: &str = "OSRM_LIB_DIR";

/// The three preprocessing stages, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Turn raw map data into a routing graph
    Extract,
    /// Build the contraction hierarchy over an extracted graph
    Contract,
    /// Publish a prepared graph into the shared datastore
    Datastore,
}

impl Stage {
    /// File name of the external executable implementing this stage
    pub fn tool_name(&self) -> &'static str {
        match self {
            Stage::Extract => "osrm-extract",
            Stage::Contract => "osrm-contract",
            Stage::Datastore => "osrm-datastore",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extract => write!(f, "extract"),
            Stage::Contract => write!(f, "contract"),
            Stage::Datastore => write!(f, "datastore"),
        }
    }
}

/// Resolved locations of the stage executables and the profile directory
///
/// All four paths derive from a single library directory, so a value is never
/// partially resolved. Fields are public so embedders and tests can point the
/// pipeline at arbitrary layouts.
#[derive(Debug, Clone)]
pub struct ToolPaths {
    /// Path to the `osrm-extract` executable
    pub extract_bin: PathBuf,

    /// Path to the `osrm-contract` executable
    pub contract_bin: PathBuf,

    /// Path to the `osrm-datastore` executable
    pub datastore_bin: PathBuf,

    /// Directory containing the `.lua` routing profiles
    pub profile_dir: PathBuf,
}

impl ToolPaths {
    /// Resolve all tool paths from an installation's library directory.
    ///
    /// The package layout is fixed: executables live under `<lib>/binding`,
    /// profiles under the `profiles` directory next to `<lib>`. Pure path
    /// joining, no existence checks.
    pub fn from_lib_dir(lib_dir: impl Into<PathBuf>) -> Self {
        let lib_dir = lib_dir.into();
        let binding = lib_dir.join("binding");
        let profile_dir = match lib_dir.parent() {
            Some(parent) => parent.join("profiles"),
            None => lib_dir.join("..").join("profiles"),
        };

        Self {
            extract_bin: binding.join(Stage::Extract.tool_name()),
            contract_bin: binding.join(Stage::Contract.tool_name()),
            datastore_bin: binding.join(Stage::Datastore.tool_name()),
            profile_dir,
        }
    }

    /// Locate an installed OSRM package and resolve its tool paths.
    ///
    /// The `OSRM_LIB_DIR` environment variable wins when set; otherwise the
    /// current directory's ancestors are probed for `node_modules/osrm/lib`.
    pub fn discover() -> Result<Self> {
        let start = env::current_dir()?;
        let lib_dir = locate_lib_dir(env::var_os(LIB_DIR_ENV).as_deref(), &start)?;
        Ok(Self::from_lib_dir(lib_dir))
    }

    /// Executable path for a stage
    pub fn tool(&self, stage: Stage) -> &Path {
        match stage {
            Stage::Extract => &self.extract_bin,
            Stage::Contract => &self.contract_bin,
            Stage::Datastore => &self.datastore_bin,
        }
    }

    /// Path of the profile script for `name`, with no existence check
    pub fn profile_script(&self, name: &str) -> PathBuf {
        self.profile_dir
            .join(format!("{name}.{PROFILE_EXTENSION}"))
    }
}

/// Find the library directory from an override or by probing ancestors
fn locate_lib_dir(override_dir: Option<&OsStr>, start: &Path) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        let dir = PathBuf::from(dir);
        if dir.is_dir() {
            return Ok(dir);
        }
        return Err(Error::EngineNotFound(format!(
            "{LIB_DIR_ENV} points at missing directory {}",
            dir.display()
        )));
    }

    for ancestor in start.ancestors() {
        let candidate = ancestor.join("node_modules").join("osrm").join("lib");
        if candidate.is_dir() {
            return Ok(candidate);
        }
    }

    Err(Error::EngineNotFound(format!(
        "no node_modules/osrm/lib above {}",
        start.display()
    )))
}

/// Derive the graph artifact path for an input data file.
///
/// The file name is truncated at its first dot and `.osrm` appended, keeping
/// the directory: `/data/region.osm.pbf` maps to `/data/region.osrm` no
/// matter how many extensions the input carries.
pub fn graph_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();
    input.with_file_name(format!("{stem}.{GRAPH_EXTENSION}"))
}
