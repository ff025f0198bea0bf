//! Stage execution for the osrm-pipeline library
//!
//! Spawns the external OSRM tools, forwards their output streams to
//! caller-supplied sinks while they run, and turns exit codes into typed
//! results.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use log::debug;
use tokio::io::AsyncRead;
use tokio::process::Command;

use crate::core::error::{Error, Result};
use crate::core::sink::{forward, StageOptions, StageSink};
use crate::core::toolset::{graph_path, Stage, ToolPaths, PROFILE_EXTENSION};

/// Pipe a stream only when someone is listening, otherwise drop it
fn pipe_or_null(wanted: bool) -> Stdio {
    if wanted {
        Stdio::piped()
    } else {
        Stdio::null()
    }
}

/// Drain an optional pipe into an optional sink
async fn forward_piped(
    pipe: Option<impl AsyncRead + Unpin>,
    sink: Option<StageSink>,
    buffer_size: usize,
) -> std::io::Result<u64> {
    match (pipe, sink) {
        (Some(reader), Some(sink)) => forward(reader, sink, buffer_size).await,
        _ => Ok(0),
    }
}

/// High-level driver for the OSRM preprocessing stages
///
/// Holds only the resolved tool locations; every invocation is a pure
/// function of its arguments, so one `Pipeline` can serve any number of
/// concurrent stage runs.
pub struct Pipeline {
    tools: ToolPaths,
}

impl Pipeline {
    /// Create a pipeline over a discovered OSRM installation
    pub fn new() -> Result<Self> {
        Ok(Self {
            tools: ToolPaths::discover()?,
        })
    }

    /// Create a pipeline over explicitly provided tool locations
    pub fn with_tools(tools: ToolPaths) -> Self {
        Self { tools }
    }

    /// The resolved tool locations this pipeline invokes
    pub fn tools(&self) -> &ToolPaths {
        &self.tools
    }

    /// List the routing profiles available to the extraction stage.
    ///
    /// Scans the profile directory for `.lua` scripts and strips the
    /// extension. Order follows filesystem enumeration order.
    pub async fn profile_names(&self) -> Result<Vec<String>> {
        let dir = &self.tools.profile_dir;
        let read_error = |source| Error::ProfileDir {
            path: dir.clone(),
            source,
        };

        debug!("scanning profile directory {}", dir.display());
        let mut entries = tokio::fs::read_dir(dir).await.map_err(read_error)?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PROFILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        Ok(names)
    }

    /// Extract a routing graph from raw map data using a named profile.
    ///
    /// Spawns `osrm-extract -p <profile_dir>/<profile>.lua <input>` and
    /// resolves to the derived `.osrm` graph path next to the input. The
    /// profile script is not checked here; a missing one surfaces as an
    /// extractor failure.
    pub async fn extract(
        &self,
        input: impl AsRef<Path>,
        profile: &str,
        options: StageOptions,
    ) -> Result<PathBuf> {
        let input = input.as_ref();
        let args = vec![
            OsString::from("-p"),
            self.tools.profile_script(profile).into_os_string(),
            input.as_os_str().to_os_string(),
        ];

        self.run_stage(Stage::Extract, args, input, graph_path(input), options)
            .await
    }

    /// Build the contraction hierarchy over an extracted graph.
    ///
    /// Spawns `osrm-contract <graph>`. Contraction rewrites the graph file
    /// set in place, so the resolved path equals the input.
    pub async fn contract(
        &self,
        graph: impl AsRef<Path>,
        options: StageOptions,
    ) -> Result<PathBuf> {
        let graph = graph.as_ref();
        let args = vec![graph.as_os_str().to_os_string()];

        self.run_stage(Stage::Contract, args, graph, graph.to_path_buf(), options)
            .await
    }

    /// Publish a prepared graph into the shared datastore.
    ///
    /// Spawns `osrm-datastore <graph>` and resolves to the unchanged graph
    /// path. Re-running replaces the previous datastore contents.
    pub async fn datastore(
        &self,
        graph: impl AsRef<Path>,
        options: StageOptions,
    ) -> Result<PathBuf> {
        let graph = graph.as_ref();
        let args = vec![graph.as_os_str().to_os_string()];

        self.run_stage(Stage::Datastore, args, graph, graph.to_path_buf(), options)
            .await
    }

    /// Spawn one stage tool and settle on its exit.
    ///
    /// stdin is always closed. Each output stream is piped only when the
    /// caller supplied a sink for it and drained while the child runs, so a
    /// chatty tool can never fill a pipe and stall.
    async fn run_stage(
        &self,
        stage: Stage,
        args: Vec<OsString>,
        input: &Path,
        output: PathBuf,
        options: StageOptions,
    ) -> Result<PathBuf> {
        let program = self.tools.tool(stage);
        let StageOptions {
            stdout,
            stderr,
            buffer_size,
        } = options;

        let mut command = Command::new(program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(pipe_or_null(stdout.is_some()))
            .stderr(pipe_or_null(stderr.is_some()));

        debug!("spawning {} for {}", program.display(), input.display());
        let started = Instant::now();

        let mut child = command.spawn().map_err(|source| Error::Spawn {
            stage,
            program: program.to_path_buf(),
            source,
        })?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        let (status, stdout_done, stderr_done) = tokio::join!(
            child.wait(),
            forward_piped(stdout_pipe, stdout, buffer_size),
            forward_piped(stderr_pipe, stderr, buffer_size),
        );
        let status = status?;

        match status.code() {
            Some(0) => {
                let forwarded = stdout_done? + stderr_done?;
                debug!(
                    "{stage} finished in {:.1}s, {forwarded} output bytes forwarded",
                    started.elapsed().as_secs_f64()
                );
                Ok(output)
            }
            code => Err(Error::StageFailed {
                stage,
                input: input.to_path_buf(),
                code,
            }),
        }
    }
}
