//! Error types emitted by the LuckyMap CLI.
//!
//! Collaborator failures during planning and geocoding are absorbed by the
//! library; only configuration, input and output problems end up here.

use std::sync::Arc;

use camino::Utf8PathBuf;
use luckymap_core::{RequestError, SolsticeTableError};
use luckymap_data::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the LuckyMap CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading the route request file failed.
    #[error("failed to read route request at {path:?}: {source}")]
    ReadRouteRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The route request file is not valid JSON.
    #[error("failed to parse route request JSON at {path:?}: {source}")]
    ParseRouteRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Decoding error.
        #[source]
        source: serde_json::Error,
    },
    /// The route request decoded but failed validation.
    #[error("route request in {path:?} is invalid: {source}")]
    InvalidRouteRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Validation error.
        #[source]
        source: RequestError,
    },
    /// Reading the solstice table failed.
    #[error("failed to read solstice table at {path:?}: {source}")]
    ReadSolsticeTable {
        /// Table path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The solstice table could not be decoded.
    #[error("solstice table at {path:?} is invalid: {source}")]
    ParseSolsticeTable {
        /// Table path.
        path: Utf8PathBuf,
        /// Decoding error.
        #[source]
        source: SolsticeTableError,
    },
    /// Constructing an HTTP collaborator failed.
    #[error("failed to build client for {base_url:?}: {source}")]
    BuildProvider {
        /// Configured base URL.
        base_url: String,
        /// Construction error.
        #[source]
        source: ProviderBuildError,
    },
    /// Starting the async runtime failed.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
