//! `routes` command: score and rank route alternatives for a request file.

use std::io::Write;
use std::ops::RangeInclusive;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use luckymap_core::{
    LuckyRoutePlanner, LuckyRouteQuery, LuckyRouteRequest, LuckyRouteResponse, RouteProvider,
    SolsticeTable, vietnam_now,
};
use luckymap_data::DEFAULT_TIMEOUT;
use luckymap_data::routing::{DEFAULT_OSRM_BASE_URL, HttpRouteProvider, HttpRouteProviderConfig};
use luckymap_fs::read_utf8_to_string;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_OSRM_BASE_URL, ARG_ROUTES_REQUEST, ARG_SOLSTICE_TABLE, ARG_TIMEOUT_SECS, CliError,
    ENV_ROUTES_REQUEST, build_runtime, write_json,
};

/// Years covered by the computed solstice table used when no file is given.
const APPROXIMATE_SOLSTICE_YEARS: RangeInclusive<i32> = 1900..=2100;

/// CLI arguments for the `routes` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score route alternatives between two points for a traveller. \
                 The request is a JSON body with origin, destination, \
                 birthYear, gender, and optional vehicle and datetime fields. \
                 Routes come from an OSRM route service.",
    about = "Rank routes by flying-star risk"
)]
#[ortho_config(prefix = "LUCKYMAP")]
pub(crate) struct RoutesArgs {
    /// Path to a JSON file containing the route request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// JSON table of solstice days per year; computed when omitted.
    #[arg(long = ARG_SOLSTICE_TABLE, value_name = "path")]
    #[serde(default)]
    pub(crate) solstice_table: Option<Utf8PathBuf>,
    /// Routing request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl RoutesArgs {
    pub(crate) fn into_config(self) -> Result<RoutesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RoutesConfig::try_from(merged)
    }
}

/// Resolved `routes` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoutesConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) osrm_base_url: String,
    pub(crate) solstice_table: Option<Utf8PathBuf>,
    pub(crate) timeout: Duration,
}

impl RoutesConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_ROUTES_REQUEST)?;
        if let Some(table) = &self.solstice_table {
            require_existing(table, ARG_SOLSTICE_TABLE)?;
        }
        Ok(())
    }
}

impl TryFrom<RoutesArgs> for RoutesConfig {
    type Error = CliError;

    fn try_from(args: RoutesArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_ROUTES_REQUEST,
            env: ENV_ROUTES_REQUEST,
        })?;
        Ok(Self {
            request_path,
            osrm_base_url: args
                .osrm_base_url
                .unwrap_or_else(|| DEFAULT_OSRM_BASE_URL.to_owned()),
            solstice_table: args.solstice_table,
            timeout: args
                .timeout_secs
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
        })
    }
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match luckymap_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Builds the routing service for the current `routes` invocation.
pub(crate) trait RouteProviderBuilder {
    type Provider: RouteProvider;

    fn build(&self, config: &RoutesConfig) -> Result<Self::Provider, CliError>;
}

pub(crate) struct OsrmProviderBuilder;

impl RouteProviderBuilder for OsrmProviderBuilder {
    type Provider = HttpRouteProvider;

    fn build(&self, config: &RoutesConfig) -> Result<Self::Provider, CliError> {
        let provider_config =
            HttpRouteProviderConfig::new(config.osrm_base_url.clone()).with_timeout(config.timeout);
        HttpRouteProvider::with_config(provider_config).map_err(|source| {
            CliError::BuildProvider {
                base_url: config.osrm_base_url.clone(),
                source,
            }
        })
    }
}

pub(crate) fn run_routes(args: RoutesArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_routes_with(args, &OsrmProviderBuilder, &mut stdout)
}

pub(crate) fn run_routes_with<B: RouteProviderBuilder>(
    args: RoutesArgs,
    builder: &B,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let response = execute_routes(args, builder)?;
    write_json(writer, &response)
}

fn execute_routes<B: RouteProviderBuilder>(
    args: RoutesArgs,
    builder: &B,
) -> Result<LuckyRouteResponse, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let request = load_route_request(&config.request_path)?;
    let solstices = load_solstices(config.solstice_table.as_deref())?;
    let planner = LuckyRoutePlanner::new(builder.build(&config)?, solstices);
    let runtime = build_runtime()?;
    let response = runtime.block_on(planner.plan(&request));
    log::debug!(
        "ranked {} routes for birth year {} (nine qi {}, centre {})",
        response.routes.len(),
        response.birth_year,
        response.nine_qi,
        response.center
    );
    Ok(response)
}

/// Load and validate a JSON route request.
///
/// A missing or unparsable `datetime` falls back to the current Vietnam time.
pub(crate) fn load_route_request(path: &Utf8Path) -> Result<LuckyRouteRequest, CliError> {
    let body = read_utf8_to_string(path).map_err(|source| CliError::ReadRouteRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let query: LuckyRouteQuery =
        serde_json::from_str(&body).map_err(|source| CliError::ParseRouteRequest {
            path: path.to_path_buf(),
            source,
        })?;
    LuckyRouteRequest::from_query(query, vietnam_now()).map_err(|source| {
        CliError::InvalidRouteRequest {
            path: path.to_path_buf(),
            source,
        }
    })
}

pub(crate) fn load_solstices(path: Option<&Utf8Path>) -> Result<SolsticeTable, CliError> {
    let Some(table_path) = path else {
        return Ok(SolsticeTable::approximate(APPROXIMATE_SOLSTICE_YEARS));
    };
    let body = read_utf8_to_string(table_path).map_err(|source| CliError::ReadSolsticeTable {
        path: table_path.to_path_buf(),
        source,
    })?;
    SolsticeTable::from_json_str(&body).map_err(|source| CliError::ParseSolsticeTable {
        path: table_path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RoutesConfig, CliError> {
    let merged = RoutesArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RoutesConfig::try_from(merged)
}
