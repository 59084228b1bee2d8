//! Command-line interface for the LuckyMap engine.
//!
//! - `routes` scores route alternatives for a JSON request file.
//! - `geocode` searches places by free text.
//! - `reverse` looks up the address at a coordinate.
//!
//! Options layer defaults, configuration files, `LUCKYMAP_*` environment
//! variables and flags through `ortho_config`. Results are printed as pretty
//! JSON on stdout.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;

mod error;
mod geocode;
mod routes;

pub use error::CliError;

use geocode::{GeocodeArgs, ReverseArgs};
use routes::RoutesArgs;

const ARG_ROUTES_REQUEST: &str = "request";
const ENV_ROUTES_REQUEST: &str = "LUCKYMAP_CMDS_ROUTES_REQUEST_PATH";
const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_SOLSTICE_TABLE: &str = "solstice-table";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_NOMINATIM_BASE_URL: &str = "nominatim-base-url";
const ARG_GEOCODE_QUERY: &str = "query";
const ENV_GEOCODE_QUERY: &str = "LUCKYMAP_CMDS_GEOCODE_QUERY";
const ARG_REVERSE_LAT: &str = "lat";
const ENV_REVERSE_LAT: &str = "LUCKYMAP_CMDS_REVERSE_LAT";
const ARG_REVERSE_LNG: &str = "lng";
const ENV_REVERSE_LNG: &str = "LUCKYMAP_CMDS_REVERSE_LNG";

/// Run the LuckyMap CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] when arguments or configuration are invalid, an
/// input file cannot be used, or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Routes(args) => routes::run_routes(args),
        Command::Geocode(args) => geocode::run_geocode(args),
        Command::Reverse(args) => geocode::run_reverse(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "luckymap",
    about = "Rank routes by flying-star risk and look up places",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score and rank route alternatives for a request file.
    Routes(RoutesArgs),
    /// Search places matching a free-text query.
    Geocode(GeocodeArgs),
    /// Look up the address at a coordinate.
    Reverse(ReverseArgs),
}

/// Single-threaded runtime for one command invocation.
fn build_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
