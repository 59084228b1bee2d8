//! `geocode` and `reverse` commands: place search and reverse geocoding.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use luckymap_core::{GeoPoint, Geocoder};
use luckymap_data::DEFAULT_TIMEOUT;
use luckymap_data::geocoding::{
    CachedGeocoder, DEFAULT_NOMINATIM_BASE_URL, NominatimGeocoder, NominatimGeocoderConfig,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_GEOCODE_QUERY, ARG_NOMINATIM_BASE_URL, ARG_REVERSE_LAT, ARG_REVERSE_LNG,
    ARG_TIMEOUT_SECS, CliError, ENV_GEOCODE_QUERY, ENV_REVERSE_LAT, ENV_REVERSE_LNG,
    build_runtime, write_json,
};

/// CLI arguments for the `geocode` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Search places through a Nominatim server. Queries shorter \
                 than three characters and failed lookups print an empty list.",
    about = "Search places by free text"
)]
#[ortho_config(prefix = "LUCKYMAP")]
pub(crate) struct GeocodeArgs {
    /// Free-text place query.
    #[arg(value_name = "query")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Base URL for the Nominatim server.
    #[arg(long = ARG_NOMINATIM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_base_url: Option<String>,
    /// Geocoding request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

/// CLI arguments for the `reverse` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Look up the address of a coordinate through a Nominatim \
                 server. Failed lookups print a null address.",
    about = "Look up the address at a coordinate"
)]
#[ortho_config(prefix = "LUCKYMAP")]
pub(crate) struct ReverseArgs {
    /// Latitude in degrees.
    #[arg(long = ARG_REVERSE_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude in degrees.
    #[arg(long = ARG_REVERSE_LNG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Base URL for the Nominatim server.
    #[arg(long = ARG_NOMINATIM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_base_url: Option<String>,
    /// Geocoding request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

/// Geocoding service settings shared by both commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GeocoderSettings {
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
}

impl GeocoderSettings {
    fn resolve(
        base_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_NOMINATIM_BASE_URL.to_owned()),
            timeout: timeout_secs.map_or(DEFAULT_TIMEOUT, Duration::from_secs),
        }
    }
}

/// Resolved `geocode` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GeocodeConfig {
    pub(crate) query: String,
    pub(crate) settings: GeocoderSettings,
}

impl TryFrom<GeocodeArgs> for GeocodeConfig {
    type Error = CliError;

    fn try_from(args: GeocodeArgs) -> Result<Self, Self::Error> {
        let query = args.query.ok_or(CliError::MissingArgument {
            field: ARG_GEOCODE_QUERY,
            env: ENV_GEOCODE_QUERY,
        })?;
        Ok(Self {
            query,
            settings: GeocoderSettings::resolve(
                args.nominatim_base_url,
                args.timeout_secs,
            ),
        })
    }
}

/// Resolved `reverse` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReverseConfig {
    pub(crate) point: GeoPoint,
    pub(crate) settings: GeocoderSettings,
}

impl TryFrom<ReverseArgs> for ReverseConfig {
    type Error = CliError;

    fn try_from(args: ReverseArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_REVERSE_LAT,
            env: ENV_REVERSE_LAT,
        })?;
        let lng = args.lng.ok_or(CliError::MissingArgument {
            field: ARG_REVERSE_LNG,
            env: ENV_REVERSE_LNG,
        })?;
        Ok(Self {
            point: GeoPoint::new(lat, lng),
            settings: GeocoderSettings::resolve(
                args.nominatim_base_url,
                args.timeout_secs,
            ),
        })
    }
}

/// Output of the `reverse` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ReverseOutput {
    pub(crate) location: GeoPoint,
    pub(crate) address: Option<String>,
}

/// Builds the geocoding service for the current invocation.
pub(crate) trait GeocoderBuilder {
    type Geocoder: Geocoder;

    fn build(&self, settings: &GeocoderSettings) -> Result<Self::Geocoder, CliError>;
}

pub(crate) struct NominatimBuilder;

impl GeocoderBuilder for NominatimBuilder {
    type Geocoder = NominatimGeocoder;

    fn build(&self, settings: &GeocoderSettings) -> Result<Self::Geocoder, CliError> {
        let config = NominatimGeocoderConfig::new(settings.base_url.clone())
            .with_timeout(settings.timeout);
        NominatimGeocoder::with_config(config).map_err(|source| CliError::BuildProvider {
            base_url: settings.base_url.clone(),
            source,
        })
    }
}

fn cached<B: GeocoderBuilder>(
    builder: &B,
    settings: &GeocoderSettings,
) -> Result<CachedGeocoder<B::Geocoder>, CliError> {
    Ok(CachedGeocoder::new(builder.build(settings)?))
}

pub(crate) fn run_geocode(args: GeocodeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_geocode_with(args, &NominatimBuilder, &mut stdout)
}

pub(crate) fn run_geocode_with<B: GeocoderBuilder>(
    args: GeocodeArgs,
    builder: &B,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = GeocodeConfig::try_from(merged)?;
    let geocoder = cached(builder, &config.settings)?;
    let places = build_runtime()?.block_on(geocoder.search(&config.query));
    write_json(writer, &places)
}

pub(crate) fn run_reverse(args: ReverseArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_reverse_with(args, &NominatimBuilder, &mut stdout)
}

pub(crate) fn run_reverse_with<B: GeocoderBuilder>(
    args: ReverseArgs,
    builder: &B,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = ReverseConfig::try_from(merged)?;
    let geocoder = cached(builder, &config.settings)?;
    let address = build_runtime()?.block_on(geocoder.reverse(config.point));
    write_json(
        writer,
        &ReverseOutput {
            location: config.point,
            address,
        },
    )
}

#[cfg(test)]
pub(crate) fn geocode_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<GeocodeConfig, CliError> {
    let merged = GeocodeArgs::merge_from_layers(layers).map_err(CliError::from)?;
    GeocodeConfig::try_from(merged)
}
