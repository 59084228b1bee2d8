//! Focused unit tests covering `routes` configuration and request loading.

use super::helpers::{StraightLineBuilder, Workspace, sample_request, write_utf8};
use super::*;
use crate::routes::{
    RoutesArgs, RoutesConfig, config_from_layers_for_test, load_route_request, load_solstices,
    run_routes_with,
};
use chrono::{NaiveDate, NaiveDateTime};
use luckymap_core::{Gender, GeoPoint, LuckyRouteResponse, RequestError, TravelProfile};
use ortho_config::MergeComposer;
use rstest::{fixture, rstest};
use serde_json::json;
use std::time::Duration;

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

fn departure() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .and_then(|d| d.and_hms_opt(8, 30, 0))
        .expect("valid timestamp")
}

#[rstest]
fn converting_without_request_errors() {
    let err = RoutesConfig::try_from(RoutesArgs::default()).expect_err("missing request");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_ROUTES_REQUEST);
            assert_eq!(env, ENV_ROUTES_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn config_fills_service_defaults(workspace: Workspace) {
    let args = RoutesArgs {
        request_path: Some(workspace.request_path()),
        ..RoutesArgs::default()
    };

    let config = RoutesConfig::try_from(args).expect("config should build");

    assert_eq!(config.osrm_base_url, "https://router.project-osrm.org");
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.solstice_table, None);
}

#[rstest]
fn validate_sources_reports_missing_request(workspace: Workspace) {
    let config = RoutesConfig {
        request_path: workspace.request_path(),
        osrm_base_url: "http://localhost:5000".to_owned(),
        solstice_table: None,
        timeout: Duration::from_secs(1),
    };

    let err = config.validate_sources().expect_err("request is absent");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_ROUTES_REQUEST),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_directory_tables(workspace: Workspace) {
    let request = workspace.write_request(&sample_request());
    let table = workspace.root.join("solstices");
    std::fs::create_dir(&table).expect("create dir");
    let config = RoutesConfig {
        request_path: request,
        osrm_base_url: "http://localhost:5000".to_owned(),
        solstice_table: Some(table.clone()),
        timeout: Duration::from_secs(1),
    };

    let err = config.validate_sources().expect_err("directory is not a table");
    match err {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_SOLSTICE_TABLE);
            assert_eq!(path, table);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn load_route_request_validates_loose_json(workspace: Workspace) {
    let path = workspace.write_request(&sample_request());

    let request = load_route_request(&path).expect("request should load");

    assert_eq!(request.origin, GeoPoint::new(21.0285, 105.8542));
    assert_eq!(request.destination, GeoPoint::new(21.0045, 105.8433));
    assert_eq!(request.birth_year, 1990);
    assert_eq!(request.gender, Gender::Male);
    assert_eq!(request.profile, TravelProfile::Foot);
    assert_eq!(request.local_time, departure());
}

#[rstest]
fn load_route_request_rejects_invalid_json(workspace: Workspace) {
    let path = workspace.request_path();
    write_utf8(&path, b"{ not valid json");

    let err = load_route_request(&path).expect_err("invalid json should error");
    match err {
        CliError::ParseRouteRequest { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ParseRouteRequest, found {other:?}"),
    }
}

#[rstest]
fn load_route_request_reports_missing_fields(workspace: Workspace) {
    let path = workspace.write_request(&json!({
        "origin": {"lat": 21.0285, "lng": 105.8542},
        "birthYear": 1990,
        "gender": "female"
    }));

    let err = load_route_request(&path).expect_err("destination is required");
    match err {
        CliError::InvalidRouteRequest { source, .. } => assert_eq!(
            source,
            RequestError::MissingField {
                field: "destination"
            }
        ),
        other => panic!("expected InvalidRouteRequest, found {other:?}"),
    }
}

#[rstest]
fn load_route_request_io_error_returns_read_error(workspace: Workspace) {
    let path = workspace.request_path();

    let err = load_route_request(&path).expect_err("missing request should error");
    match err {
        CliError::ReadRouteRequest { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ReadRouteRequest, found {other:?}"),
    }
}

#[rstest]
fn load_solstices_computes_table_by_default() {
    let table = load_solstices(None).expect("computed table");
    assert!(table.get(2024).is_some());
    assert!(table.get(1900).is_some());
}

#[rstest]
fn load_solstices_reads_json_tables(workspace: Workspace) {
    let path = workspace.root.join("solstices.json");
    write_utf8(
        &path,
        br#"{"2024": {"summer": {"month": 6, "day": 21}, "winter": {"month": 12, "day": 21}}}"#,
    );

    let table = load_solstices(Some(&path)).expect("table should load");

    assert_eq!(table.len(), 1);
}

#[rstest]
fn load_solstices_rejects_malformed_tables(workspace: Workspace) {
    let path = workspace.root.join("solstices.json");
    write_utf8(&path, b"[1, 2, 3]");

    let err = load_solstices(Some(&path)).expect_err("array is not a table");
    assert!(matches!(err, CliError::ParseSolsticeTable { .. }), "got {err:?}");
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "timeout_secs": "soon" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence(workspace: Workspace) {
    let env_request = workspace.root.join("from-env.json");
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "osrm_base_url": "http://from-file:5000",
            "timeout_secs": 30,
        }),
        None,
    );
    composer.push_environment(json!({
        "request_path": env_request.as_str(),
        "timeout_secs": 20,
    }));
    composer.push_cli(json!({ "timeout_secs": 5 }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");

    assert_eq!(config.request_path, env_request);
    assert_eq!(config.osrm_base_url, "http://from-file:5000");
    assert_eq!(config.timeout, Duration::from_secs(5));
}

#[rstest]
fn run_routes_prints_ranked_routes(workspace: Workspace) {
    let path = workspace.write_request(&sample_request());
    let args = RoutesArgs {
        request_path: Some(path),
        ..RoutesArgs::default()
    };
    let mut stdout = Vec::new();

    run_routes_with(args, &StraightLineBuilder, &mut stdout).expect("command should succeed");

    let text = String::from_utf8(stdout).expect("utf-8 output");
    assert!(text.ends_with('\n'));
    let response: LuckyRouteResponse = serde_json::from_str(&text).expect("JSON response");
    assert_eq!(response.birth_year, 1990);
    assert_eq!(response.nine_qi, 1);
    assert!(!response.routes.is_empty());
    assert!(response.routes.len() <= 5);
    assert!(
        response
            .routes
            .iter()
            .all(|route| (0.0..=100.0).contains(&route.lucky_point))
    );
}
