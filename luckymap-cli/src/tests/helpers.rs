//! Temporary workspaces and stub collaborators for CLI tests.

use camino::{Utf8Path, Utf8PathBuf};
use luckymap_core::test_support::{StubGeocoder, StubRouteProvider};
use serde_json::json;
use tempfile::TempDir;

use crate::geocode::{GeocoderBuilder, GeocoderSettings};
use crate::routes::{RouteProviderBuilder, RoutesConfig};
use crate::CliError;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write test file");
}

/// Temporary directory holding request and solstice files.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    pub(super) root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn request_path(&self) -> Utf8PathBuf {
        self.root.join("request.json")
    }

    pub(super) fn write_request(&self, body: &serde_json::Value) -> Utf8PathBuf {
        let path = self.request_path();
        let payload = serde_json::to_string_pretty(body).expect("serialise request");
        write_utf8(&path, payload.as_bytes());
        path
    }
}

/// A walk across Hoàn Kiếm for a traveller born in 1990.
pub(super) fn sample_request() -> serde_json::Value {
    json!({
        "origin": {"lat": 21.0285, "lng": 105.8542},
        "destination": {"lat": "21.0045", "lng": "105.8433"},
        "birthYear": 1990,
        "gender": "male",
        "vehicle": "foot",
        "datetime": "2024-06-15T08:30"
    })
}

/// Route builder answering every variant with a straight line.
pub(super) struct StraightLineBuilder;

impl RouteProviderBuilder for StraightLineBuilder {
    type Provider = StubRouteProvider;

    fn build(&self, _config: &RoutesConfig) -> Result<Self::Provider, CliError> {
        Ok(StubRouteProvider::straight_lines())
    }
}

/// Geocoder builder returning a fixed in-memory geocoder.
pub(super) struct StubGeocoderBuilder {
    pub(super) places: Vec<luckymap_core::Place>,
    pub(super) address: Option<String>,
}

impl GeocoderBuilder for StubGeocoderBuilder {
    type Geocoder = StubGeocoder;

    fn build(&self, _settings: &GeocoderSettings) -> Result<Self::Geocoder, CliError> {
        Ok(StubGeocoder::new(self.places.clone(), self.address.clone()))
    }
}
