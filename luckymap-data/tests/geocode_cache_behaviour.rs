//! Behavioural tests for [`CachedGeocoder`].
//!
//! These use the in-memory `StubGeocoder` so cache hits can be counted
//! without a running Nominatim server.

use luckymap_core::test_support::StubGeocoder;
use luckymap_core::{GeoPoint, GeocodeError, Place};
use luckymap_data::geocoding::CachedGeocoder;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

type GeocoderCell = RefCell<Option<CachedGeocoder<StubGeocoder>>>;
type AnswersCell = RefCell<Vec<Vec<Place>>>;

#[fixture]
fn geocoder() -> GeocoderCell {
    RefCell::new(None)
}

#[fixture]
fn answers() -> AnswersCell {
    RefCell::new(Vec::new())
}

// --- Given steps ---

#[given("a geocoder that knows the Hoan Kiem lake")]
fn geocoder_knows_lake(#[from(geocoder)] geocoder: &GeocoderCell) {
    let lake = Place {
        display_name: "Hồ Hoàn Kiếm, Hà Nội, Việt Nam".to_owned(),
        location: GeoPoint::new(21.0288, 105.8525),
        category: Some("natural".to_owned()),
        kind: Some("water".to_owned()),
    };
    *geocoder.borrow_mut() = Some(CachedGeocoder::new(StubGeocoder::new(vec![lake], None)));
}

#[given("a geocoder that fails with a timeout")]
fn geocoder_times_out(#[from(geocoder)] geocoder: &GeocoderCell) {
    *geocoder.borrow_mut() = Some(CachedGeocoder::new(StubGeocoder::failing(
        GeocodeError::Timeout {
            url: "http://nominatim.invalid/search".to_owned(),
            timeout_secs: 10,
        },
    )));
}

// --- When steps ---

#[when("I search for {query} twice")]
fn search_twice(
    #[from(geocoder)] geocoder: &GeocoderCell,
    #[from(answers)] answers: &AnswersCell,
    query: String,
) {
    let guard = geocoder.borrow();
    let cached = guard.as_ref().expect("geocoder must be initialised");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime should build");
    let term = query.trim_matches('"');
    for _ in 0..2 {
        let places = runtime.block_on(cached.search(term));
        answers.borrow_mut().push(places);
    }
}

// --- Then steps ---

#[then("every search returns one place")]
fn then_one_place(#[from(answers)] answers: &AnswersCell) {
    let borrowed = answers.borrow();
    assert!(!borrowed.is_empty(), "no searches were made");
    assert!(borrowed.iter().all(|places| places.len() == 1), "got {borrowed:?}");
}

#[then("every search returns no places")]
fn then_no_places(#[from(answers)] answers: &AnswersCell) {
    let borrowed = answers.borrow();
    assert!(!borrowed.is_empty(), "no searches were made");
    assert!(borrowed.iter().all(Vec::is_empty), "got {borrowed:?}");
}

#[then("the geocoder lookup count is {count}")]
fn then_lookups(#[from(geocoder)] geocoder: &GeocoderCell, count: usize) {
    let guard = geocoder.borrow();
    let cached = guard.as_ref().expect("geocoder must be initialised");
    assert_eq!(cached.inner().lookups(), count);
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/geocode_cache.feature", name = $title)]
        fn $fn_name(geocoder: GeocoderCell, answers: AnswersCell) {
            let _ = (geocoder, answers);
        }
    };
}

register_scenario!(
    repeated_searches_hit_cache,
    "Repeated searches reuse the cached answer"
);
register_scenario!(
    short_queries_skip_geocoder,
    "Short queries never reach the geocoder"
);
register_scenario!(
    failures_are_absorbed,
    "Geocoder failures are absorbed and retried"
);
