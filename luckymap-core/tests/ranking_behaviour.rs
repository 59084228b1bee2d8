//! Behavioural tests for ranking route alternatives.

use luckymap_core::{
    CandidateRoute, Direction, RiskDirections, RouteGeometry, ScoredRoute, rank_routes,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

#[fixture]
fn candidates() -> RefCell<Vec<CandidateRoute>> {
    RefCell::new(Vec::new())
}

#[fixture]
fn ranked() -> RefCell<Vec<ScoredRoute>> {
    RefCell::new(Vec::new())
}

fn route(pairs: &[[f64; 2]], distance: f64) -> CandidateRoute {
    CandidateRoute::new(RouteGeometry::from_lon_lat(pairs), distance, 600.0)
}

#[given("eight alternatives where every route appears twice")]
fn given_duplicates(#[from(candidates)] candidates: &RefCell<Vec<CandidateRoute>>) {
    let distinct = [
        route(&[[105.80, 21.00], [105.81, 21.01]], 1_500.0),
        route(&[[105.80, 21.00], [105.82, 21.00]], 2_100.0),
        route(&[[105.80, 21.00], [105.80, 20.99]], 1_100.0),
        route(&[[105.80, 21.00], [105.79, 21.00], [105.79, 21.01]], 2_200.0),
    ];
    let mut all = distinct.to_vec();
    all.extend(distinct);
    *candidates.borrow_mut() = all;
}

#[given("one route heading north and one heading east")]
fn given_north_and_east(#[from(candidates)] candidates: &RefCell<Vec<CandidateRoute>>) {
    *candidates.borrow_mut() = vec![
        route(&[[105.80, 21.00], [105.80, 21.01], [105.80, 21.02]], 0.0),
        route(&[[105.80, 21.00], [105.81, 21.00], [105.82, 21.00]], 0.0),
    ];
}

#[when("the alternatives are ranked against a northern risk")]
fn rank_against_north(
    #[from(candidates)] candidates: &RefCell<Vec<CandidateRoute>>,
    #[from(ranked)] ranked: &RefCell<Vec<ScoredRoute>>,
) {
    let directions = RiskDirections::from_iter([Direction::N]);
    *ranked.borrow_mut() = rank_routes(candidates.take(), &directions);
}

#[then("four routes are kept")]
fn then_four(#[from(ranked)] ranked: &RefCell<Vec<ScoredRoute>>) {
    assert_eq!(ranked.borrow().len(), 4);
}

#[then("the kept routes are numbered from zero")]
fn then_numbered(#[from(ranked)] ranked: &RefCell<Vec<ScoredRoute>>) {
    let indices: Vec<usize> = ranked.borrow().iter().map(|route| route.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}

#[then("the eastbound route is ranked first")]
fn then_east_first(#[from(ranked)] ranked: &RefCell<Vec<ScoredRoute>>) {
    let borrow = ranked.borrow();
    let best = borrow.first().expect("a route was kept");
    let last = best.geometry.last().expect("geometry has points");
    assert!((last.x - 105.82).abs() < 1e-9);
}

#[then("the northbound route keeps a lower score")]
fn then_north_lower(#[from(ranked)] ranked: &RefCell<Vec<ScoredRoute>>) {
    let borrow = ranked.borrow();
    let [east, north] = borrow.as_slice() else {
        panic!("expected two routes, got {}", borrow.len());
    };
    assert!(north.lucky_point < east.lucky_point);
    assert!(north.risk_ratio > east.risk_ratio);
}

#[scenario(path = "tests/features/ranking.feature", index = 0)]
fn duplicates_collapsed(
    candidates: RefCell<Vec<CandidateRoute>>,
    ranked: RefCell<Vec<ScoredRoute>>,
) {
    let _ = (candidates, ranked);
}

#[scenario(path = "tests/features/ranking.feature", index = 1)]
fn risk_ranks_last(candidates: RefCell<Vec<CandidateRoute>>, ranked: RefCell<Vec<ScoredRoute>>) {
    let _ = (candidates, ranked);
}
