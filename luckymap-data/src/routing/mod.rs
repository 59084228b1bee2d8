//! HTTP route provider backed by an OSRM route service.
//!
//! This module provides [`HttpRouteProvider`], an implementation of
//! [`luckymap_core::RouteProvider`] that requests route alternatives with
//! GeoJSON geometries from the OSRM Route API.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use luckymap_core::{GeoPoint, RouteProvider, TravelProfile};
//! use luckymap_data::routing::{HttpRouteProvider, HttpRouteProviderConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpRouteProviderConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(5))
//!     .with_user_agent("my-app/1.0");
//! let provider = HttpRouteProvider::with_config(config)?;
//!
//! let waypoints = [GeoPoint::new(21.0285, 105.8542), GeoPoint::new(21.0368, 105.8342)];
//! let routes = provider.fetch_routes(TravelProfile::Driving, &waypoints).await?;
//! println!("{} alternatives", routes.len());
//! # Ok(())
//! # }
//! ```

mod osrm;
mod provider;

pub use provider::{DEFAULT_OSRM_BASE_URL, HttpRouteProvider, HttpRouteProviderConfig};
