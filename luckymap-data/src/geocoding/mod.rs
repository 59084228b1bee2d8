//! Nominatim-backed place search and reverse geocoding.
//!
//! [`NominatimGeocoder`] talks to the Nominatim HTTP API and reports every
//! failure. [`CachedGeocoder`] wraps any [`Geocoder`](luckymap_core::Geocoder)
//! with a short-lived cache and turns failures into empty answers, which is
//! what autocompletion endpoints want.
//!
//! # Examples
//!
//! ```no_run
//! use luckymap_data::geocoding::{CachedGeocoder, NominatimGeocoder};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let geocoder = CachedGeocoder::new(NominatimGeocoder::new(
//!     "https://nominatim.openstreetmap.org",
//! )?);
//! let places = geocoder.search("Hồ Gươm").await;
//! for place in places {
//!     println!("{}", place.display_name);
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod nominatim;
mod provider;

pub use cache::{CACHE_CAPACITY, CACHE_TTL, CachedGeocoder, GeocodeCache};
pub use provider::{DEFAULT_NOMINATIM_BASE_URL, NominatimGeocoder, NominatimGeocoderConfig};
