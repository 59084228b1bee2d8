//! Nominatim `jsonv2` response types.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Output/>

use luckymap_core::{GeoPoint, Place};
use serde::Deserialize;

/// One entry of a `/search` answer.
///
/// Nominatim encodes coordinates as decimal strings.
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub display_name: String,
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl SearchResult {
    /// Convert to a [`Place`], or `None` when the coordinates are malformed.
    pub fn into_place(self) -> Option<Place> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lng = self.lon.trim().parse::<f64>().ok()?;
        Some(Place {
            display_name: self.display_name,
            location: GeoPoint::new(lat, lng),
            category: self.category,
            kind: self.kind,
        })
    }
}

/// A `/reverse` answer.
///
/// Points Nominatim cannot resolve come back as `{"error": "..."}` with a
/// success status, so every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ReverseResult {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn search_result_becomes_place() {
        let json = r#"{
            "place_id": 123,
            "lat": "21.0287747",
            "lon": "105.8524700",
            "category": "natural",
            "type": "water",
            "display_name": "Hồ Hoàn Kiếm, Hà Nội, Việt Nam"
        }"#;

        let result: SearchResult = serde_json::from_str(json).expect("should deserialise");
        let place = result.into_place().expect("coordinates parse");

        assert_eq!(place.display_name, "Hồ Hoàn Kiếm, Hà Nội, Việt Nam");
        assert!((place.location.lat - 21.028_774_7).abs() < 1e-9);
        assert!((place.location.lng - 105.852_47).abs() < 1e-9);
        assert_eq!(place.kind.as_deref(), Some("water"));
    }

    #[rstest]
    fn malformed_coordinates_are_skipped() {
        let result = SearchResult {
            display_name: "Nowhere".to_owned(),
            lat: "north".to_owned(),
            lon: "105.85".to_owned(),
            category: None,
            kind: None,
        };
        assert!(result.into_place().is_none());
    }

    #[rstest]
    fn reverse_error_has_no_name() {
        let result: ReverseResult =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).expect("should deserialise");
        assert!(result.display_name.is_none());
        assert_eq!(result.error.as_deref(), Some("Unable to geocode"));
    }
}
