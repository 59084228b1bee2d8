//! The eight compass directions and the palace lookup of the flying-star ring.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the eight compass directions a route segment can face.
///
/// Serialises as the compass abbreviation (`"N"`, `"NE"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// North, 0°.
    N,
    /// North-east, 45°.
    NE,
    /// East, 90°.
    E,
    /// South-east, 135°.
    SE,
    /// South, 180°.
    S,
    /// South-west, 225°.
    SW,
    /// West, 270°.
    W,
    /// North-west, 315°.
    NW,
}

impl Direction {
    /// All directions in clockwise order from north.
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    /// Compass angle in degrees, clockwise from north.
    ///
    /// # Examples
    /// ```
    /// use luckymap_core::Direction;
    ///
    /// assert_eq!(Direction::SW.angle(), 225.0);
    /// ```
    #[must_use]
    pub const fn angle(self) -> f64 {
        match self {
            Self::N => 0.0,
            Self::NE => 45.0,
            Self::E => 90.0,
            Self::SE => 135.0,
            Self::S => 180.0,
            Self::SW => 225.0,
            Self::W => 270.0,
            Self::NW => 315.0,
        }
    }

    /// Map a position of the flying-star ring to its palace direction.
    ///
    /// Position 0 is the centre palace and 9 is outside the ring; neither
    /// has a direction.
    #[must_use]
    pub const fn from_ring_position(position: usize) -> Option<Self> {
        match position {
            1 => Some(Self::NW),
            2 => Some(Self::W),
            3 => Some(Self::NE),
            4 => Some(Self::S),
            5 => Some(Self::N),
            6 => Some(Self::SW),
            7 => Some(Self::E),
            8 => Some(Self::SE),
            _ => None,
        }
    }

    /// Vietnamese display name.
    #[must_use]
    pub const fn vietnamese_name(self) -> &'static str {
        match self {
            Self::N => "Bắc",
            Self::NE => "Đông Bắc",
            Self::E => "Đông",
            Self::SE => "Đông Nam",
            Self::S => "Nam",
            Self::SW => "Tây Nam",
            Self::W => "Tây",
            Self::NW => "Tây Bắc",
        }
    }

    /// Compass abbreviation.
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Deduplicated, insertion-ordered set of at most four risk directions.
///
/// # Examples
/// ```
/// use luckymap_core::{Direction, RiskDirections};
///
/// let set = RiskDirections::from_iter([Direction::N, Direction::S, Direction::N]);
/// assert_eq!(set.as_slice(), &[Direction::N, Direction::S]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskDirections(Vec<Direction>);

impl RiskDirections {
    /// Most directions a reading can flag.
    pub const MAX_LEN: usize = 4;

    /// An empty set; every bearing carries zero risk against it.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Insert a direction unless it is already present or the set is full.
    pub fn insert(&mut self, direction: Direction) {
        if self.0.len() < Self::MAX_LEN && !self.0.contains(&direction) {
            self.0.push(direction);
        }
    }

    /// Directions in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Direction] {
        &self.0
    }

    /// Iterate over the directions.
    pub fn iter(&self) -> std::slice::Iter<'_, Direction> {
        self.0.iter()
    }

    /// Number of directions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no direction is flagged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Direction> for RiskDirections {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = Self::empty();
        for direction in iter {
            set.insert(direction);
        }
        set
    }
}

impl<'a> IntoIterator for &'a RiskDirections {
    type Item = &'a Direction;
    type IntoIter = std::slice::Iter<'a, Direction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn ring_positions_cover_eight_distinct_directions() {
        let mapped: Vec<Direction> = (1..=8).filter_map(Direction::from_ring_position).collect();
        assert_eq!(mapped.len(), 8);
        for direction in Direction::ALL {
            assert!(mapped.contains(&direction), "{direction} is unmapped");
        }
    }

    #[rstest]
    #[case(0)]
    #[case(9)]
    #[case(42)]
    fn ring_positions_outside_palaces_have_no_direction(#[case] position: usize) {
        assert_eq!(Direction::from_ring_position(position), None);
    }

    #[rstest]
    fn serialises_as_abbreviation() {
        let json = serde_json::to_string(&RiskDirections::from_iter([Direction::NW, Direction::E]))
            .expect("serialise directions");
        assert_eq!(json, r#"["NW","E"]"#);
    }

    #[rstest]
    fn set_is_capped_at_four() {
        let set = RiskDirections::from_iter(Direction::ALL);
        assert_eq!(set.len(), RiskDirections::MAX_LEN);
        assert_eq!(
            set.as_slice(),
            &[Direction::N, Direction::NE, Direction::E, Direction::SE]
        );
    }

    #[rstest]
    fn vietnamese_names_match_palaces() {
        assert_eq!(Direction::NW.vietnamese_name(), "Tây Bắc");
        assert_eq!(Direction::SE.vietnamese_name(), "Đông Nam");
    }
}
