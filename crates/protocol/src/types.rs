use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
///
/// Serialized as a two-element `[lat, lng]` array, the shape map libraries
/// accept directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

/// Axis-aligned bounding box over a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: Coords,
    pub north_east: Coords,
}

impl Bounds {
    /// Smallest box containing every coordinate, or `None` for an empty set.
    pub fn enclosing<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coords>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            south_west: first,
            north_east: first,
        };
        for c in iter {
            bounds.south_west.lat = bounds.south_west.lat.min(c.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(c.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(c.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(c.lng);
        }
        Some(bounds)
    }

    pub fn contains(&self, c: Coords) -> bool {
        c.lat >= self.south_west.lat
            && c.lat <= self.north_east.lat
            && c.lng >= self.south_west.lng
            && c.lng <= self.north_east.lng
    }

    pub fn center(&self) -> Coords {
        Coords {
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
            lng: (self.south_west.lng + self.north_east.lng) / 2.0,
        }
    }
}
