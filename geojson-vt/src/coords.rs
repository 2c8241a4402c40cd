//! Provides utilities related to tile coordinates and bounding boxes.

use std::{
    fmt,
    fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

pub const EXTENT_UINT: u32 = 4096;
pub const EXTENT_SINT: i32 = EXTENT_UINT as i32;

/// Number of tiles along one axis at zoom level `z`, i.e. `2^z`.
pub fn zoom_factor(z: u8) -> f64 {
    2f64.powi(i32::from(z))
}

/// Every tile has tile coordinates. These tile coordinates are also called
/// [Slippy map tilenames](https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames).
///
/// # Coordinate System Origin
///
/// The origin of the coordinate system is in the upper-left corner, matching normalized
/// mercator space where `(0, 0)` is the north-west corner of the world.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct TileCoords {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoords {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { x, y, z }
    }

    pub fn zoom_factor(&self) -> f64 {
        zoom_factor(self.z)
    }
}

impl From<(u8, u32, u32)> for TileCoords {
    fn from(tuple: (u8, u32, u32)) -> Self {
        TileCoords::new(tuple.0, tuple.1, tuple.2)
    }
}

impl Display for TileCoords {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// An axis aligned box in normalized mercator space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    /// Inverted box lying outside of `[0, 1]`. Extending it with any valid box yields that box.
    pub const EMPTY: BBox = BBox {
        min_x: 2.0,
        min_y: 1.0,
        max_x: -1.0,
        max_y: 0.0,
    };

    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing all `points`. Returns [`BBox::EMPTY`] for no points.
    pub fn from_points<I: IntoIterator<Item = [f64; 2]>>(points: I) -> Self {
        let mut iter = points.into_iter();
        let Some([x, y]) = iter.next() else {
            return BBox::EMPTY;
        };
        iter.fold(BBox::new(x, y, x, y), |mut bbox, [x, y]| {
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
            bbox
        })
    }

    pub fn extend(&mut self, other: &BBox) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }
}

impl Default for BBox {
    fn default() -> Self {
        BBox::EMPTY
    }
}
