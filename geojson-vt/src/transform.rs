//! Projection of tiles from normalized mercator space into tile-local pixel space.

use crate::{coords::zoom_factor, tile::Tile};

/// Projects the normalized coordinates of all features of `tile` into `extent x extent` tile
/// space. The tile is modified in place and returned for chaining.
///
/// Only the first call has an effect, later calls return the tile unchanged.
pub fn transform_tile(tile: &mut Tile, extent: u32) -> &mut Tile {
    if tile.is_transformed() {
        return tile;
    }

    let z2 = zoom_factor(tile.z());
    let tx = tile.x();
    let ty = tile.y();

    for feature in tile.features_mut() {
        feature.project(|[x, y]| transform_point(x, y, extent, z2, tx, ty));
    }
    tile.mark_transformed();

    log::trace!("tile {} transformed to extent {}", tile.coords(), extent);

    tile
}

impl Tile {
    /// Consuming variant of [`transform_tile`].
    pub fn into_transformed(mut self, extent: u32) -> Tile {
        transform_tile(&mut self, extent);
        self
    }
}

/// Projects the normalized point `(x, y)` into the space of tile `(tx, ty)` at a zoom with
/// `z2` tiles per axis.
pub fn transform_point(x: f64, y: f64, extent: u32, z2: f64, tx: u32, ty: u32) -> [i32; 2] {
    let extent = f64::from(extent);
    [
        round(extent * (x * z2 - f64::from(tx))),
        round(extent * (y * z2 - f64::from(ty))),
    ]
}

/// Rounds half way cases towards positive infinity.
///
/// Inputs just below one half, such as `0.49999999999999994`, round up to 1 since the
/// addition itself rounds.
fn round(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
