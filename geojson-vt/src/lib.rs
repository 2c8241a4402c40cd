//! # geojson-vt
//!
//! The tile building core of a GeoJSON vector tile slicer.
//!
//! A tile index clips simplified features to the bounds of a tile and hands them to
//! [`build_tile`], which drops the detail that is not visible at the zoom level of the tile and
//! normalizes the winding of polygon rings. Before a tile is rendered or encoded,
//! [`transform_tile`] projects its coordinates from normalized mercator space into integer tile
//! coordinates.
//!
//! ### Example
//!
//! ```
//! use geojson_vt::{
//!     build_tile, transform_tile, GeoJsonVtOptions, SimplifiedPoint, SourceFeature,
//!     SourceGeometry,
//! };
//!
//! let feature = SourceFeature::new(SourceGeometry::Point(vec![SimplifiedPoint::new(
//!     0.25, 0.25, 0.0,
//! )]))
//! .with_id("orca-42");
//!
//! let mut tile = build_tile(&[feature], 1, 0, 0, &GeoJsonVtOptions::default());
//! transform_tile(&mut tile, 4096);
//!
//! assert!(tile.is_transformed());
//! ```

pub mod coords;
pub mod error;
pub mod feature;
pub mod options;
pub mod tile;
pub mod transform;

pub use crate::{
    coords::{BBox, TileCoords},
    error::GeometryError,
    feature::{
        FeatureId, FlatFeature, PropertyValue, SimplifiedLine, SimplifiedPoint, SourceFeature,
        SourceGeometry, Tags,
    },
    options::GeoJsonVtOptions,
    tile::{build_tile, FeatureType, Geometry, Tile, TileFeature, TileGeometry},
    transform::transform_tile,
};
