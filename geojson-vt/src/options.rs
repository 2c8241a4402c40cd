//! Tiling options.

use serde::{Deserialize, Serialize};

use crate::coords::{zoom_factor, EXTENT_UINT};

/// Options which control how features are simplified while building tiles.
///
/// Field names follow the option names of geojson-vt when (de)serialized, and missing fields
/// fall back to the [`Default`] values.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GeoJsonVtOptions {
    /// Zoom level at which features are kept in full detail.
    pub max_zoom: u8,
    /// Simplification tolerance in tile pixels. Higher means simpler.
    pub tolerance: f64,
    /// Tile extent in pixels.
    pub extent: u32,
    /// Whether to annotate line features with `mapbox_clip_start` and `mapbox_clip_end`.
    pub line_metrics: bool,
}

impl Default for GeoJsonVtOptions {
    fn default() -> Self {
        Self {
            max_zoom: 14,
            tolerance: 3.0,
            extent: EXTENT_UINT,
            line_metrics: false,
        }
    }
}

impl GeoJsonVtOptions {
    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_extent(mut self, extent: u32) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_line_metrics(mut self, line_metrics: bool) -> Self {
        self.line_metrics = line_metrics;
        self
    }

    /// The tolerance for tiles at zoom `z`, in normalized mercator units.
    ///
    /// One tile pixel covers less ground as the zoom increases, so the tolerance shrinks by
    /// `2^z * extent`. At `max_zoom` nothing is simplified.
    pub fn tile_tolerance(&self, z: u8) -> f64 {
        if z == self.max_zoom {
            0.0
        } else {
            self.tolerance / (zoom_factor(z) * f64::from(self.extent))
        }
    }
}
