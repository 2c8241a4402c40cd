//! Tile jobs read from JSON files.

use std::{fs::File, io, io::BufReader, path::Path};

use geojson_vt::{
    build_tile, transform_tile, FlatFeature, GeoJsonVtOptions, GeometryError, SourceFeature, Tile,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("reading the job failed: {0}")]
    Io(#[from] io::Error),
    #[error("parsing the job failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("feature {index} is invalid: {source}")]
    Geometry {
        index: usize,
        #[source]
        source: GeometryError,
    },
}

/// Features of one tile together with the options to build it with.
#[derive(Deserialize, Debug)]
pub struct TileJob {
    #[serde(default)]
    pub options: GeoJsonVtOptions,
    pub z: u8,
    pub x: u32,
    pub y: u32,
    pub features: Vec<FlatFeature>,
}

impl TileJob {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, JobError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Builds the tile and, unless `transform` is unset, projects it to the extent of the
    /// options.
    pub fn run(self, transform: bool) -> Result<Tile, JobError> {
        let features = self
            .features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| {
                SourceFeature::try_from(feature)
                    .map_err(|source| JobError::Geometry { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut tile = build_tile(&features, self.z, self.x, self.y, &self.options);
        log::info!(
            "built tile {} with {} of {} features ({} of {} points kept)",
            tile.coords(),
            tile.features().len(),
            tile.num_features(),
            tile.num_simplified(),
            tile.num_points()
        );

        if transform {
            transform_tile(&mut tile, self.options.extent);
        }
        Ok(tile)
    }
}
