//! Building tiles from clipped source features.

use std::sync::Arc;

use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::{
    coords::{BBox, TileCoords},
    feature::{FeatureId, PropertyValue, SimplifiedLine, SourceFeature, SourceGeometry, Tags},
    options::GeoJsonVtOptions,
};

pub const CLIP_START_TAG: &str = "mapbox_clip_start";
pub const CLIP_END_TAG: &str = "mapbox_clip_end";

/// A ring or line as a sequence of `[x, y]` pairs.
pub type Ring<T> = Vec<[T; 2]>;

/// Geometry type codes as used by the vector tile specification.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureType {
    Point = 1,
    LineString = 2,
    Polygon = 3,
}

impl FeatureType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl Serialize for FeatureType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Geometry of a tile feature. Multi geometries are merged into their singular kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Geometry<T> {
    Point(Vec<[T; 2]>),
    LineString(Vec<Ring<T>>),
    /// Outer rings and holes have opposite winding.
    Polygon(Vec<Ring<T>>),
}

impl<T: Copy> Geometry<T> {
    pub fn feature_type(&self) -> FeatureType {
        match self {
            Geometry::Point(_) => FeatureType::Point,
            Geometry::LineString(_) => FeatureType::LineString,
            Geometry::Polygon(_) => FeatureType::Polygon,
        }
    }

    /// Rings of a line or polygon geometry, `None` for points.
    pub fn rings(&self) -> Option<&[Ring<T>]> {
        match self {
            Geometry::Point(_) => None,
            Geometry::LineString(rings) | Geometry::Polygon(rings) => Some(rings),
        }
    }

    pub fn num_points(&self) -> usize {
        match self {
            Geometry::Point(points) => points.len(),
            Geometry::LineString(rings) | Geometry::Polygon(rings) => {
                rings.iter().map(Vec::len).sum()
            }
        }
    }

    /// Applies `f` to every coordinate pair, keeping the structure.
    pub fn map<U, F: FnMut([T; 2]) -> [U; 2]>(&self, mut f: F) -> Geometry<U> {
        match self {
            Geometry::Point(points) => Geometry::Point(points.iter().map(|&p| f(p)).collect()),
            Geometry::LineString(rings) => Geometry::LineString(map_rings(rings, &mut f)),
            Geometry::Polygon(rings) => Geometry::Polygon(map_rings(rings, &mut f)),
        }
    }
}

fn map_rings<T, U, F>(rings: &[Ring<T>], f: &mut F) -> Vec<Ring<U>>
where
    T: Copy,
    F: FnMut([T; 2]) -> [U; 2],
{
    let mut result = Vec::with_capacity(rings.len());
    for ring in rings {
        result.push(ring.iter().map(|&p| f(p)).collect());
    }
    result
}

/// Geometry of a tile feature before and after projecting it into tile space.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TileGeometry {
    /// Normalized mercator coordinates in `[0, 1]`.
    Normalized(Geometry<f64>),
    /// Tile-local pixel coordinates.
    Projected(Geometry<i32>),
}

impl TileGeometry {
    pub fn feature_type(&self) -> FeatureType {
        match self {
            TileGeometry::Normalized(geometry) => geometry.feature_type(),
            TileGeometry::Projected(geometry) => geometry.feature_type(),
        }
    }

    pub fn normalized(&self) -> Option<&Geometry<f64>> {
        match self {
            TileGeometry::Normalized(geometry) => Some(geometry),
            TileGeometry::Projected(_) => None,
        }
    }

    pub fn projected(&self) -> Option<&Geometry<i32>> {
        match self {
            TileGeometry::Normalized(_) => None,
            TileGeometry::Projected(geometry) => Some(geometry),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileFeature {
    id: Option<FeatureId>,
    tags: Option<Arc<Tags>>,
    geometry: TileGeometry,
}

impl TileFeature {
    pub fn id(&self) -> Option<&FeatureId> {
        self.id.as_ref()
    }

    pub fn tags(&self) -> Option<&Tags> {
        self.tags.as_deref()
    }

    pub fn geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    pub fn feature_type(&self) -> FeatureType {
        self.geometry.feature_type()
    }

    /// Replaces normalized geometry by its projection. Projected geometry is left untouched.
    pub(crate) fn project<F: FnMut([f64; 2]) -> [i32; 2]>(&mut self, f: F) {
        let projected = match &self.geometry {
            TileGeometry::Normalized(geometry) => geometry.map(f),
            TileGeometry::Projected(_) => return,
        };
        self.geometry = TileGeometry::Projected(projected);
    }
}

impl Serialize for TileFeature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TileFeature", 4)?;
        match &self.id {
            Some(id) => state.serialize_field("id", id)?,
            None => state.skip_field("id")?,
        }
        state.serialize_field("type", &self.feature_type())?;
        state.serialize_field("tags", &self.tags)?;
        state.serialize_field("geometry", &self.geometry)?;
        state.end()
    }
}

/// The simplified features of one `(z, x, y)` tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    #[serde(flatten)]
    coords: TileCoords,
    features: Vec<TileFeature>,
    num_points: usize,
    num_simplified: usize,
    num_features: usize,
    #[serde(flatten)]
    bbox: BBox,
    #[serde(skip)]
    source: Option<Vec<SourceFeature>>,
    transformed: bool,
}

impl Tile {
    fn new(coords: TileCoords, num_features: usize) -> Self {
        Self {
            coords,
            features: Vec::new(),
            num_points: 0,
            num_simplified: 0,
            num_features,
            bbox: BBox::EMPTY,
            source: None,
            transformed: false,
        }
    }

    pub fn coords(&self) -> TileCoords {
        self.coords
    }

    pub fn x(&self) -> u32 {
        self.coords.x
    }

    pub fn y(&self) -> u32 {
        self.coords.y
    }

    pub fn z(&self) -> u8 {
        self.coords.z
    }

    pub fn features(&self) -> &[TileFeature] {
        &self.features
    }

    pub(crate) fn features_mut(&mut self) -> &mut [TileFeature] {
        &mut self.features
    }

    /// Number of coordinate pairs considered, including the ones dropped by simplification.
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Number of coordinate pairs kept after simplification.
    pub fn num_simplified(&self) -> usize {
        self.num_simplified
    }

    /// Number of source features, including those which did not produce any geometry.
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Bounds of all source features. Still [`BBox::EMPTY`] if the tile got no features.
    pub fn bbox(&self) -> &BBox {
        &self.bbox
    }

    /// Source features a tile index may keep around for drilling down further.
    pub fn source(&self) -> Option<&[SourceFeature]> {
        self.source.as_deref()
    }

    pub fn set_source(&mut self, source: Option<Vec<SourceFeature>>) {
        self.source = source;
    }

    pub fn is_transformed(&self) -> bool {
        self.transformed
    }

    pub(crate) fn mark_transformed(&mut self) {
        self.transformed = true;
    }

    fn add_feature(&mut self, feature: &SourceFeature, tolerance: f64, line_metrics: bool) {
        self.bbox.extend(&feature.bbox);

        let mut tags = feature.tags.clone();

        let geometry = match &feature.geometry {
            SourceGeometry::Point(points) | SourceGeometry::MultiPoint(points) => {
                let geometry: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
                self.num_points += geometry.len();
                self.num_simplified += geometry.len();
                if geometry.is_empty() {
                    return;
                }
                Geometry::Point(geometry)
            }
            SourceGeometry::LineString(line) => {
                let mut geometry = Vec::with_capacity(1);
                self.add_line(&mut geometry, line, tolerance, false, false);
                if geometry.is_empty() {
                    return;
                }
                if line_metrics {
                    tags = Some(Arc::new(with_line_metrics(feature.tags.as_deref(), line)));
                }
                Geometry::LineString(geometry)
            }
            SourceGeometry::MultiLineString(lines) => {
                let mut geometry = Vec::with_capacity(lines.len());
                for (i, line) in lines.iter().enumerate() {
                    self.add_line(&mut geometry, line, tolerance, false, i == 0);
                }
                if geometry.is_empty() {
                    return;
                }
                Geometry::LineString(geometry)
            }
            SourceGeometry::Polygon(rings) => {
                let mut geometry = Vec::with_capacity(rings.len());
                for (i, ring) in rings.iter().enumerate() {
                    self.add_line(&mut geometry, ring, tolerance, true, i == 0);
                }
                if geometry.is_empty() {
                    return;
                }
                Geometry::Polygon(geometry)
            }
            SourceGeometry::MultiPolygon(polygons) => {
                let mut geometry = Vec::new();
                for polygon in polygons {
                    for (i, ring) in polygon.iter().enumerate() {
                        self.add_line(&mut geometry, ring, tolerance, true, i == 0);
                    }
                }
                if geometry.is_empty() {
                    return;
                }
                Geometry::Polygon(geometry)
            }
        };

        self.features.push(TileFeature {
            id: feature.id.clone(),
            tags,
            geometry: TileGeometry::Normalized(geometry),
        });
    }

    /// Keeps the points of `line` which are significant at `tolerance` and appends them to
    /// `result` as a ring. Rings without any remaining point are not appended.
    fn add_line(
        &mut self,
        result: &mut Vec<Ring<f64>>,
        line: &SimplifiedLine,
        tolerance: f64,
        is_polygon: bool,
        is_outer: bool,
    ) {
        let sq_tolerance = tolerance * tolerance;

        // Rings are compared by area, lines by length.
        let min_size = if is_polygon { sq_tolerance } else { tolerance };
        if tolerance > 0.0 && line.size < min_size {
            self.num_points += line.len();
            return;
        }

        let mut ring = Vec::with_capacity(line.len());
        for point in &line.points {
            if tolerance == 0.0 || point.importance > sq_tolerance {
                self.num_simplified += 1;
                ring.push([point.x, point.y]);
            }
            self.num_points += 1;
        }

        if ring.is_empty() {
            return;
        }

        if is_polygon {
            rewind(&mut ring, is_outer);
        }

        result.push(ring);
    }
}

/// Copies `tags` and adds the position of the clipped `line` within the original line.
fn with_line_metrics(tags: Option<&Tags>, line: &SimplifiedLine) -> Tags {
    let mut tags = tags.cloned().unwrap_or_default();
    let start = line.start.unwrap_or(0.0);
    let end = line.end.unwrap_or(line.size);
    tags.insert(
        CLIP_START_TAG.to_owned(),
        PropertyValue::DoubleValue(start / line.size),
    );
    tags.insert(
        CLIP_END_TAG.to_owned(),
        PropertyValue::DoubleValue(end / line.size),
    );
    tags
}

/// Shoelace sum over consecutive pairs of `ring`, closing the ring implicitly.
///
/// In tile space, where y points down, a negative value means the ring runs clockwise on screen.
pub fn signed_area(ring: &[[f64; 2]]) -> f64 {
    let Some(&last) = ring.last() else {
        return 0.0;
    };
    let mut area = 0.0;
    let mut prev = last;
    for &point in ring {
        area += (point[0] - prev[0]) * (point[1] + prev[1]);
        prev = point;
    }
    area
}

/// Reverses `ring` in place unless its orientation already matches `clockwise`.
fn rewind(ring: &mut [[f64; 2]], clockwise: bool) {
    let area = signed_area(ring);
    if (area > 0.0) != clockwise {
        return;
    }
    ring.reverse();
}

/// Creates the tile `(z, x, y)` from features already clipped to its bounds.
///
/// Points are kept as they are. Lines and rings lose the points which are not significant at the
/// tolerance of zoom `z` (see [`GeoJsonVtOptions::tile_tolerance`]), and rings too small to be
/// visible are dropped. Features left without geometry are not part of the tile but still count
/// towards its bounds and statistics.
pub fn build_tile(
    features: &[SourceFeature],
    z: u8,
    x: u32,
    y: u32,
    options: &GeoJsonVtOptions,
) -> Tile {
    debug_assert!(
        options.tolerance >= 0.0,
        "tolerance must not be negative, got {}",
        options.tolerance
    );

    let tolerance = options.tile_tolerance(z);
    let mut tile = Tile::new(TileCoords::new(z, x, y), features.len());

    for feature in features {
        tile.add_feature(feature, tolerance, options.line_metrics);
    }

    log::trace!(
        "tile {} (features: {}, points: {}, simplified: {})",
        tile.coords,
        tile.features.len(),
        tile.num_points,
        tile.num_simplified
    );

    tile
}
