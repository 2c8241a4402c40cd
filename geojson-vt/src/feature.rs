//! Source features as handed over by the tile index.
//!
//! Every feature is already projected into normalized mercator space, clipped to the bounds of a
//! tile and annotated by the simplifier: each point carries an importance value and each ring or
//! line carries its size.

use std::{collections::HashMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{coords::BBox, error::GeometryError};

/// Properties of a feature.
pub type Tags = HashMap<String, PropertyValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    BoolValue(bool),
    UIntValue(u64),
    IntValue(i64),
    DoubleValue(f64),
    StringValue(String),
    Null,
}

impl PropertyValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::UIntValue(value) => Some(*value as f64),
            PropertyValue::IntValue(value) => Some(*value as f64),
            PropertyValue::DoubleValue(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::StringValue(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::DoubleValue(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::IntValue(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::BoolValue(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::StringValue(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::StringValue(value)
    }
}

/// Identifier of a feature, either numeric or textual as in GeoJSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(serde_json::Number),
    String(String),
}

impl From<u64> for FeatureId {
    fn from(id: u64) -> Self {
        FeatureId::Number(id.into())
    }
}

impl From<i64> for FeatureId {
    fn from(id: i64) -> Self {
        FeatureId::Number(id.into())
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        FeatureId::String(id.to_owned())
    }
}

impl From<String> for FeatureId {
    fn from(id: String) -> Self {
        FeatureId::String(id)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureId::Number(id) => write!(f, "{id}"),
            FeatureId::String(id) => write!(f, "{id}"),
        }
    }
}

/// A point together with the importance the simplifier assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedPoint {
    pub x: f64,
    pub y: f64,
    /// Squared distance at which the point stops being significant. `0` for points which are
    /// only kept at full detail.
    pub importance: f64,
}

impl SimplifiedPoint {
    pub fn new(x: f64, y: f64, importance: f64) -> Self {
        Self { x, y, importance }
    }
}

/// A line string or polygon ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedLine {
    pub points: Vec<SimplifiedPoint>,
    /// Area of a ring or length of a line.
    pub size: f64,
    /// Position of this clipped piece along the original line.
    pub start: Option<f64>,
    pub end: Option<f64>,
}

impl SimplifiedLine {
    pub fn new(points: Vec<SimplifiedPoint>, size: f64) -> Self {
        Self {
            points,
            size,
            start: None,
            end: None,
        }
    }

    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Builds a line from a flat `[x, y, importance, ...]` buffer.
    pub fn from_flat(coords: &[f64], size: f64) -> Result<Self, GeometryError> {
        Ok(Self::new(points_from_flat(coords)?, size))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceGeometry {
    Point(Vec<SimplifiedPoint>),
    MultiPoint(Vec<SimplifiedPoint>),
    LineString(SimplifiedLine),
    MultiLineString(Vec<SimplifiedLine>),
    /// The first ring is the outer ring, all following rings are holes.
    Polygon(Vec<SimplifiedLine>),
    MultiPolygon(Vec<Vec<SimplifiedLine>>),
}

impl SourceGeometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            SourceGeometry::Point(_) => "Point",
            SourceGeometry::MultiPoint(_) => "MultiPoint",
            SourceGeometry::LineString(_) => "LineString",
            SourceGeometry::MultiLineString(_) => "MultiLineString",
            SourceGeometry::Polygon(_) => "Polygon",
            SourceGeometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Visits every point of the geometry.
    pub fn points(&self) -> Box<dyn Iterator<Item = &SimplifiedPoint> + '_> {
        match self {
            SourceGeometry::Point(points) | SourceGeometry::MultiPoint(points) => {
                Box::new(points.iter())
            }
            SourceGeometry::LineString(line) => Box::new(line.points.iter()),
            SourceGeometry::MultiLineString(lines) | SourceGeometry::Polygon(lines) => {
                Box::new(lines.iter().flat_map(|line| line.points.iter()))
            }
            SourceGeometry::MultiPolygon(polygons) => Box::new(
                polygons
                    .iter()
                    .flatten()
                    .flat_map(|line| line.points.iter()),
            ),
        }
    }

    pub fn bbox(&self) -> BBox {
        BBox::from_points(self.points().map(|point| [point.x, point.y]))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFeature {
    pub id: Option<FeatureId>,
    pub tags: Option<Arc<Tags>>,
    pub geometry: SourceGeometry,
    pub bbox: BBox,
}

impl SourceFeature {
    /// Creates a feature whose bounding box is computed from its points.
    pub fn new(geometry: SourceGeometry) -> Self {
        let bbox = geometry.bbox();
        Self {
            id: None,
            tags: None,
            geometry,
            bbox,
        }
    }

    pub fn with_id<I: Into<FeatureId>>(mut self, id: I) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = Some(Arc::new(tags));
        self
    }

    pub fn with_bbox(mut self, bbox: BBox) -> Self {
        self.bbox = bbox;
        self
    }
}

fn points_from_flat(coords: &[f64]) -> Result<Vec<SimplifiedPoint>, GeometryError> {
    if coords.len() % 3 != 0 {
        return Err(GeometryError::InvalidStride { len: coords.len() });
    }
    Ok(coords
        .chunks_exact(3)
        .map(|triple| SimplifiedPoint::new(triple[0], triple[1], triple[2]))
        .collect())
}

/// A line in the flat buffer layout of geojson-vt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatLine {
    pub coords: Vec<f64>,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
}

impl TryFrom<FlatLine> for SimplifiedLine {
    type Error = GeometryError;

    fn try_from(line: FlatLine) -> Result<Self, Self::Error> {
        Ok(SimplifiedLine {
            points: points_from_flat(&line.coords)?,
            size: line.size,
            start: line.start,
            end: line.end,
        })
    }
}

/// Coordinates of a [`FlatFeature`]; which nesting is valid depends on the feature type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlatCoords {
    Points(Vec<f64>),
    Line(FlatLine),
    Lines(Vec<FlatLine>),
    Polygons(Vec<Vec<FlatLine>>),
}

/// A feature in the flat buffer layout, e.g. as read from JSON.
///
/// The bounding box is computed from the coordinates unless all four bounds are given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatFeature {
    #[serde(default)]
    pub id: Option<FeatureId>,
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: FlatCoords,
    #[serde(default)]
    pub tags: Option<Tags>,
    #[serde(default)]
    pub min_x: Option<f64>,
    #[serde(default)]
    pub min_y: Option<f64>,
    #[serde(default)]
    pub max_x: Option<f64>,
    #[serde(default)]
    pub max_y: Option<f64>,
}

const GEOMETRY_TYPES: [&str; 6] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
];

fn lines_from_flat(lines: Vec<FlatLine>) -> Result<Vec<SimplifiedLine>, GeometryError> {
    lines.into_iter().map(SimplifiedLine::try_from).collect()
}

impl TryFrom<FlatFeature> for SourceFeature {
    type Error = GeometryError;

    fn try_from(feature: FlatFeature) -> Result<Self, Self::Error> {
        let mismatch = || GeometryError::ShapeMismatch {
            kind: feature.kind.clone(),
        };

        // An empty array always deserializes as `Points`.
        let geometry = match (feature.kind.as_str(), feature.geometry) {
            ("Point", FlatCoords::Points(coords)) => {
                SourceGeometry::Point(points_from_flat(&coords)?)
            }
            ("MultiPoint", FlatCoords::Points(coords)) => {
                SourceGeometry::MultiPoint(points_from_flat(&coords)?)
            }
            ("LineString", FlatCoords::Line(line)) => SourceGeometry::LineString(line.try_into()?),
            ("MultiLineString", FlatCoords::Lines(lines)) => {
                SourceGeometry::MultiLineString(lines_from_flat(lines)?)
            }
            ("Polygon", FlatCoords::Lines(rings)) => SourceGeometry::Polygon(lines_from_flat(rings)?),
            ("MultiPolygon", FlatCoords::Polygons(polygons)) => SourceGeometry::MultiPolygon(
                polygons
                    .into_iter()
                    .map(lines_from_flat)
                    .collect::<Result<_, _>>()?,
            ),
            ("MultiLineString", FlatCoords::Points(coords)) if coords.is_empty() => {
                SourceGeometry::MultiLineString(Vec::new())
            }
            ("Polygon", FlatCoords::Points(coords)) if coords.is_empty() => {
                SourceGeometry::Polygon(Vec::new())
            }
            ("MultiPolygon", FlatCoords::Points(coords)) if coords.is_empty() => {
                SourceGeometry::MultiPolygon(Vec::new())
            }
            (kind, _) if GEOMETRY_TYPES.contains(&kind) => return Err(mismatch()),
            (other, _) => return Err(GeometryError::UnknownType(other.to_owned())),
        };

        let bbox = match (feature.min_x, feature.min_y, feature.max_x, feature.max_y) {
            (Some(min_x), Some(min_y), Some(max_x), Some(max_y)) => {
                BBox::new(min_x, min_y, max_x, max_y)
            }
            _ => geometry.bbox(),
        };

        Ok(SourceFeature {
            id: feature.id,
            tags: feature.tags.map(Arc::new),
            geometry,
            bbox,
        })
    }
}
