//! Selection geometry: polygons, bounding boxes and time windows.
//!
//! Membership tests are planar in (longitude, latitude) space and
//! inclusive of the boundary: a point on an edge or vertex is inside.
//! Polygon geometry is delegated to the `geo` crate.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use geo::{Area, Coord, Intersects, LineString, Point};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

/// Polygons whose planar area (square degrees) is below this are degenerate.
const MIN_AREA: f64 = 1e-12;

/// A (latitude, longitude) vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }

    fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidRegion(format!(
                "latitude {} outside [-90, 90]",
                self.lat
            )));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(Error::InvalidRegion(format!(
                "longitude {} outside [-180, 180]",
                self.lon
            )));
        }
        Ok(())
    }
}

/// Axis-aligned box in WGS84 degrees.
///
/// `west > east` denotes a box crossing the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Creates a validated bounding box.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self> {
        let bbox = BoundingBox {
            west,
            south,
            east,
            north,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    pub fn validate(&self) -> Result<()> {
        GeoPoint::new(self.south, self.west).validate()?;
        GeoPoint::new(self.north, self.east).validate()?;
        if self.south >= self.north {
            return Err(Error::InvalidRegion(format!(
                "bounding box south {} must be below north {}",
                self.south, self.north
            )));
        }
        if self.west == self.east {
            return Err(Error::InvalidRegion(
                "bounding box has zero longitudinal width".to_string(),
            ));
        }
        Ok(())
    }

    /// Grow the box by `margin` degrees on every side, clamped to the globe.
    ///
    /// Used to turn a catalog extent (which may be a single point) into a
    /// selectable region.
    pub fn expanded(&self, margin: f64) -> Self {
        BoundingBox {
            west: (self.west - margin).max(-180.0),
            south: (self.south - margin).max(-90.0),
            east: (self.east + margin).min(180.0),
            north: (self.north + margin).min(90.0),
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if lat < self.south || lat > self.north {
            return false;
        }
        if self.west <= self.east {
            lon >= self.west && lon <= self.east
        } else {
            lon >= self.west || lon <= self.east
        }
    }
}

impl FromStr for BoundingBox {
    type Err = Error;

    /// Parses `west,south,east,north`.
    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::InvalidRegion(format!("bad bounding box '{}': {}", s, e)))?;
        match parts.as_slice() {
            [west, south, east, north] => BoundingBox::new(*west, *south, *east, *north),
            _ => Err(Error::InvalidRegion(format!(
                "bounding box needs 4 values (west,south,east,north), got {}",
                parts.len()
            ))),
        }
    }
}

/// Closed polygon given as an ordered ring of vertices.
///
/// The ring is closed implicitly; a repeated closing vertex is dropped.
/// Membership and area are computed on a `geo` polygon with
/// x = longitude and y = latitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonRing", into = "PolygonRing")]
pub struct Polygon {
    vertices: Vec<GeoPoint>,
    shape: geo::Polygon<f64>,
}

/// Wire form of [`Polygon`]; deserialization runs the validating constructor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PolygonRing {
    pub vertices: Vec<GeoPoint>,
}

impl Polygon {
    /// Creates a validated polygon.
    pub fn new(mut vertices: Vec<GeoPoint>) -> Result<Self> {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return Err(Error::InvalidRegion(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        for vertex in &vertices {
            vertex.validate()?;
        }

        let ring: LineString<f64> = vertices
            .iter()
            .map(|v| Coord { x: v.lon, y: v.lat })
            .collect();
        let shape = geo::Polygon::new(ring, Vec::new());
        if shape.unsigned_area() < MIN_AREA {
            return Err(Error::InvalidRegion("polygon has zero area".to_string()));
        }

        Ok(Polygon { vertices, shape })
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// Planar area in square degrees.
    pub fn area(&self) -> f64 {
        self.shape.unsigned_area()
    }

    /// Points on any edge or vertex count as inside.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if !(lat.is_finite() && lon.is_finite()) {
            return false;
        }
        self.shape.intersects(&Point::new(lon, lat))
    }
}

impl TryFrom<PolygonRing> for Polygon {
    type Error = Error;

    fn try_from(ring: PolygonRing) -> Result<Self> {
        Polygon::new(ring.vertices)
    }
}

impl From<Polygon> for PolygonRing {
    fn from(polygon: Polygon) -> Self {
        PolygonRing {
            vertices: polygon.vertices,
        }
    }
}

impl JsonSchema for Polygon {
    fn schema_name() -> Cow<'static, str> {
        "Polygon".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        PolygonRing::json_schema(generator)
    }
}

impl FromStr for Polygon {
    type Err = Error;

    /// Parses `lat lon; lat lon; ...` (commas between lat and lon also accepted).
    fn from_str(s: &str) -> Result<Self> {
        let mut vertices = Vec::new();
        for pair in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let coords = pair
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|c| !c.is_empty())
                .map(str::parse::<f64>)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::InvalidRegion(format!("bad vertex '{}': {}", pair, e)))?;
            match coords.as_slice() {
                [lat, lon] => vertices.push(GeoPoint::new(*lat, *lon)),
                _ => {
                    return Err(Error::InvalidRegion(format!(
                        "vertex '{}' must be 'lat lon'",
                        pair
                    )))
                }
            }
        }
        Polygon::new(vertices)
    }
}

/// Selection region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Region {
    Polygon(Polygon),
    BoundingBox(BoundingBox),
}

impl Region {
    /// Re-check invariants. Bounding boxes built through serde bypass
    /// [`BoundingBox::new`]; polygons cannot.
    pub fn validate(&self) -> Result<()> {
        match self {
            Region::Polygon(_) => Ok(()),
            Region::BoundingBox(bbox) => bbox.validate(),
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        match self {
            Region::Polygon(polygon) => polygon.contains(lat, lon),
            Region::BoundingBox(bbox) => bbox.contains(lat, lon),
        }
    }
}

impl From<Polygon> for Region {
    fn from(polygon: Polygon) -> Self {
        Region::Polygon(polygon)
    }
}

impl From<BoundingBox> for Region {
    fn from(bbox: BoundingBox) -> Self {
        Region::BoundingBox(bbox)
    }
}

/// Half-open time window `[start, end)`; a missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<Self> {
        let range = TimeRange { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn unbounded() -> Self {
        TimeRange::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(Error::InvalidTimeRange {
                    start: start.to_rfc3339(),
                    end: end.to_rfc3339(),
                });
            }
        }
        Ok(())
    }

    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| time >= s) && self.end.map_or(true, |e| time < e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn square() -> Polygon {
        Polygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 10.0),
            GeoPoint::new(10.0, 10.0),
            GeoPoint::new(10.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn polygon_interior_and_exterior() {
        let poly = square();
        assert!(poly.contains(5.0, 5.0));
        assert!(!poly.contains(15.0, 5.0));
        assert!(!poly.contains(5.0, -0.5));
    }

    #[test]
    fn polygon_boundary_is_inclusive() {
        let poly = square();
        assert!(poly.contains(0.0, 5.0));
        assert!(poly.contains(10.0, 10.0));
        assert!(poly.contains(5.0, 10.0));
        assert!(poly.contains(0.0, 0.0));
    }

    #[test]
    fn concave_polygon_notch_is_outside() {
        // U shape opening to the north
        let poly = Polygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 3.0),
            GeoPoint::new(3.0, 3.0),
            GeoPoint::new(3.0, 2.0),
            GeoPoint::new(1.0, 2.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(3.0, 1.0),
            GeoPoint::new(3.0, 0.0),
        ])
        .unwrap();
        assert!(!poly.contains(2.0, 1.5));
        assert!(poly.contains(2.0, 0.5));
        assert!(poly.contains(0.5, 1.5));
    }

    #[test]
    fn closing_vertex_is_dropped() {
        let poly = Polygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(poly.vertices().len(), 3);
    }

    #[test]
    fn degenerate_polygons_are_rejected() {
        let two = Polygon::new(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)]);
        assert!(matches!(two, Err(Error::InvalidRegion(_))));

        let collinear = Polygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(2.0, 2.0),
        ]);
        assert!(collinear.unwrap_err().to_string().contains("zero area"));
    }

    #[test]
    fn bbox_validation_and_membership() {
        assert!(BoundingBox::new(0.0, 10.0, 5.0, 10.0).is_err());
        assert!(BoundingBox::new(0.0, 0.0, 0.0, 5.0).is_err());

        let bbox = BoundingBox::new(-10.0, -5.0, 10.0, 5.0).unwrap();
        assert!(bbox.contains(5.0, 10.0));
        assert!(!bbox.contains(5.1, 0.0));
    }

    #[test]
    fn bbox_across_antimeridian() {
        let bbox = BoundingBox::new(170.0, -10.0, -170.0, 10.0).unwrap();
        assert!(bbox.contains(0.0, 175.0));
        assert!(bbox.contains(0.0, -175.0));
        assert!(!bbox.contains(0.0, 0.0));
    }

    #[test]
    fn parses_bbox_and_polygon() {
        let bbox: BoundingBox = "-10, -5, 10, 5".parse().unwrap();
        assert_eq!(bbox.north, 5.0);
        assert!("1,2,3".parse::<BoundingBox>().is_err());

        let poly: Polygon = "0 0; 0 10; 10 10; 10 0".parse().unwrap();
        assert_eq!(poly.vertices().len(), 4);
        let poly: Polygon = "0,0;0,10;10,10".parse().unwrap();
        assert_eq!(poly.vertices()[1], GeoPoint::new(0.0, 10.0));
        assert!("0 0; 1".parse::<Polygon>().is_err());
    }

    #[test]
    fn diagonal_edges_are_inclusive() {
        let triangle: Polygon = "0 0; 10 10; 0 10".parse().unwrap();
        assert!(triangle.contains(5.0, 5.0));
        assert!(triangle.contains(2.5, 5.0));
        assert!(!triangle.contains(5.0, 2.5));
        assert!((triangle.area() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_points_are_outside() {
        let poly = square();
        assert!(!poly.contains(f64::NAN, 5.0));
        assert!(!poly.contains(5.0, f64::INFINITY));
    }

    #[test]
    fn polygon_serde_validates() {
        let region = Region::from(square());
        let json = serde_json::to_string(&region).unwrap();
        assert!(json.contains("\"kind\":\"polygon\""));
        let back: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(back, region);
        assert!(back.contains(5.0, 5.0));

        let degenerate = r#"{"kind":"polygon","vertices":[{"lat":0.0,"lon":0.0},{"lat":1.0,"lon":1.0}]}"#;
        let err = serde_json::from_str::<Region>(degenerate).unwrap_err();
        assert!(err.to_string().contains("at least 3 vertices"));
    }

    #[test]
    fn region_serde_is_tagged() {
        let region = Region::from(BoundingBox::new(-1.0, -1.0, 1.0, 1.0).unwrap());
        let json = serde_json::to_string(&region).unwrap();
        assert!(json.contains("\"kind\":\"bounding_box\""));
        let back: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(back, region);
    }

    #[test]
    fn time_range_is_half_open() {
        let start = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        let range = TimeRange::new(Some(start), Some(end)).unwrap();
        assert!(range.contains(start));
        assert!(!range.contains(end));
        assert!(TimeRange::unbounded().contains(end));
        assert!(matches!(
            TimeRange::new(Some(end), Some(start)),
            Err(Error::InvalidTimeRange { .. })
        ));
    }
}
