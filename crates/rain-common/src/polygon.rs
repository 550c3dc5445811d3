//! Closed lon/lat polygon with the geometry operations the estimator needs.
//!
//! The polygon is a single exterior ring. Self-intersection is not checked:
//! the drawing side is expected to prevent it.

use geo::{BoundingRect, ChamberlainDuquetteArea, Coord, Intersects, LineString};

use crate::{BoundingBox, RainError, RainResult};

/// A closed polygon ring of (lon, lat) vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    ring: Vec<(f64, f64)>,
    shape: geo::Polygon<f64>,
}

impl Polygon {
    /// Build a polygon from a ring of (lon, lat) vertices.
    ///
    /// An open ring is closed by repeating its first vertex. The closed ring
    /// must have at least 4 points.
    pub fn new(mut ring: Vec<(f64, f64)>) -> RainResult<Self> {
        for &(lon, lat) in &ring {
            validate_coordinates(lon, lat)?;
        }

        if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
            if first != last {
                ring.push(first);
            }
        }

        if ring.len() < 4 {
            return Err(RainError::invalid_polygon(
                "Polygon must have at least 4 points (including closing point)",
            ));
        }

        let shape = geo::Polygon::new(LineString::from(ring.clone()), vec![]);

        Ok(Self { ring, shape })
    }

    /// Build the rectangle covering a bounding box.
    pub fn from_bbox(bbox: &BoundingBox) -> RainResult<Self> {
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Err(RainError::invalid_polygon(format!(
                "Bounding box has no area: {:?}",
                bbox
            )));
        }

        Self::new(vec![
            (bbox.min_lon, bbox.min_lat),
            (bbox.max_lon, bbox.min_lat),
            (bbox.max_lon, bbox.max_lat),
            (bbox.min_lon, bbox.max_lat),
        ])
    }

    /// Parse a WKT POLYGON string.
    ///
    /// Accepts format: `POLYGON((lon1 lat1, lon2 lat2, lon3 lat3, lon1 lat1))`.
    /// Only the exterior ring is read; interior rings are rejected.
    pub fn from_wkt(wkt: &str) -> RainResult<Self> {
        let wkt = wkt.trim();

        if !wkt.to_uppercase().starts_with("POLYGON") {
            return Err(RainError::invalid_polygon("Expected POLYGON format"));
        }

        let start = wkt
            .find("((")
            .ok_or_else(|| RainError::invalid_polygon("Missing opening parentheses"))?;
        let end = wkt
            .rfind("))")
            .ok_or_else(|| RainError::invalid_polygon("Missing closing parentheses"))?;

        if end <= start {
            return Err(RainError::invalid_polygon("Invalid parenthesis order"));
        }

        let coords_str = wkt[start + 2..end].trim();
        if coords_str.contains('(') || coords_str.contains(')') {
            return Err(RainError::invalid_polygon(
                "Polygons with interior rings are not supported",
            ));
        }

        Self::new(parse_ring(coords_str)?)
    }

    /// The closed ring, first vertex repeated as last.
    pub fn ring(&self) -> &[(f64, f64)] {
        &self.ring
    }

    /// Spherical area in m².
    ///
    /// Chamberlain-Duquette on the WGS84 equatorial radius. Independent of
    /// ring orientation and starting vertex.
    pub fn area_m2(&self) -> f64 {
        self.shape.chamberlain_duquette_unsigned_area()
    }

    /// Area in km².
    pub fn area_km2(&self) -> f64 {
        self.area_m2() / 1_000_000.0
    }

    /// Bounding box of the ring.
    pub fn bounding_box(&self) -> BoundingBox {
        match self.shape.bounding_rect() {
            Some(rect) => BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y),
            // The constructor guarantees a non-empty ring.
            None => BoundingBox::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    /// Point-in-polygon test; points on an edge or vertex count as inside.
    ///
    /// Sampling and integration both go through this method so the boundary
    /// rule is applied the same way everywhere.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.shape.intersects(&Coord { x: lon, y: lat })
    }

    /// Render the ring as WKT.
    pub fn to_wkt(&self) -> String {
        let coords: Vec<String> = self
            .ring
            .iter()
            .map(|(lon, lat)| format!("{} {}", lon, lat))
            .collect();
        format!("POLYGON(({}))", coords.join(", "))
    }
}

/// Parse a single ring from "lon lat, lon lat, ..." text.
fn parse_ring(coords_str: &str) -> RainResult<Vec<(f64, f64)>> {
    coords_str
        .split(',')
        .map(|pair| {
            let pair = pair.trim();
            let parts: Vec<&str> = pair.split_whitespace().collect();
            if parts.len() != 2 {
                return Err(RainError::invalid_polygon(format!(
                    "Expected 'lon lat' format, got '{}'",
                    pair
                )));
            }

            let lon: f64 = parts[0].parse().map_err(|_| {
                RainError::invalid_polygon(format!("Invalid coordinate value: {}", parts[0]))
            })?;
            let lat: f64 = parts[1].parse().map_err(|_| {
                RainError::invalid_polygon(format!("Invalid coordinate value: {}", parts[1]))
            })?;

            Ok((lon, lat))
        })
        .collect()
}

fn validate_coordinates(lon: f64, lat: f64) -> RainResult<()> {
    if !(-180.0..=180.0).contains(&lon) {
        return Err(RainError::invalid_polygon(format!(
            "Longitude {} is out of range [-180, 180]",
            lon
        )));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(RainError::invalid_polygon(format!(
            "Latitude {} is out of range [-90, 90]",
            lat
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        Polygon::new(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]).unwrap()
    }

    #[test]
    fn test_open_ring_is_closed() {
        let polygon = Polygon::new(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]).unwrap();
        assert_eq!(polygon.ring().len(), 4);
        assert_eq!(polygon.ring()[0], polygon.ring()[3]);
    }

    #[test]
    fn test_too_few_points() {
        let result = Polygon::new(vec![(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        assert!(matches!(result, Err(RainError::InvalidPolygon(_))));
    }

    #[test]
    fn test_out_of_range_latitude() {
        let result = Polygon::new(vec![(0.0, 0.0), (1.0, 95.0), (1.0, 1.0), (0.0, 0.0)]);
        assert!(matches!(result, Err(RainError::InvalidPolygon(_))));
    }

    #[test]
    fn test_contains_includes_boundary() {
        let polygon = unit_square();
        assert!(polygon.contains(0.5, 0.5));
        assert!(polygon.contains(0.0, 0.0)); // vertex
        assert!(polygon.contains(0.5, 0.0)); // edge
        assert!(!polygon.contains(1.5, 0.5));
    }

    #[test]
    fn test_wkt_round_trip_keeps_ring() {
        let polygon = unit_square();
        let parsed = Polygon::from_wkt(&polygon.to_wkt()).unwrap();
        assert_eq!(parsed.ring(), polygon.ring());
    }
}
