//! Common test fixtures for rain volume tests.
//!
//! Polygons here are chosen for the sampling behaviour they trigger, not
//! just their shape; each doc comment says which resolutions find points.

use rain_common::{BoundingBox, Polygon};

/// Reference location: lower Manhattan.
pub const NYC: (f64, f64) = (-74.0060, 40.7128);

/// Common bounding box definitions for testing.
pub mod bbox {
    /// About 1 km x 1 km anchored at [`super::NYC`].
    pub const KILOMETER_SQUARE: (f64, f64, f64, f64) = (-74.0060, 40.7128, -73.9942, 40.7218);

    /// Roughly 17 km x 22 km over New York City.
    pub const NYC_METRO: (f64, f64, f64, f64) = (-74.1, 40.6, -73.9, 40.8);

    /// Larger than the default area limit (about 24,600 km² at the equator).
    pub const OVERSIZED: (f64, f64, f64, f64) = (0.0, 0.0, 1.41, 1.41);
}

fn polygon_from(bbox: (f64, f64, f64, f64)) -> Polygon {
    let (min_lon, min_lat, max_lon, max_lat) = bbox;
    Polygon::from_bbox(&BoundingBox::new(min_lon, min_lat, max_lon, max_lat))
        .expect("fixture bbox must be valid")
}

/// About 1 km x 1 km. At 1.5 km only its south-west vertex is sampled.
pub fn kilometer_square() -> Polygon {
    polygon_from(bbox::KILOMETER_SQUARE)
}

/// New York City box, roughly 375 km².
pub fn nyc_metro() -> Polygon {
    polygon_from(bbox::NYC_METRO)
}

/// Box just over the default area limit.
pub fn oversized_box() -> Polygon {
    polygon_from(bbox::OVERSIZED)
}

/// Diamond inscribed in the 0.1° box at the origin.
///
/// Its bounding box corners are outside, so 20 km and 10 km lattices miss
/// it and sampling settles at 5 km.
pub fn diamond() -> Polygon {
    Polygon::new(vec![(0.05, 0.0), (0.1, 0.05), (0.05, 0.1), (0.0, 0.05)])
        .expect("fixture polygon must be valid")
}

/// Diamond with a 0.002° half-width; no lattice down to 1 km reaches it.
pub fn tiny_diamond() -> Polygon {
    Polygon::new(vec![
        (0.004, 0.002),
        (0.006, 0.004),
        (0.004, 0.006),
        (0.002, 0.004),
    ])
    .expect("fixture polygon must be valid")
}

/// Concave L-shape with the top-right quadrant of a 0.2° box cut out.
pub fn l_shape() -> Polygon {
    Polygon::new(vec![
        (0.0, 0.0),
        (0.2, 0.0),
        (0.2, 0.1),
        (0.1, 0.1),
        (0.1, 0.2),
        (0.0, 0.2),
    ])
    .expect("fixture polygon must be valid")
}
