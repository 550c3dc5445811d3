//! Kilometer to degree conversion and spherical cell area.

use geo::{ChamberlainDuquetteArea, Rect};

use crate::BoundingBox;

/// Kilometers per degree used to turn a resolution into an angular step.
///
/// A flat approximation: it ignores the shrinking of longitude degrees
/// towards the poles.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Convert a distance in kilometers to degrees.
pub fn km_to_degrees(km: f64, km_per_degree: f64) -> f64 {
    km / km_per_degree
}

/// Spherical area in m² of an axis-aligned lon/lat cell.
pub fn cell_area_m2(cell: &BoundingBox) -> f64 {
    let rect = Rect::new(
        (cell.min_lon, cell.min_lat),
        (cell.max_lon, cell.max_lat),
    );
    rect.to_polygon().chamberlain_duquette_unsigned_area()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_km_to_degrees() {
        assert!((km_to_degrees(5.0, KM_PER_DEGREE) - 0.045045).abs() < 1e-6);
        assert_eq!(km_to_degrees(111.0, KM_PER_DEGREE), 1.0);
    }

    #[test]
    fn test_cell_area_at_equator() {
        // 0.01° x 0.01° at the equator is roughly 1.113 km x 1.113 km
        let area = cell_area_m2(&BoundingBox::new(0.0, 0.0, 0.01, 0.01));
        assert!((area - 1_239_000.0).abs() / 1_239_000.0 < 0.01, "area = {}", area);
    }

    #[test]
    fn test_cell_area_shrinks_with_latitude() {
        let equator = cell_area_m2(&BoundingBox::new(0.0, 0.0, 0.1, 0.1));
        let north = cell_area_m2(&BoundingBox::new(0.0, 60.0, 0.1, 60.1));
        // cos(60°) = 0.5
        assert!((north / equator - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_degenerate_cell_has_zero_area() {
        assert_eq!(cell_area_m2(&BoundingBox::new(1.0, 1.0, 1.0, 2.0)), 0.0);
    }
}
