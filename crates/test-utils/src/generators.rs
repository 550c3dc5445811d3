//! Generators for synthetic sample points.

use rain_common::{Coordinate, SamplePoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The same depth at every coordinate.
///
/// # Example
///
/// ```
/// use rain_common::Coordinate;
/// use test_utils::uniform_samples;
///
/// let samples = uniform_samples(&[Coordinate::new(0.0, 0.0)], 10.0);
/// assert_eq!(samples[0].precipitation_mm, 10.0);
/// ```
pub fn uniform_samples(coordinates: &[Coordinate], mm: f64) -> Vec<SamplePoint> {
    coordinates.iter().map(|&c| SamplePoint::at(c, mm)).collect()
}

/// Depth rising linearly eastwards: `base_mm + mm_per_degree * (lon - origin_lon)`.
pub fn eastward_gradient(
    coordinates: &[Coordinate],
    origin_lon: f64,
    base_mm: f64,
    mm_per_degree: f64,
) -> Vec<SamplePoint> {
    coordinates
        .iter()
        .map(|&c| SamplePoint::at(c, base_mm + mm_per_degree * (c.lon - origin_lon)))
        .collect()
}

/// Seeded pseudo-random depths in `[0, max_mm)`; the same seed always
/// yields the same samples.
pub fn scattered_samples(coordinates: &[Coordinate], max_mm: f64, seed: u64) -> Vec<SamplePoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    coordinates
        .iter()
        .map(|&c| SamplePoint::at(c, rng.gen_range(0.0..max_mm)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient() {
        let coords = [Coordinate::new(1.0, 0.0), Coordinate::new(3.0, 0.0)];
        let samples = eastward_gradient(&coords, 1.0, 2.0, 0.5);
        assert_eq!(samples[0].precipitation_mm, 2.0);
        assert_eq!(samples[1].precipitation_mm, 3.0);
    }

    #[test]
    fn test_scattered_is_reproducible_and_bounded() {
        let coords: Vec<_> = (0..50).map(|i| Coordinate::new(i as f64 * 0.01, 0.0)).collect();
        let a = scattered_samples(&coords, 20.0, 7);
        let b = scattered_samples(&coords, 20.0, 7);
        assert_eq!(a, b);
        assert!(a.iter().all(|s| (0.0..20.0).contains(&s.precipitation_mm)));
    }
}
