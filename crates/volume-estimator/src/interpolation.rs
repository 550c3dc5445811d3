//! Inverse-distance-weighted interpolation over scattered samples.

use rain_common::SamplePoint;

use crate::EstimatorConfig;

/// Planar distance in degrees between two lon/lat positions.
///
/// Deliberately not a great-circle distance: neighbour ranking and weights
/// work on raw degree offsets.
pub fn planar_distance(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64) -> f64 {
    let dlon = lon_a - lon_b;
    let dlat = lat_a - lat_b;
    (dlon * dlon + dlat * dlat).sqrt()
}

/// IDW interpolator over a fixed sample set.
///
/// Uses the `k` nearest samples weighted by `1 / (d² + ε)`. A query closer
/// than the snap distance to its nearest sample returns that sample's depth
/// unchanged.
#[derive(Debug, Clone)]
pub struct IdwInterpolator<'a> {
    samples: &'a [SamplePoint],
    neighbours: usize,
    epsilon: f64,
    snap_distance: f64,
}

impl<'a> IdwInterpolator<'a> {
    pub fn new(samples: &'a [SamplePoint], config: &EstimatorConfig) -> Self {
        Self {
            samples,
            neighbours: config.idw_neighbours.max(1),
            epsilon: config.idw_epsilon,
            snap_distance: config.idw_snap_distance,
        }
    }

    /// Interpolated depth in mm at (lon, lat), or `None` with no samples.
    pub fn interpolate(&self, lon: f64, lat: f64) -> Option<f64> {
        let nearest = self.nearest(lon, lat);
        let &(closest, index) = nearest.first()?;

        if closest < self.snap_distance {
            return Some(self.samples[index].precipitation_mm);
        }

        let (weighted, total) = nearest
            .iter()
            .fold((0.0, 0.0), |(weighted, total), &(distance, index)| {
                let weight = 1.0 / (distance * distance + self.epsilon);
                (
                    weighted + weight * self.samples[index].precipitation_mm,
                    total + weight,
                )
            });

        Some(weighted / total)
    }

    /// The k nearest samples as (distance, index), closest first.
    ///
    /// Ties are broken by sample index so the choice does not depend on the
    /// selection algorithm.
    fn nearest(&self, lon: f64, lat: f64) -> Vec<(f64, usize)> {
        let mut distances: Vec<(f64, usize)> = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, s)| (planar_distance(lon, lat, s.lon, s.lat), i))
            .collect();

        let k = self.neighbours.min(distances.len());
        if k == 0 {
            return distances;
        }

        let by_distance = |a: &(f64, usize), b: &(f64, usize)| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1));
        if k < distances.len() {
            distances.select_nth_unstable_by(k - 1, by_distance);
            distances.truncate(k);
        }
        distances.sort_unstable_by(by_distance);
        distances
    }
}
