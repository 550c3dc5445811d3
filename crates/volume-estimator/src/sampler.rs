//! Adaptive grid sampling of a polygon.

use rain_common::{km_to_degrees, BoundingBox, Coordinate, Polygon, RainError, RainResult};
use serde::Serialize;
use tracing::{debug, info};

use crate::EstimatorConfig;

/// Slack when counting lattice steps, so a point that lands on the max edge
/// through rounding is not dropped.
const STEP_COUNT_TOLERANCE: f64 = 1e-9;

/// A regular lon/lat lattice anchored at a bounding box's minimum corner.
///
/// Points are computed as `origin + index * step` rather than by repeated
/// addition, so the same box and step always yield bit-identical points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    pub origin_lon: f64,
    pub origin_lat: f64,
    /// Spacing in degrees on both axes.
    pub step: f64,
    /// Points along longitude.
    pub nx: usize,
    /// Points along latitude.
    pub ny: usize,
}

impl Lattice {
    /// Lattice over `bbox` with `step` degrees between points, covering every
    /// point `min + k * step` that does not exceed the box's max edge.
    ///
    /// Returns `None` when the point count does not fit in a `usize`.
    pub fn over(bbox: &BoundingBox, step: f64) -> Option<Self> {
        let nx = points_along(bbox.width(), step)?;
        let ny = points_along(bbox.height(), step)?;
        nx.checked_mul(ny)?;
        Some(Self {
            origin_lon: bbox.min_lon,
            origin_lat: bbox.min_lat,
            step,
            nx,
            ny,
        })
    }

    /// Coordinate of the point at column `i`, row `j`.
    pub fn point(&self, i: usize, j: usize) -> Coordinate {
        Coordinate::new(
            self.origin_lon + i as f64 * self.step,
            self.origin_lat + j as f64 * self.step,
        )
    }

    /// All lattice points, row by row from the southernmost.
    pub fn points(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.ny).flat_map(move |j| (0..self.nx).map(move |i| self.point(i, j)))
    }

    /// Total number of lattice points; fits a `usize` by construction.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn points_along(extent: f64, step: f64) -> Option<usize> {
    let steps = (extent / step + STEP_COUNT_TOLERANCE).floor().max(0.0);
    if !steps.is_finite() || steps >= usize::MAX as f64 {
        return None;
    }
    (steps as usize).checked_add(1)
}

/// Sample coordinates inside a polygon and the resolution that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleGrid {
    pub coordinates: Vec<Coordinate>,
    pub requested_resolution_km: f64,
    /// Differs from the request when the lattice had to be refined.
    pub effective_resolution_km: f64,
}

impl SampleGrid {
    /// Whether the requested resolution had to be refined.
    pub fn fell_back(&self) -> bool {
        self.effective_resolution_km < self.requested_resolution_km
    }
}

/// Lays sampling lattices over polygons.
#[derive(Debug, Clone, Default)]
pub struct GridSampler {
    config: EstimatorConfig,
}

impl GridSampler {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// Lattice points inside `polygon` at `resolution_km`, with no fallback.
    ///
    /// Fails with `InvalidResolution` when the lattice over the bounding box
    /// would exceed `max_lattice_points`.
    pub fn points_inside(&self, polygon: &Polygon, resolution_km: f64) -> RainResult<Vec<Coordinate>> {
        let step = km_to_degrees(resolution_km, self.config.km_per_degree);
        let lattice = Lattice::over(&polygon.bounding_box(), step)
            .filter(|lattice| lattice.len() <= self.config.max_lattice_points)
            .ok_or(RainError::InvalidResolution(resolution_km))?;

        Ok(lattice
            .points()
            .filter(|c| polygon.contains(c.lon, c.lat))
            .collect())
    }

    /// Sample `polygon`, halving the resolution until at least one lattice
    /// point falls inside.
    ///
    /// Halving floors to whole kilometers and never goes below the configured
    /// minimum; once the minimum itself yields nothing the polygon is
    /// rejected with `InsufficientSampleArea`.
    pub fn sample(&self, polygon: &Polygon, requested_resolution_km: f64) -> RainResult<SampleGrid> {
        if !(requested_resolution_km.is_finite() && requested_resolution_km > 0.0) {
            return Err(RainError::InvalidResolution(requested_resolution_km));
        }

        let min_resolution = self.config.min_resolution_km;
        let mut resolution = requested_resolution_km;

        loop {
            let coordinates = self.points_inside(polygon, resolution)?;
            debug!(
                resolution_km = resolution,
                points = coordinates.len(),
                "Sampled lattice"
            );

            if !coordinates.is_empty() {
                if resolution < requested_resolution_km {
                    info!(
                        requested_km = requested_resolution_km,
                        effective_km = resolution,
                        "Refined sampling resolution to fit polygon"
                    );
                }
                return Ok(SampleGrid {
                    coordinates,
                    requested_resolution_km,
                    effective_resolution_km: resolution,
                });
            }

            if resolution <= min_resolution {
                return Err(RainError::InsufficientSampleArea {
                    min_resolution_km: min_resolution,
                });
            }

            resolution = next_resolution(resolution, min_resolution);
        }
    }
}

/// Half of `resolution_km`, floored to whole km, never below `min_km`.
pub fn next_resolution(resolution_km: f64, min_km: f64) -> f64 {
    (resolution_km / 2.0).floor().max(min_km)
}
