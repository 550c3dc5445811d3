//! Numerical integration of the interpolated precipitation field.

use rain_common::{
    cell_area_m2, km_to_degrees, BoundingBox, Coordinate, Polygon, RainError, RainResult,
    SamplePoint,
};
use rayon::prelude::*;
use tracing::debug;

use crate::{EstimatorConfig, IdwInterpolator, SampleStats, VolumeResult};

const CELL_COUNT_TOLERANCE: f64 = 1e-9;

/// Integration mesh laid over a bounding box.
///
/// Cells start at the box's minimum corner and are clipped on the max edges,
/// so together they tile the box exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationMesh {
    pub bounds: BoundingBox,
    /// Cell edge in degrees.
    pub step: f64,
    pub cols: usize,
    pub rows: usize,
}

impl IntegrationMesh {
    /// Returns `None` when the cell count does not fit in a `usize`.
    pub fn new(bounds: BoundingBox, step: f64) -> Option<Self> {
        let cols = cells_along(bounds.width(), step)?;
        let rows = cells_along(bounds.height(), step)?;
        cols.checked_mul(rows)?;
        Some(Self {
            bounds,
            step,
            cols,
            rows,
        })
    }

    /// Bounds of the cell at column `i`, row `j`.
    pub fn cell_bounds(&self, i: usize, j: usize) -> BoundingBox {
        let min_lon = self.bounds.min_lon + i as f64 * self.step;
        let min_lat = self.bounds.min_lat + j as f64 * self.step;
        BoundingBox::new(
            min_lon,
            min_lat,
            (min_lon + self.step).min(self.bounds.max_lon),
            (min_lat + self.step).min(self.bounds.max_lat),
        )
    }

    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn cells_along(extent: f64, step: f64) -> Option<usize> {
    let cells = (extent / step - CELL_COUNT_TOLERANCE).ceil().max(1.0);
    if !cells.is_finite() || cells >= usize::MAX as f64 {
        return None;
    }
    Some(cells as usize)
}

/// A mesh cell whose center lies inside the polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationCell {
    pub bounds: BoundingBox,
    pub area_m2: f64,
    pub precipitation_mm: f64,
}

impl IntegrationCell {
    pub fn center(&self) -> Coordinate {
        let (lon, lat) = self.bounds.center();
        Coordinate::new(lon, lat)
    }

    pub fn volume_m3(&self) -> f64 {
        self.area_m2 * self.precipitation_mm / 1_000.0
    }
}

/// Volume and cell count accumulated over one mesh row.
#[derive(Debug, Clone, Copy, Default)]
struct RowTally {
    volume_m3: f64,
    cells: usize,
}

/// Integrate the IDW field of `samples` over `polygon`.
///
/// The mesh is `integration_subdivisions` times finer than
/// `sampling_resolution_km`. Rows may be evaluated in parallel but their
/// tallies are always summed in row order, so the result does not depend on
/// scheduling. A mesh larger than `max_lattice_points` cells is rejected
/// with `InvalidResolution`.
pub fn estimate_volume(
    samples: &[SamplePoint],
    polygon: &Polygon,
    sampling_resolution_km: f64,
    config: &EstimatorConfig,
) -> RainResult<VolumeResult> {
    if !(sampling_resolution_km.is_finite() && sampling_resolution_km > 0.0) {
        return Err(RainError::InvalidResolution(sampling_resolution_km));
    }
    let stats = SampleStats::from_samples(samples)?;

    let integration_resolution_km = config.integration_resolution_km(sampling_resolution_km);
    let step = km_to_degrees(integration_resolution_km, config.km_per_degree);
    let mesh = IntegrationMesh::new(polygon.bounding_box(), step)
        .filter(|mesh| mesh.len() <= config.max_lattice_points)
        .ok_or(RainError::InvalidResolution(sampling_resolution_km))?;
    let idw = IdwInterpolator::new(samples, config);

    let tallies: Vec<RowTally> = if config.parallel {
        (0..mesh.rows)
            .into_par_iter()
            .map(|j| integrate_row(&mesh, j, polygon, &idw))
            .collect()
    } else {
        (0..mesh.rows)
            .map(|j| integrate_row(&mesh, j, polygon, &idw))
            .collect()
    };

    let total = tallies.iter().fold(RowTally::default(), |acc, row| RowTally {
        volume_m3: acc.volume_m3 + row.volume_m3,
        cells: acc.cells + row.cells,
    });

    debug!(
        mesh_cells = mesh.len(),
        included_cells = total.cells,
        volume_m3 = total.volume_m3,
        "Integrated precipitation field"
    );

    Ok(VolumeResult {
        volume_m3: total.volume_m3,
        area_m2: polygon.area_m2(),
        avg_precipitation_mm: stats.avg_mm,
        min_precipitation_mm: stats.min_mm,
        max_precipitation_mm: stats.max_mm,
        num_sample_points: stats.count,
        num_integration_cells: total.cells,
        sampling_resolution_km,
        integration_resolution_km,
    })
}

/// Cells of row `j` whose center passes the polygon test.
pub fn included_cells<'a>(
    mesh: &'a IntegrationMesh,
    j: usize,
    polygon: &'a Polygon,
    idw: &'a IdwInterpolator<'a>,
) -> impl Iterator<Item = IntegrationCell> + 'a {
    (0..mesh.cols).filter_map(move |i| {
        let bounds = mesh.cell_bounds(i, j);
        let (lon, lat) = bounds.center();
        if !polygon.contains(lon, lat) {
            return None;
        }
        Some(IntegrationCell {
            bounds,
            area_m2: cell_area_m2(&bounds),
            precipitation_mm: idw.interpolate(lon, lat).unwrap_or(0.0),
        })
    })
}

fn integrate_row(
    mesh: &IntegrationMesh,
    j: usize,
    polygon: &Polygon,
    idw: &IdwInterpolator<'_>,
) -> RowTally {
    included_cells(mesh, j, polygon, idw).fold(RowTally::default(), |acc, cell| RowTally {
        volume_m3: acc.volume_m3 + cell.volume_m3(),
        cells: acc.cells + 1,
    })
}
