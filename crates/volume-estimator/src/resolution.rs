//! Sampling resolution policy.

use rain_common::{RainError, RainResult};

use crate::EstimatorConfig;

/// Upper area bound (km², inclusive except for the first) → sampling resolution (km).
///
/// The first breakpoint is exclusive: an area of exactly 20 km² gets 2 km.
const RESOLUTION_BREAKPOINTS: [(f64, f64); 5] = [
    (20.0, 1.5),
    (200.0, 2.0),
    (1_000.0, 5.0),
    (2_000.0, 8.0),
    (20_000.0, 20.0),
];

/// Fail with `AreaTooLarge` when the area exceeds the configured limit.
pub fn ensure_area_within_limit(area_m2: f64, config: &EstimatorConfig) -> RainResult<()> {
    let area_km2 = area_m2 / 1_000_000.0;
    if area_km2 > config.max_area_km2 {
        return Err(RainError::AreaTooLarge {
            area_km2,
            limit_km2: config.max_area_km2,
        });
    }
    Ok(())
}

/// Pick a sampling resolution in km from the polygon area.
pub fn select_resolution(area_m2: f64, config: &EstimatorConfig) -> RainResult<f64> {
    ensure_area_within_limit(area_m2, config)?;

    let area_km2 = area_m2 / 1_000_000.0;
    let (first_limit, first_resolution) = RESOLUTION_BREAKPOINTS[0];
    if area_km2 < first_limit {
        return Ok(first_resolution);
    }

    let resolution = RESOLUTION_BREAKPOINTS[1..]
        .iter()
        .find(|(limit, _)| area_km2 <= *limit)
        .map(|&(_, resolution)| resolution)
        // Areas between the last breakpoint and a raised limit use the coarsest step.
        .unwrap_or(RESOLUTION_BREAKPOINTS[RESOLUTION_BREAKPOINTS.len() - 1].1);

    Ok(resolution)
}
