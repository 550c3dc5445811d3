//! Report formatting.

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};

use crate::{RainVolumeReport, SamplingPlan};

/// Formats computation results for output.
pub struct ReportFormatter;

impl ReportFormatter {
    /// Format a volume report as a console table.
    pub fn format_table(report: &RainVolumeReport) -> String {
        let result = &report.result;
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec!["Rain Volume", ""]);

        table.add_row(vec![
            "Total Volume:",
            &format!(
                "{:.2} m³ ({:.2} liters, {:.6} hm³)",
                result.volume_m3,
                result.volume_liters(),
                result.volume_hm3()
            ),
        ]);
        table.add_row(vec![
            "Polygon Area:",
            &format!("{:.4} km² ({:.2} m²)", result.area_km2(), result.area_m2),
        ]);
        table.add_row(vec![
            "Average Precipitation:",
            &format!("{:.2} mm", result.avg_precipitation_mm),
        ]);
        table.add_row(vec![
            "Precipitation Range:",
            &format!(
                "{:.2} mm - {:.2} mm",
                result.min_precipitation_mm, result.max_precipitation_mm
            ),
        ]);
        table.add_row(vec![
            "Sample Points:",
            &format!(
                "{} (grid resolution: {} km)",
                result.num_sample_points, result.sampling_resolution_km
            ),
        ]);
        table.add_row(vec![
            "Integration Cells:",
            &format!(
                "{} (mesh resolution: {} km)",
                result.num_integration_cells, result.integration_resolution_km
            ),
        ]);

        if result.sampling_resolution_km < report.selected_resolution_km {
            table.add_row(vec![
                "Resolution Fallback:",
                &format!(
                    "{} km → {} km",
                    report.selected_resolution_km, result.sampling_resolution_km
                ),
            ]);
        }

        if report.fetch.failed > 0 {
            table.add_row(vec![
                "Failed Points:",
                &format!(
                    "{} of {} (counted as 0 mm)",
                    report.fetch.failed, report.fetch.requested
                ),
            ]);
        }

        let mut output = table.to_string();

        if let Some(forecast) = &report.forecast {
            let mut forecast_table = Table::new();
            forecast_table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec!["Forecast (UTC)", "Precipitation", "Volume"]);

            for bucket in forecast {
                forecast_table.add_row(vec![
                    bucket.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                    format!("{:.2} mm", bucket.precipitation_mm),
                    format!("{:.2} m³", bucket.volume_m3),
                ]);
            }

            if let Some(total) = report.forecast_total_m3() {
                forecast_table.add_row(vec![
                    "Total".to_string(),
                    String::new(),
                    format!("{:.2} m³", total),
                ]);
            }

            output.push('\n');
            output.push_str(&forecast_table.to_string());
        }

        output
    }

    /// Format a sampling plan as a console table.
    pub fn format_plan_table(plan: &SamplingPlan) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec!["Sampling Plan", ""]);

        table.add_row(vec![
            "Polygon Area:",
            &format!(
                "{:.4} km² ({:.2} m²)",
                plan.area_m2 / 1_000_000.0,
                plan.area_m2
            ),
        ]);
        table.add_row(vec![
            "Selected Resolution:",
            &format!("{} km", plan.selected_resolution_km),
        ]);
        table.add_row(vec![
            "Effective Resolution:",
            &format!("{} km", plan.grid.effective_resolution_km),
        ]);
        table.add_row(vec![
            "Sample Points:",
            &plan.grid.coordinates.len().to_string(),
        ]);

        table.to_string()
    }

    /// Format any serializable result as pretty JSON.
    pub fn format_json<T: serde::Serialize>(value: &T) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use volume_estimator::{ForecastVolume, VolumeResult};
    use weather_client::FetchSummary;

    fn report() -> RainVolumeReport {
        RainVolumeReport {
            computed_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            requested_resolution_km: Some(20.0),
            selected_resolution_km: 20.0,
            result: VolumeResult {
                volume_m3: 1234.5,
                area_m2: 2_000_000.0,
                avg_precipitation_mm: 0.6,
                min_precipitation_mm: 0.0,
                max_precipitation_mm: 1.2,
                num_sample_points: 3,
                num_integration_cells: 40,
                sampling_resolution_km: 5.0,
                integration_resolution_km: 1.25,
            },
            fetch: FetchSummary {
                requested: 3,
                succeeded: 2,
                failed: 1,
            },
            forecast: Some(vec![ForecastVolume {
                timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 15, 0, 0).unwrap(),
                precipitation_mm: 2.0,
                volume_m3: 4000.0,
            }]),
        }
    }

    #[test]
    fn test_table_contains_key_figures() {
        let table = ReportFormatter::format_table(&report());
        assert!(table.contains("1234.50 m³"));
        assert!(table.contains("2.0000 km²"));
        assert!(table.contains("20 km → 5 km"));
        assert!(table.contains("1 of 3"));
        assert!(table.contains("2024-05-01 15:00"));
        assert!(table.contains("4000.00 m³"));
    }

    #[test]
    fn test_json_round_trips_volume() {
        let json = ReportFormatter::format_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["result"]["volume_m3"], 1234.5);
        assert_eq!(value["fetch"]["failed"], 1);
        assert_eq!(value["forecast"][0]["volume_m3"], 4000.0);
    }
}
