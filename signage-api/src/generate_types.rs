//! Writes the TypeScript definitions for the API's JSON shapes.
//!
//! Output goes to `SIGNAGE_TS_OUTPUT_DIR` when set, otherwise
//! `../ts-bindings`. Stale `.ts` files there are removed first so renamed
//! types do not linger.

#[cfg(test)]
mod tests {
    use std::{env, path::Path};

    use ts_rs::TS;

    #[test]
    fn generate_typescript_types() {
        let output_dir_str =
            env::var("SIGNAGE_TS_OUTPUT_DIR").unwrap_or_else(|_| "../ts-bindings".to_string());
        let output_dir = Path::new(&output_dir_str);

        std::fs::create_dir_all(output_dir).expect("Failed to create output directory");
        for entry in std::fs::read_dir(output_dir).expect("Failed to read output directory") {
            let path = entry.expect("Failed to read directory entry").path();
            if path.extension().and_then(|s| s.to_str()) == Some("ts") {
                std::fs::remove_file(&path)
                    .unwrap_or_else(|e| panic!("Failed to remove {:?}: {}", path, e));
            }
        }

        unsafe {
            env::set_var("TS_RS_EXPORT_DIR", output_dir);
        }

        use crate::api::ErrorResponse;
        use crate::api::status::HealthStatus;
        use crate::api::weather_cache::PruneResult;
        use crate::display::{DisplayPayload, DisplaySettings, UpdateStatus};
        use crate::models::*;
        use crate::weather::{WeatherReport, WeatherSlot};

        Schedule::export().expect("Failed to export Schedule type");
        ScheduleInput::export().expect("Failed to export ScheduleInput type");
        ScheduleItem::export().expect("Failed to export ScheduleItem type");
        ScheduleItemInput::export().expect("Failed to export ScheduleItemInput type");
        SiteSettings::export().expect("Failed to export SiteSettings type");
        SettingsInput::export().expect("Failed to export SettingsInput type");
        Icon::export().expect("Failed to export Icon type");
        IconFace::export().expect("Failed to export IconFace type");
        IconInput::export().expect("Failed to export IconInput type");
        WeatherCacheRow::export().expect("Failed to export WeatherCacheRow type");

        WeatherSlot::export().expect("Failed to export WeatherSlot type");
        WeatherReport::export().expect("Failed to export WeatherReport type");
        DisplaySettings::export().expect("Failed to export DisplaySettings type");
        DisplayPayload::export().expect("Failed to export DisplayPayload type");
        UpdateStatus::export().expect("Failed to export UpdateStatus type");

        ErrorResponse::export().expect("Failed to export ErrorResponse type");
        HealthStatus::export().expect("Failed to export HealthStatus type");
        PruneResult::export().expect("Failed to export PruneResult type");

        println!("TypeScript types generated successfully in {:?}", output_dir);
    }
}
