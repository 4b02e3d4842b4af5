/// Icon and summary for codes the table does not know.
pub const FALLBACK: (&str, &str) = ("cloud", "Weather");

/// Maps a WMO weather code to the sign's `(icon, summary)` pair.
/// See: https://open-meteo.com/en/docs#weathervariables
pub fn describe_weather_code(code: i64) -> (&'static str, &'static str) {
    match code {
        0 => ("sun", "Clear"),
        1 => ("sun", "Mainly clear"),
        2 => ("cloud", "Partly cloudy"),
        3 => ("clouds", "Overcast"),
        45 => ("cloud-fog", "Fog"),
        48 => ("cloud-fog", "Rime fog"),
        51 => ("cloud-drizzle", "Light drizzle"),
        53 => ("cloud-drizzle", "Drizzle"),
        55 => ("cloud-drizzle", "Heavy drizzle"),
        61 => ("cloud-rain", "Light rain"),
        63 => ("cloud-rain", "Rain"),
        65 => ("cloud-rain", "Heavy rain"),
        71 => ("cloud-snow", "Snow"),
        80 => ("cloud-rain", "Rain showers"),
        95 => ("cloud-lightning", "Thunderstorm"),
        _ => FALLBACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_codes() {
        assert_eq!(describe_weather_code(0), ("sun", "Clear"));
        assert_eq!(describe_weather_code(1), ("sun", "Mainly clear"));
    }

    #[test]
    fn test_cloud_codes() {
        assert_eq!(describe_weather_code(2), ("cloud", "Partly cloudy"));
        assert_eq!(describe_weather_code(3), ("clouds", "Overcast"));
        assert_eq!(describe_weather_code(48), ("cloud-fog", "Rime fog"));
    }

    #[test]
    fn test_precipitation_codes() {
        assert_eq!(describe_weather_code(53), ("cloud-drizzle", "Drizzle"));
        assert_eq!(describe_weather_code(65), ("cloud-rain", "Heavy rain"));
        assert_eq!(describe_weather_code(71), ("cloud-snow", "Snow"));
        assert_eq!(describe_weather_code(80), ("cloud-rain", "Rain showers"));
        assert_eq!(describe_weather_code(95), ("cloud-lightning", "Thunderstorm"));
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        assert_eq!(describe_weather_code(4), FALLBACK);
        assert_eq!(describe_weather_code(99), FALLBACK);
        assert_eq!(describe_weather_code(-1), FALLBACK);
    }
}
