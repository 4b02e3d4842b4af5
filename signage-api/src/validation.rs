//! Checks run on admin input before anything is written.

use std::sync::OnceLock;

use chrono_tz::Tz;
use regex::Regex;

use crate::models::{
    BACKGROUND_IMAGE_SIZES, IconFace, IconInput, MAX_DURATION_MINUTES, ScheduleInput,
    ScheduleItemInput, SettingsInput, is_builtin_icon,
};

const MAX_NAME_LEN: usize = 255;
const MAX_GLYPH_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{field} must be a valid hex color (e.g., #000000)")]
    InvalidColor { field: &'static str },
    #[error("background_image_size must be one of: tile, stretch, fit, center")]
    InvalidBackgroundSize,
    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),
    #[error("Icon '{0}' is neither built in nor a custom icon")]
    UnknownIcon(String),
}

fn hex_color() -> &'static Regex {
    static HEX_COLOR: OnceLock<Regex> = OnceLock::new();
    HEX_COLOR.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex color pattern is valid"))
}

fn required_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { field, min, max })
    }
}

fn color(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if hex_color().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidColor { field })
    }
}

pub fn validate_schedule(input: &ScheduleInput) -> Result<(), ValidationError> {
    required_text("name", &input.name, MAX_NAME_LEN)
}

/// Field checks for an item. The icon reference is checked separately by
/// `validate_icon_reference` since that needs the icon table.
pub fn validate_schedule_item(input: &ScheduleItemInput) -> Result<(), ValidationError> {
    if let Some(minutes) = input.duration_minutes {
        in_range(
            "duration_minutes",
            f64::from(minutes),
            1.0,
            f64::from(MAX_DURATION_MINUTES),
        )?;
    }
    if let Some(name) = &input.name {
        if name.trim().chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_NAME_LEN,
            });
        }
    }
    Ok(())
}

/// The icon name an item would store, if any.
pub fn item_icon_name(input: &ScheduleItemInput) -> Option<&str> {
    input
        .icon
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Accepts no icon, a built-in identifier, or the name of an existing custom
/// icon (`custom_exists`).
pub fn validate_icon_reference(icon: Option<&str>, custom_exists: bool) -> Result<(), ValidationError> {
    match icon {
        None => Ok(()),
        Some(name) if is_builtin_icon(name) || custom_exists => Ok(()),
        Some(name) => Err(ValidationError::UnknownIcon(name.to_string())),
    }
}

pub fn validate_settings(input: &SettingsInput) -> Result<(), ValidationError> {
    if let Some(size) = input.logo_size {
        in_range("logo_size", f64::from(size), 50.0, 500.0)?;
    }
    if let Some(mode) = input.background_image_size.as_deref().map(str::trim) {
        if !mode.is_empty() && !BACKGROUND_IMAGE_SIZES.contains(&mode) {
            return Err(ValidationError::InvalidBackgroundSize);
        }
    }
    if let Some(lat) = input.latitude {
        in_range("latitude", lat, -90.0, 90.0)?;
    }
    if let Some(lon) = input.longitude {
        in_range("longitude", lon, -180.0, 180.0)?;
    }
    if let Some(tz) = input.timezone.as_deref().map(str::trim) {
        if !tz.is_empty() && tz.parse::<Tz>().is_err() {
            return Err(ValidationError::UnknownTimezone(tz.to_string()));
        }
    }
    color("bg_color", &input.bg_color)?;
    color("text_color", &input.text_color)?;
    color("box_color", &input.box_color)?;
    color("schedule_color", &input.schedule_color)?;
    in_range("box_opacity", input.box_opacity, 0.0, 1.0)?;
    in_range("schedule_opacity", input.schedule_opacity, 0.0, 1.0)?;
    Ok(())
}

/// Name and face checks. Name uniqueness is left to the table's UNIQUE
/// constraint.
pub fn validate_icon(input: &IconInput) -> Result<(), ValidationError> {
    required_text("name", &input.name, MAX_NAME_LEN)?;
    match &input.face {
        IconFace::Image { image_path } => required_text("image_path", image_path, 512),
        IconFace::Glyph { characters, font } => {
            if characters.is_empty() {
                return Err(ValidationError::Required { field: "characters" });
            }
            if characters.chars().count() > MAX_GLYPH_LEN {
                return Err(ValidationError::TooLong {
                    field: "characters",
                    max: MAX_GLYPH_LEN,
                });
            }
            required_text("font", font, 100)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn settings_defaults_are_valid() {
        assert_eq!(validate_settings(&SettingsInput::default()), Ok(()));
    }

    #[test]
    fn bad_colors_are_rejected() {
        for bad in ["000000", "#00000", "#0000000", "#GGGGGG", "red"] {
            let input = SettingsInput {
                text_color: bad.to_string(),
                ..Default::default()
            };
            assert_eq!(
                validate_settings(&input),
                Err(ValidationError::InvalidColor { field: "text_color" }),
                "{} should be rejected",
                bad
            );
        }
        let ok = SettingsInput {
            box_color: "#A1b2C3".to_string(),
            ..Default::default()
        };
        assert_eq!(validate_settings(&ok), Ok(()));
    }

    #[test]
    fn ranges_are_enforced() {
        let cases = [
            SettingsInput { box_opacity: 1.01, ..Default::default() },
            SettingsInput { schedule_opacity: -0.1, ..Default::default() },
            SettingsInput { logo_size: Some(49), ..Default::default() },
            SettingsInput { logo_size: Some(501), ..Default::default() },
            SettingsInput { latitude: Some(90.5), ..Default::default() },
            SettingsInput { longitude: Some(-180.5), ..Default::default() },
        ];
        for input in cases {
            assert!(matches!(
                validate_settings(&input),
                Err(ValidationError::OutOfRange { .. })
            ));
        }
    }

    #[test]
    fn background_mode_and_timezone_are_checked() {
        let mode = SettingsInput {
            background_image_size: Some("cover".to_string()),
            ..Default::default()
        };
        assert_eq!(validate_settings(&mode), Err(ValidationError::InvalidBackgroundSize));

        let tz = SettingsInput {
            timezone: Some("Mars/Olympus".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&tz),
            Err(ValidationError::UnknownTimezone("Mars/Olympus".to_string()))
        );

        let good = SettingsInput {
            timezone: Some("Europe/Berlin".to_string()),
            background_image_size: Some("tile".to_string()),
            ..Default::default()
        };
        assert_eq!(validate_settings(&good), Ok(()));
    }

    #[test]
    fn item_duration_must_be_within_a_day() {
        let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let mut input = ScheduleItemInput {
            start_time: start,
            duration_minutes: Some(0),
            ..Default::default()
        };
        assert!(validate_schedule_item(&input).is_err());
        input.duration_minutes = Some(1441);
        assert!(validate_schedule_item(&input).is_err());
        input.duration_minutes = Some(1440);
        assert_eq!(validate_schedule_item(&input), Ok(()));
        input.duration_minutes = None;
        assert_eq!(validate_schedule_item(&input), Ok(()));
    }

    #[test]
    fn icon_references() {
        assert_eq!(validate_icon_reference(None, false), Ok(()));
        assert_eq!(validate_icon_reference(Some("trophy"), false), Ok(()));
        assert_eq!(validate_icon_reference(Some("whistle"), true), Ok(()));
        assert_eq!(
            validate_icon_reference(Some("whistle"), false),
            Err(ValidationError::UnknownIcon("whistle".to_string()))
        );
    }

    #[test]
    fn blank_item_icon_counts_as_none() {
        let input = ScheduleItemInput {
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            icon: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(item_icon_name(&input), None);
    }

    #[test]
    fn schedule_name_is_required() {
        let input = ScheduleInput {
            name: "   ".to_string(),
            date: None,
            is_default: false,
            show_name: true,
        };
        assert_eq!(
            validate_schedule(&input),
            Err(ValidationError::Required { field: "name" })
        );
    }

    #[test]
    fn glyph_icons_need_characters_and_font() {
        let no_font = IconInput {
            name: "ball".to_string(),
            enabled: true,
            face: IconFace::Glyph {
                characters: "⚽".to_string(),
                font: " ".to_string(),
            },
        };
        assert_eq!(
            validate_icon(&no_font),
            Err(ValidationError::Required { field: "font" })
        );

        let no_chars = IconInput {
            name: "ball".to_string(),
            enabled: true,
            face: IconFace::Glyph {
                characters: String::new(),
                font: "Arial".to_string(),
            },
        };
        assert_eq!(
            validate_icon(&no_chars),
            Err(ValidationError::Required { field: "characters" })
        );

        let image = IconInput {
            name: "ball".to_string(),
            enabled: true,
            face: IconFace::Image {
                image_path: "uploads/ball.png".to_string(),
            },
        };
        assert_eq!(validate_icon(&image), Ok(()));
    }
}
