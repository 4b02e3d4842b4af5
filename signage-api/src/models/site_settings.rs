use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::site_settings;

pub const DEFAULT_LOGO_SIZE: i32 = 120;
pub const DEFAULT_BACKGROUND_IMAGE_SIZE: &str = "center";
pub const DEFAULT_BG_COLOR: &str = "#000000";
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_BOX_COLOR: &str = "#212529";
pub const DEFAULT_SCHEDULE_COLOR: &str = "#212529";
pub const DEFAULT_OPACITY: f64 = 1.0;

/// Accepted values for `background_image_size`.
pub const BACKGROUND_IMAGE_SIZES: [&str; 4] = ["tile", "stretch", "fit", "center"];

/// The single row describing how the sign looks and where it is.
#[derive(
    Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize, TS,
)]
#[diesel(table_name = site_settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct SiteSettings {
    pub id: i32,
    pub logo_path: Option<String>,
    pub logo_size: Option<i32>,
    pub background_image_path: Option<String>,
    pub background_image_size: Option<String>,
    pub notes_left_col: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// IANA zone name, e.g. "America/Chicago"
    pub timezone: Option<String>,
    pub bg_color: String,
    pub text_color: String,
    pub box_color: String,
    pub box_opacity: f64,
    pub schedule_color: String,
    pub schedule_opacity: f64,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
    #[ts(type = "string")]
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = site_settings)]
pub struct NewSiteSettings {
    pub logo_path: Option<String>,
    pub logo_size: Option<i32>,
    pub background_image_path: Option<String>,
    pub background_image_size: Option<String>,
    pub notes_left_col: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub bg_color: String,
    pub text_color: String,
    pub box_color: String,
    pub box_opacity: f64,
    pub schedule_color: String,
    pub schedule_opacity: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = site_settings)]
#[diesel(treat_none_as_null = true)]
pub struct SiteSettingsChangeset {
    pub logo_path: Option<String>,
    pub logo_size: Option<i32>,
    pub background_image_path: Option<String>,
    pub background_image_size: Option<String>,
    pub notes_left_col: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub bg_color: String,
    pub text_color: String,
    pub box_color: String,
    pub box_opacity: f64,
    pub schedule_color: String,
    pub schedule_opacity: f64,
    pub updated_at: NaiveDateTime,
}

/// Body of `PUT /api/1/Settings`. Omitted appearance fields take their
/// defaults; omitted optional fields are cleared.
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct SettingsInput {
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default = "default_logo_size")]
    pub logo_size: Option<i32>,
    #[serde(default)]
    pub background_image_path: Option<String>,
    #[serde(default = "default_background_image_size")]
    pub background_image_size: Option<String>,
    #[serde(default)]
    pub notes_left_col: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default = "default_bg_color")]
    pub bg_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_box_color")]
    pub box_color: String,
    #[serde(default = "default_opacity")]
    pub box_opacity: f64,
    #[serde(default = "default_schedule_color")]
    pub schedule_color: String,
    #[serde(default = "default_opacity")]
    pub schedule_opacity: f64,
}

fn default_logo_size() -> Option<i32> {
    Some(DEFAULT_LOGO_SIZE)
}

fn default_background_image_size() -> Option<String> {
    Some(DEFAULT_BACKGROUND_IMAGE_SIZE.to_string())
}

fn default_bg_color() -> String {
    DEFAULT_BG_COLOR.to_string()
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

fn default_box_color() -> String {
    DEFAULT_BOX_COLOR.to_string()
}

fn default_schedule_color() -> String {
    DEFAULT_SCHEDULE_COLOR.to_string()
}

fn default_opacity() -> f64 {
    DEFAULT_OPACITY
}

impl Default for SettingsInput {
    fn default() -> Self {
        SettingsInput {
            logo_path: None,
            logo_size: default_logo_size(),
            background_image_path: None,
            background_image_size: default_background_image_size(),
            notes_left_col: None,
            latitude: None,
            longitude: None,
            timezone: None,
            bg_color: default_bg_color(),
            text_color: default_text_color(),
            box_color: default_box_color(),
            box_opacity: DEFAULT_OPACITY,
            schedule_color: default_schedule_color(),
            schedule_opacity: DEFAULT_OPACITY,
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SettingsInput {
    pub fn into_new(self, now: NaiveDateTime) -> NewSiteSettings {
        NewSiteSettings {
            logo_path: trimmed(self.logo_path),
            logo_size: self.logo_size,
            background_image_path: trimmed(self.background_image_path),
            background_image_size: trimmed(self.background_image_size),
            notes_left_col: self.notes_left_col,
            latitude: self.latitude,
            longitude: self.longitude,
            timezone: trimmed(self.timezone),
            bg_color: self.bg_color,
            text_color: self.text_color,
            box_color: self.box_color,
            box_opacity: self.box_opacity,
            schedule_color: self.schedule_color,
            schedule_opacity: self.schedule_opacity,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_changeset(self, now: NaiveDateTime) -> SiteSettingsChangeset {
        SiteSettingsChangeset {
            logo_path: trimmed(self.logo_path),
            logo_size: self.logo_size,
            background_image_path: trimmed(self.background_image_path),
            background_image_size: trimmed(self.background_image_size),
            notes_left_col: self.notes_left_col,
            latitude: self.latitude,
            longitude: self.longitude,
            timezone: trimmed(self.timezone),
            bg_color: self.bg_color,
            text_color: self.text_color,
            box_color: self.box_color,
            box_opacity: self.box_opacity,
            schedule_color: self.schedule_color,
            schedule_opacity: self.schedule_opacity,
            updated_at: now,
        }
    }
}
