use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::icons;

/// Icon identifiers the display knows how to draw without an `icons` row.
pub const BUILTIN_ICONS: [&str; 13] = [
    "info",
    "star",
    "flag",
    "calendar",
    "clock",
    "bell",
    "exclamation",
    "check",
    "heart",
    "fire",
    "trophy",
    "lightning",
    "shield",
];

pub fn is_builtin_icon(name: &str) -> bool {
    BUILTIN_ICONS.contains(&name)
}

/// A custom icon. Exactly one of `image_path` and `characters` is set; the
/// table's CHECK constraint holds the line.
#[derive(
    Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize, TS,
)]
#[diesel(table_name = icons)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Icon {
    pub id: i32,
    pub name: String,
    pub enabled: bool,
    pub image_path: Option<String>,
    pub characters: Option<String>,
    pub font: Option<String>,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
    #[ts(type = "string")]
    pub updated_at: NaiveDateTime,
}

/// How an icon is drawn: an uploaded picture or characters in a font.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, TS)]
#[serde(tag = "kind", rename_all = "lowercase")]
#[ts(export)]
pub enum IconFace {
    Image { image_path: String },
    Glyph { characters: String, font: String },
}

impl IconFace {
    /// Column values for this face. The columns of the other face come back
    /// as `None`, which is what clears them on a switch.
    fn columns(self) -> (Option<String>, Option<String>, Option<String>) {
        match self {
            IconFace::Image { image_path } => (Some(image_path.trim().to_string()), None, None),
            IconFace::Glyph { characters, font } => {
                (None, Some(characters), Some(font.trim().to_string()))
            }
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = icons)]
pub struct NewIcon {
    pub name: String,
    pub enabled: bool,
    pub image_path: Option<String>,
    pub characters: Option<String>,
    pub font: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = icons)]
#[diesel(treat_none_as_null = true)]
pub struct IconChangeset {
    pub name: String,
    pub enabled: bool,
    pub image_path: Option<String>,
    pub characters: Option<String>,
    pub font: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// For API inputs and validation
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct IconInput {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub face: IconFace,
}

fn default_enabled() -> bool {
    true
}

impl IconInput {
    pub fn into_new(self, now: NaiveDateTime) -> NewIcon {
        let (image_path, characters, font) = self.face.columns();
        NewIcon {
            name: self.name.trim().to_string(),
            enabled: self.enabled,
            image_path,
            characters,
            font,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_changeset(self, now: NaiveDateTime) -> IconChangeset {
        let (image_path, characters, font) = self.face.columns();
        IconChangeset {
            name: self.name.trim().to_string(),
            enabled: self.enabled,
            image_path,
            characters,
            font,
            updated_at: now,
        }
    }
}
