use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::models::{SettingsInput, SiteSettings};

/// Gets the settings row, if one has been saved. Should there ever be more
/// than one, the lowest id is the settings row.
pub fn get_site_settings(
    conn: &mut SqliteConnection,
) -> Result<Option<SiteSettings>, diesel::result::Error> {
    use crate::schema::site_settings::dsl::*;
    site_settings
        .order(id.asc())
        .select(SiteSettings::as_select())
        .first(conn)
        .optional()
}

/// Writes the settings row, creating it on first save.
pub fn save_site_settings(
    conn: &mut SqliteConnection,
    input: SettingsInput,
    now: NaiveDateTime,
) -> Result<SiteSettings, diesel::result::Error> {
    use crate::schema::site_settings::dsl::*;

    conn.transaction(|conn| {
        match get_site_settings(conn)? {
            Some(existing) => {
                diesel::update(site_settings.filter(id.eq(existing.id)))
                    .set(&input.into_changeset(now))
                    .execute(conn)?;
            }
            None => {
                diesel::insert_into(site_settings)
                    .values(&input.into_new(now))
                    .execute(conn)?;
            }
        }
        site_settings
            .order(id.asc())
            .select(SiteSettings::as_select())
            .first(conn)
    })
}
