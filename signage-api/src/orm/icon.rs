use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::models::{Icon, IconInput};

pub fn list_icons(conn: &mut SqliteConnection) -> Result<Vec<Icon>, diesel::result::Error> {
    use crate::schema::icons::dsl::*;
    icons.order(name.asc()).select(Icon::as_select()).load(conn)
}

pub fn get_icon(
    conn: &mut SqliteConnection,
    icon_id: i32,
) -> Result<Option<Icon>, diesel::result::Error> {
    use crate::schema::icons::dsl::*;
    icons
        .filter(id.eq(icon_id))
        .select(Icon::as_select())
        .first(conn)
        .optional()
}

pub fn get_icon_by_name(
    conn: &mut SqliteConnection,
    icon_name: &str,
) -> Result<Option<Icon>, diesel::result::Error> {
    use crate::schema::icons::dsl::*;
    icons
        .filter(name.eq(icon_name))
        .select(Icon::as_select())
        .first(conn)
        .optional()
}

pub fn insert_icon(
    conn: &mut SqliteConnection,
    input: IconInput,
    now: NaiveDateTime,
) -> Result<Icon, diesel::result::Error> {
    use crate::schema::icons::dsl::*;

    conn.transaction(|conn| {
        diesel::insert_into(icons)
            .values(&input.into_new(now))
            .execute(conn)?;
        icons.order(id.desc()).select(Icon::as_select()).first(conn)
    })
}

/// Replaces an icon's name, flag and face. Switching face clears the columns
/// of the old one. Returns `None` if the icon does not exist.
pub fn update_icon(
    conn: &mut SqliteConnection,
    icon_id: i32,
    input: IconInput,
    now: NaiveDateTime,
) -> Result<Option<Icon>, diesel::result::Error> {
    use crate::schema::icons::dsl::*;

    let updated = diesel::update(icons.filter(id.eq(icon_id)))
        .set(&input.into_changeset(now))
        .execute(conn)?;
    if updated == 0 {
        return Ok(None);
    }
    get_icon(conn, icon_id)
}

pub fn delete_icon(conn: &mut SqliteConnection, icon_id: i32) -> Result<bool, diesel::result::Error> {
    use crate::schema::icons::dsl::*;
    let deleted = diesel::delete(icons.filter(id.eq(icon_id))).execute(conn)?;
    Ok(deleted > 0)
}
