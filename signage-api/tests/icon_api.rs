use rocket::http::{Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::{Value, json};

use signage_api::models::Icon;
use signage_api::orm::testing::{TEST_ADMIN_TOKEN, test_rocket};

fn admin() -> Header<'static> {
    Header::new("Authorization", format!("Bearer {}", TEST_ADMIN_TOKEN))
}

async fn client() -> Client {
    Client::tracked(test_rocket())
        .await
        .expect("valid rocket instance")
}

async fn create_icon(client: &Client, body: Value) -> (Status, Value) {
    let response = client
        .post("/api/1/Icons")
        .header(admin())
        .json(&body)
        .dispatch()
        .await;
    let status = response.status();
    (status, response.into_json().await.unwrap_or(Value::Null))
}

#[rocket::async_test]
async fn test_builtin_icons_listed() {
    let client = client().await;
    let response = client
        .get("/api/1/Icons/builtin")
        .header(admin())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let names: Vec<String> = response.into_json().await.expect("valid list JSON");
    assert!(names.contains(&"trophy".to_string()));
    assert_eq!(names.len(), 13);
}

#[rocket::async_test]
async fn test_icon_names_are_unique() {
    let client = client().await;
    let body = json!({"name": "ball", "face": {"kind": "glyph", "characters": "B", "font": "Sans"}});

    let (status, _) = create_icon(&client, body.clone()).await;
    assert_eq!(status, Status::Created);
    let (status, error) = create_icon(&client, body).await;
    assert_eq!(status, Status::Conflict);
    assert!(error["error"].is_string());
}

#[rocket::async_test]
async fn test_switching_face_clears_the_other() {
    let client = client().await;
    let (_, body) = create_icon(
        &client,
        json!({"name": "banner", "face": {"kind": "image", "image_path": "/static/banner.png"}}),
    )
    .await;
    let icon: Icon = serde_json::from_value(body).unwrap();

    let response = client
        .put(format!("/api/1/Icons/{}", icon.id))
        .header(admin())
        .json(&json!({"name": "banner", "enabled": false, "face": {"kind": "glyph", "characters": "F", "font": "Serif"}}))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let updated: Icon = response.into_json().await.expect("valid icon JSON");
    assert_eq!(updated.image_path, None);
    assert_eq!(updated.characters.as_deref(), Some("F"));
    assert_eq!(updated.font.as_deref(), Some("Serif"));
    assert!(!updated.enabled);
}

#[rocket::async_test]
async fn test_icon_validation_and_delete() {
    let client = client().await;

    let (status, _) = create_icon(
        &client,
        json!({"name": "blank", "face": {"kind": "glyph", "characters": "", "font": "Sans"}}),
    )
    .await;
    assert_eq!(status, Status::BadRequest);

    let (status, _) = create_icon(&client, json!({"name": "faceless"})).await;
    assert_eq!(status, Status::UnprocessableEntity);

    let (_, body) = create_icon(
        &client,
        json!({"name": "asterisk", "face": {"kind": "glyph", "characters": "*", "font": "Sans"}}),
    )
    .await;
    let icon: Icon = serde_json::from_value(body).unwrap();

    let response = client
        .delete(format!("/api/1/Icons/{}", icon.id))
        .header(admin())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client.get("/api/1/Icons").header(admin()).dispatch().await;
    let icons: Vec<Icon> = response.into_json().await.expect("valid list JSON");
    assert!(icons.is_empty());

    let response = client
        .delete(format!("/api/1/Icons/{}", icon.id))
        .header(admin())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}
