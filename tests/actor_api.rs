//! HTTP-level integration tests for the actor routes, both response modes.
//!
//! Uses tower::ServiceExt to send requests directly to the router without a
//! TCP listener; each test gets its own database via #[sqlx::test].

mod common;

use axum::http::{header, StatusCode};
use common::{body_json, body_string, build_test_app, delete_json, get_html, get_json, post_form, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test]
async fn create_actor_json_returns_200_with_record(pool: PgPool) {
    let app = build_test_app(pool).await;
    let res = post_json(
        app,
        "/actors/create",
        json!({"name": "Jackie Chan", "age": "69", "gender": "Male", "image_link": ""}),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["actor"][0]["name"], "Jackie Chan");
    assert!(body["actor"][0]["id"].is_number());
    assert_eq!(body["total"], 1);
}

#[sqlx::test]
async fn created_actor_is_fetchable_by_id_with_equal_fields(pool: PgPool) {
    let app = build_test_app(pool).await;
    let res = post_json(
        app.clone(),
        "/actors/create",
        json!({"name": "Michelle Yeoh", "age": "61", "gender": "Female", "image_link": "https://example.com/yeoh.png"}),
    )
    .await;
    let created = body_json(res).await;
    let id = created["actor"][0]["id"].as_i64().expect("id");

    let res = get_json(app, &format!("/actors/{id}")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["success"], true);
    let actor = &body["actor"][0];
    assert_eq!(actor["name"], "Michelle Yeoh");
    assert_eq!(actor["age"], "61");
    assert_eq!(actor["gender"], "Female");
    assert_eq!(actor["image_link"], "https://example.com/yeoh.png");
}

#[sqlx::test]
async fn create_rejects_missing_fields_in_json_too(pool: PgPool) {
    let app = build_test_app(pool.clone()).await;
    let res = post_json(app, "/actors/create", json!({"name": "No Age"})).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 400);
    assert_eq!(body["message"], "bad request");

    // Nothing was persisted.
    let app = build_test_app(pool).await;
    let body = body_json(get_json(app, "/actors").await).await;
    assert_eq!(body["actors"].as_array().map(Vec::len), Some(0));
}

#[sqlx::test]
async fn list_actors_returns_all_ordered_by_id(pool: PgPool) {
    let app = build_test_app(pool).await;
    for name in ["Tom Cruise", "Emily Blunt"] {
        let res = post_json(
            app.clone(),
            "/actors/create",
            json!({"name": name, "age": "50", "gender": "Other"}),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let body = body_json(get_json(app, "/actors").await).await;
    assert_eq!(body["success"], true);
    let actors = body["actors"].as_array().expect("actors array");
    assert_eq!(actors.len(), 2);
    assert_eq!(actors[0]["name"], "Tom Cruise");
    assert_eq!(actors[1]["name"], "Emily Blunt");
    assert!(actors[0]["id"].as_i64() < actors[1]["id"].as_i64());
}

#[sqlx::test]
async fn search_matches_case_insensitive_substring(pool: PgPool) {
    let app = build_test_app(pool).await;
    post_json(
        app.clone(),
        "/actors/create",
        json!({"name": "Tom Cruise", "age": "61", "gender": "Male"}),
    )
    .await;
    post_json(
        app.clone(),
        "/actors/create",
        json!({"name": "Emily Blunt", "age": "40", "gender": "Female"}),
    )
    .await;

    let res = post_json(app, "/actors/search", json!({"search_term": "tom"})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 1);
    assert_eq!(body["actors"][0]["name"], "Tom Cruise");
}

#[sqlx::test]
async fn search_with_empty_term_returns_404(pool: PgPool) {
    let app = build_test_app(pool).await;
    let res = post_json(app, "/actors/search", json!({"search_term": ""})).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 404);
    assert_eq!(body["message"], "resource not found");
}

#[sqlx::test]
async fn search_with_missing_or_blank_term_returns_404(pool: PgPool) {
    let app = build_test_app(pool).await;
    let res = post_json(app.clone(), "/actors/search", json!({})).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = post_json(app, "/actors/search", json!({"search_term": "   "})).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn show_unknown_actor_returns_422(pool: PgPool) {
    let app = build_test_app(pool).await;
    let res = get_json(app, "/actors/9999999").await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 422);
    assert_eq!(body["message"], "unprocessable");
}

#[sqlx::test]
async fn update_overwrites_fields_in_place(pool: PgPool) {
    let app = build_test_app(pool).await;
    let created = body_json(
        post_json(
            app.clone(),
            "/actors/create",
            json!({"name": "Jackie Chan", "age": "68", "gender": "Male"}),
        )
        .await,
    )
    .await;
    let id = created["actor"][0]["id"].as_i64().expect("id");

    let res = post_json(
        app.clone(),
        &format!("/actors/{id}/edit"),
        json!({"name": "Jackie Chan", "age": "69", "gender": "Male"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["actor"][0]["age"], "69");

    let body = body_json(get_json(app, &format!("/actors/{id}")).await).await;
    assert_eq!(body["actor"][0]["age"], "69");
    assert_eq!(body["actor"][0]["name"], "Jackie Chan");
    assert_eq!(body["actor"][0]["id"], id);
}

#[sqlx::test]
async fn wrong_method_on_id_route_returns_405(pool: PgPool) {
    let app = build_test_app(pool).await;
    let res = post_json(app, "/actors/1", json!({})).await;

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 405);
    assert_eq!(body["message"], "method not allowed");
}

#[sqlx::test]
async fn delete_acknowledges_with_string_id_and_removes_the_row(pool: PgPool) {
    let app = build_test_app(pool).await;
    let created = body_json(
        post_json(
            app.clone(),
            "/actors/create",
            json!({"name": "To Remove", "age": "30", "gender": "Other"}),
        )
        .await,
    )
    .await;
    let id = created["actor"][0]["id"].as_i64().expect("id");

    let res = delete_json(app.clone(), &format!("/actors/{id}")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["actor_id"], id.to_string());

    let res = get_json(app, &format!("/actors/{id}")).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test]
async fn list_without_json_content_type_renders_a_page(pool: PgPool) {
    let app = build_test_app(pool).await;
    post_json(
        app.clone(),
        "/actors/create",
        json!({"name": "Tom Cruise", "age": "61", "gender": "Male"}),
    )
    .await;

    let res = get_html(app, "/actors").await;
    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "got {content_type}");
    let page = body_string(res).await;
    assert!(page.contains("Tom Cruise"));
}

#[sqlx::test]
async fn form_create_with_invalid_age_redirects_back_without_persisting(pool: PgPool) {
    let app = build_test_app(pool).await;
    let res = post_form(app.clone(), "/actors/create", "name=A&age=abc&gender=Male").await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/actors/create")
    );
    assert!(res.headers().get(header::SET_COOKIE).is_some());

    let body = body_json(get_json(app, "/actors").await).await;
    assert_eq!(body["actors"].as_array().map(Vec::len), Some(0));
}

#[sqlx::test]
async fn form_create_persists_and_renders_home_with_message(pool: PgPool) {
    let app = build_test_app(pool).await;
    let res = post_form(
        app.clone(),
        "/actors/create",
        "name=Jackie+Chan&age=69&gender=Male&image_link=",
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let page = body_string(res).await;
    assert!(page.contains("created successfully"));

    let body = body_json(get_json(app, "/actors").await).await;
    assert_eq!(body["actors"][0]["name"], "Jackie Chan");
}

#[sqlx::test]
async fn form_multi_select_gender_is_stored_comma_joined(pool: PgPool) {
    let app = build_test_app(pool).await;
    let res = post_form(
        app.clone(),
        "/actors/create",
        "name=B&age=25&gender=Male&gender=Other",
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = body_json(get_json(app, "/actors").await).await;
    assert_eq!(body["actors"][0]["gender"], "Male, Other");
}
