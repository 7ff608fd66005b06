use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use eventgraph::server::{self, build_schema, AppState, ApiSchema};
use eventgraph::{Dataset, SharedStore, Store};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn sample_store() -> SharedStore {
    let dataset = Dataset::from_json(
        r#"{
            "users": [
                {"id": 1, "username": "ana", "email": "a@x.com"},
                {"id": 2, "username": "bob", "email": "b@x.com"}
            ],
            "locations": [{"id": 1, "name": "Hall", "lat": 41.0}],
            "events": [
                {"id": 5, "title": "Talk", "location_id": 1, "user_id": 2},
                {"id": 6, "title": "Picnic", "location_id": 7, "user_id": 1},
                {"id": 7, "title": "Workshop", "location_id": 1, "user_id": 2}
            ],
            "participants": [{"id": 1, "user_id": 1, "event_id": 5}]
        }"#,
    )
    .unwrap();
    Store::from_dataset(dataset).into_shared()
}

async fn run(schema: &ApiSchema, query: &str) -> Value {
    let response = schema.execute(query).await;
    serde_json::to_value(&response).unwrap()
}

#[tokio::test]
async fn create_user_on_empty_store() {
    let schema = build_schema(Store::new().into_shared());

    let first = run(
        &schema,
        r#"mutation { createUser(data: {username: "ana", email: "a@x.com"}) { id username email } }"#,
    )
    .await;
    assert_eq!(
        first["data"]["createUser"],
        json!({"id": "1", "username": "ana", "email": "a@x.com"})
    );

    let second = run(
        &schema,
        r#"mutation { createUser(data: {username: "bob", email: "b@x.com"}) { id } }"#,
    )
    .await;
    assert_eq!(second["data"]["createUser"]["id"], "2");

    let fetched = run(&schema, r#"{ user(id: "1") { username } }"#).await;
    assert_eq!(fetched["data"]["user"]["username"], "ana");
}

#[tokio::test]
async fn create_requires_mandatory_fields() {
    let schema = build_schema(Store::new().into_shared());
    let body = run(&schema, r#"mutation { createUser(data: {username: "ana"}) { id } }"#).await;

    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));
    let users = run(&schema, "{ users { id } }").await;
    assert_eq!(users["data"]["users"], json!([]));
}

#[tokio::test]
async fn event_user_resolves_lazily() {
    let schema = build_schema(sample_store());
    let body = run(&schema, r#"{ event(id: "5") { title user { id username } location { name } } }"#).await;

    assert_eq!(body["data"]["event"]["user"], json!({"id": "2", "username": "bob"}));
    assert_eq!(body["data"]["event"]["location"]["name"], "Hall");
}

#[tokio::test]
async fn dangling_location_is_null() {
    let schema = build_schema(sample_store());
    let body = run(&schema, r#"{ event(id: "6") { location { name } participants { id } } }"#).await;

    assert!(body["errors"].as_array().is_none_or(|e| e.is_empty()));
    assert_eq!(body["data"]["event"]["location"], Value::Null);
    assert_eq!(body["data"]["event"]["participants"], json!([]));
}

#[tokio::test]
async fn user_events_and_participants() {
    let schema = build_schema(sample_store());
    let body = run(
        &schema,
        r#"{ user(id: "2") { events { title participants { user { username } } } } }"#,
    )
    .await;

    assert_eq!(
        body["data"]["user"]["events"],
        json!([
            {"title": "Talk", "participants": [{"user": {"username": "ana"}}]},
            {"title": "Workshop", "participants": []}
        ])
    );
}

#[tokio::test]
async fn update_merges_and_keeps_other_fields() {
    let schema = build_schema(sample_store());
    let body = run(
        &schema,
        r#"mutation { updateLocation(id: "1", data: {name: "Great Hall", desc: "upstairs"}) { id name desc lat } }"#,
    )
    .await;

    assert_eq!(
        body["data"]["updateLocation"],
        json!({"id": "1", "name": "Great Hall", "desc": "upstairs", "lat": 41.0})
    );

    let cleared = run(
        &schema,
        r#"mutation { updateLocation(id: "1", data: {desc: null}) { name desc } }"#,
    )
    .await;
    assert_eq!(cleared["data"]["updateLocation"], json!({"name": "Great Hall", "desc": null}));
}

#[tokio::test]
async fn update_missing_location_is_not_found() {
    let schema = build_schema(sample_store());
    let body = run(
        &schema,
        r#"mutation { updateLocation(id: "9", data: {name: "Park"}) { id } }"#,
    )
    .await;

    assert_eq!(body["errors"][0]["message"], "Location not found: 9");
    assert_eq!(body["errors"][0]["extensions"]["code"], "NOT_FOUND");

    let locations = run(&schema, "{ locations { name } }").await;
    assert_eq!(locations["data"]["locations"], json!([{"name": "Hall"}]));
}

#[tokio::test]
async fn non_numeric_id_is_not_found() {
    let schema = build_schema(sample_store());
    let body = run(&schema, r#"{ participant(id: "first") { id } }"#).await;
    assert_eq!(body["errors"][0]["extensions"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn delete_returns_removed_record() {
    let schema = build_schema(sample_store());
    let body = run(&schema, r#"mutation { deleteEvent(id: "5") { id title } }"#).await;
    assert_eq!(body["data"]["deleteEvent"], json!({"id": "5", "title": "Talk"}));

    let events = run(&schema, "{ events { id } }").await;
    assert_eq!(events["data"]["events"], json!([{"id": "6"}, {"id": "7"}]));

    let again = run(&schema, r#"mutation { deleteEvent(id: "5") { id } }"#).await;
    assert_eq!(again["errors"][0]["extensions"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn delete_all_events_reports_count() {
    let schema = build_schema(sample_store());
    let body = run(&schema, "mutation { deleteAllEvents { count } }").await;
    assert_eq!(body["data"]["deleteAllEvents"], json!({"count": 3}));

    let events = run(&schema, "{ events { id } }").await;
    assert_eq!(events["data"]["events"], json!([]));
}

#[tokio::test]
async fn deleting_users_does_not_cascade() {
    let schema = build_schema(sample_store());
    let users = run(&schema, "mutation { deleteAllUsers { count } }").await;
    assert_eq!(users["data"]["deleteAllUsers"]["count"], 2);

    let body = run(&schema, r#"{ event(id: "5") { user_id user { id } } events { id } }"#).await;
    assert_eq!(body["data"]["event"], json!({"user_id": "2", "user": null}));
    assert_eq!(body["data"]["events"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn ids_stay_unique_after_delete() {
    let schema = build_schema(sample_store());
    run(&schema, r#"mutation { deleteUser(id: "1") { id } }"#).await;

    let body = run(
        &schema,
        r#"mutation { createUser(data: {username: "cleo", email: "c@x.com"}) { id } }"#,
    )
    .await;
    assert_eq!(body["data"]["createUser"]["id"], "3");
}

#[tokio::test]
async fn create_event_links_to_existing_records() {
    let schema = build_schema(sample_store());
    let body = run(
        &schema,
        r#"mutation {
            createEvent(data: {title: "Launch", location_id: "1", user_id: "1", from: "18:00"}) {
                id location_id user_id from user { username } location { name }
            }
        }"#,
    )
    .await;

    assert_eq!(
        body["data"]["createEvent"],
        json!({
            "id": "8",
            "location_id": "1",
            "user_id": "1",
            "from": "18:00",
            "user": {"username": "ana"},
            "location": {"name": "Hall"}
        })
    );
}

#[tokio::test]
async fn malformed_foreign_key_resolves_to_null() {
    let schema = build_schema(sample_store());
    let body = run(
        &schema,
        r#"mutation {
            createEvent(data: {title: "Odd", location_id: "1.0", user_id: "abc"}) {
                id location_id user_id user { id } location { name }
            }
        }"#,
    )
    .await;

    assert!(body.get("errors").is_none(), "{}", body);
    assert_eq!(
        body["data"]["createEvent"],
        json!({
            "id": "8",
            "location_id": "1.0",
            "user_id": "abc",
            "user": null,
            "location": {"name": "Hall"}
        })
    );
}

#[tokio::test]
async fn numeric_id_forms_match_records() {
    let schema = build_schema(sample_store());
    let body = run(&schema, r#"{ a: user(id: "1.0") { username } b: user(id: "1e0") { username } }"#).await;

    assert!(body.get("errors").is_none(), "{}", body);
    assert_eq!(body["data"]["a"]["username"], "ana");
    assert_eq!(body["data"]["b"]["username"], "ana");
}

#[tokio::test]
async fn batched_errors_are_per_field() {
    let schema = build_schema(sample_store());
    let body = run(&schema, r#"{ missing: user(id: "42") { id } present: users { id } }"#).await;

    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    assert_eq!(body["errors"][0]["path"], json!(["missing"]));
}

// ========== HTTP ==========

fn app(playground: bool) -> axum::Router {
    server::router(Arc::new(AppState::new(sample_store(), playground)))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn http_post_graphql() {
    for path in ["/", "/graphql"] {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"query": "{ users { username } }"}).to_string()))
            .unwrap();

        let response = app(true).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"]["users"], json!([{"username": "ana"}, {"username": "bob"}]));
    }
}

#[tokio::test]
async fn http_healthz() {
    let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
    let response = app(true).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["events"], 3);
    assert_eq!(body["participants"], 1);
}

#[tokio::test]
async fn http_playground_toggle() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app(true).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("GraphQL Playground"));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app(false).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
