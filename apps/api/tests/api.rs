use adapt_api::db::create_memory_pool;
use adapt_api::{build_router, AdminGate, AppState, Notifier};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

const TOKEN: &str = "test-admin-token";

type TestResult = Result<(), Box<dyn std::error::Error>>;

async fn app() -> Result<Router, Box<dyn std::error::Error>> {
    let pool = create_memory_pool().await?;
    Ok(build_router(AppState {
        pool,
        notifier: Notifier::disabled(),
        gate: AdminGate::new([TOKEN]),
    }))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    admin: bool,
) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if admin {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    Ok((status, value))
}

fn contact_data() -> Value {
    json!({
        "name": "Ann",
        "email": "ann@x.org",
        "subject": "Programs",
        "message": "Hello"
    })
}

async fn create_event(app: &Router, max: Option<i64>) -> Result<i64, Box<dyn std::error::Error>> {
    let (status, body) = send(
        app,
        Method::POST,
        "/admin/events",
        Some(json!({
            "title": "Open Gym",
            "date": "2025-01-18",
            "time": "10:00 AM",
            "location": "Rec Center",
            "description": "Wheelchair basketball drop-in",
            "category": "basketball",
            "registrationType": "internal",
            "maxRegistrations": max
        })),
        true,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().ok_or_else(|| "event id missing".into())
}

#[tokio::test]
async fn health_answers_ok() -> TestResult {
    let app = app().await?;
    let (status, body) = send(&app, Method::GET, "/health", None, false).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
    Ok(())
}

#[tokio::test]
async fn contact_form_round_trip() -> TestResult {
    let app = app().await?;

    let (status, schema) = send(&app, Method::GET, "/forms/contact", None, false).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(schema["formType"], "contact");
    assert!(schema["fields"].as_array().is_some_and(|f| !f.is_empty()));

    let (status, receipt) = send(
        &app,
        Method::POST,
        "/forms/contact/submissions",
        Some(json!({ "data": contact_data() })),
        false,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["success"], true);
    assert!(receipt["submissionId"].as_i64().unwrap_or(0) > 0);
    assert_eq!(receipt["message"], schema["successMessage"]);

    let (status, list) = send(
        &app,
        Method::GET,
        "/admin/submissions?formType=contact",
        None,
        true,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(list[0]["status"], "new");
    Ok(())
}

#[tokio::test]
async fn invalid_email_gets_field_errors() -> TestResult {
    let app = app().await?;
    let mut data = contact_data();
    data["email"] = json!("not-an-email");

    let (status, body) = send(
        &app,
        Method::POST,
        "/forms/contact/submissions",
        Some(json!({ "data": data })),
        false,
    )
    .await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["fieldErrors"],
        json!([{ "field": "email", "message": "Please enter a valid email address" }])
    );

    let (_, list) = send(&app, Method::GET, "/admin/submissions", None, true).await?;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn honeypot_looks_like_success() -> TestResult {
    let app = app().await?;

    let (status, body) = send(
        &app,
        Method::POST,
        "/forms/contact/submissions",
        Some(json!({ "data": contact_data(), "_honeypot": "I am a bot" })),
        false,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["submissionId"], 0);
    let (_, list) = send(&app, Method::GET, "/admin/submissions", None, true).await?;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn disabled_and_unknown_forms() -> TestResult {
    let app = app().await?;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/admin/forms/volunteer",
        Some(json!({ "enabled": false })),
        true,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/forms/volunteer", None, false).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "This form is currently disabled");

    let (status, _) = send(
        &app,
        Method::POST,
        "/forms/volunteer/submissions",
        Some(json!({ "data": {} })),
        false,
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::GET, "/forms/nope", None, false).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Form configuration not found");
    Ok(())
}

#[tokio::test]
async fn schema_update_is_partial_and_checked() -> TestResult {
    let app = app().await?;
    let (_, before) = send(&app, Method::GET, "/forms/contact", None, false).await?;

    let (status, after) = send(
        &app,
        Method::PUT,
        "/admin/forms/contact",
        Some(json!({ "title": "Say Hello" })),
        true,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["title"], "Say Hello");
    assert_eq!(after["fields"], before["fields"]);
    assert_eq!(after["successMessage"], before["successMessage"]);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/admin/forms/contact",
        Some(json!({ "fields": [{ "id": "pick", "type": "select", "label": "Pick" }] })),
        true,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("pick")));
    Ok(())
}

#[tokio::test]
async fn admin_routes_need_a_token() -> TestResult {
    let app = app().await?;

    for (method, uri) in [
        (Method::GET, "/admin/forms"),
        (Method::GET, "/admin/submissions"),
        (Method::POST, "/admin/init"),
        (Method::GET, "/events/1/registrations"),
        (Method::GET, "/settings/secret_key"),
    ] {
        let (status, body) = send(&app, method, uri, None, false).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "Unauthorized");
    }

    let (status, body) = send(&app, Method::GET, "/settings/donation_url", None, false).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], "donation_url");
    Ok(())
}

#[tokio::test]
async fn single_spot_event_scenario() -> TestResult {
    let app = app().await?;
    let event_id = create_event(&app, Some(1)).await?;
    let uri = format!("/events/{event_id}/registrations");

    let (status, first) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "data": { "name": "A", "email": "a@x.org" } })),
        false,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["message"], "You're registered for Open Gym! We'll see you there.");

    let (status, second) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "data": { "name": "B", "email": "b@x.org" } })),
        false,
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(second["error"], "This event has reached maximum capacity");

    let (status, count) = send(
        &app,
        Method::GET,
        &format!("{uri}?countOnly=true"),
        None,
        false,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count, json!({ "count": 1 }));

    let (status, list) = send(&app, Method::GET, &uri, None, true).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn cancelling_frees_a_spot() -> TestResult {
    let app = app().await?;
    let event_id = create_event(&app, Some(1)).await?;
    let uri = format!("/events/{event_id}/registrations");

    let (_, first) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "data": { "name": "A", "email": "a@x.org" } })),
        false,
    )
    .await?;
    let id = first["submissionId"].as_i64().ok_or("missing id")?;

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/admin/registrations/{id}"),
        Some(json!({ "status": "cancelled", "notes": "can't make it" })),
        true,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "cancelled");

    let (status, _) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "data": { "name": "B", "email": "b@x.org" } })),
        false,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn events_without_internal_registration_refuse_signups() -> TestResult {
    let app = app().await?;
    let (status, event) = send(
        &app,
        Method::POST,
        "/admin/events",
        Some(json!({
            "title": "Gala",
            "date": "2025-05-05",
            "time": "7:00 PM",
            "location": "Hall",
            "description": "Dinner",
            "registrationType": "external",
            "registrationUrl": "https://tickets.example.org"
        })),
        true,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/events/{}/registrations", event["id"]),
        Some(json!({ "data": { "name": "A", "email": "a@x.org" } })),
        false,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "This event does not accept online registrations");

    let (status, _) = send(
        &app,
        Method::POST,
        "/events/999/registrations",
        Some(json!({ "data": {} })),
        false,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn event_admin_lifecycle() -> TestResult {
    let app = app().await?;

    let (status, body) = send(
        &app,
        Method::POST,
        "/admin/events",
        Some(json!({ "title": "No date", "time": "", "location": "", "description": "", "date": "" })),
        true,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|e| e.starts_with("Missing required fields")));

    let id = create_event(&app, None).await?;
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/admin/events/{id}"),
        Some(json!({ "location": "Aquatic Center", "category": "swimming" })),
        true,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["location"], "Aquatic Center");
    assert_eq!(updated["title"], "Open Gym");

    let (_, events) = send(&app, Method::GET, "/events", None, false).await?;
    assert_eq!(events.as_array().map(Vec::len), Some(1));

    let (status, _) = send(&app, Method::DELETE, &format!("/admin/events/{id}"), None, true).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &format!("/events/{id}"), None, false).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn submission_triage() -> TestResult {
    let app = app().await?;
    let (_, receipt) = send(
        &app,
        Method::POST,
        "/forms/contact/submissions",
        Some(json!({ "data": contact_data() })),
        false,
    )
    .await?;
    let id = receipt["submissionId"].as_i64().ok_or("missing id")?;

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/admin/submissions/{id}"),
        Some(json!({ "status": "replied" })),
        true,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "replied");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/admin/submissions/{id}"),
        Some(json!({ "status": "bogus" })),
        true,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, &format!("/admin/submissions/{id}"), None, true).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::DELETE, &format!("/admin/submissions/{id}"), None, true).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn settings_and_init() -> TestResult {
    let app = app().await?;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/admin/settings/donation_url",
        Some(json!({ "value": "https://give.example.org" })),
        true,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let (_, setting) = send(&app, Method::GET, "/settings/donation_url", None, false).await?;
    assert_eq!(setting["value"], "https://give.example.org");

    let (status, body) = send(&app, Method::POST, "/admin/init", None, true).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "seeded": 0 }));
    Ok(())
}
