//! End-to-end API tests against a real database
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p shelterlink-server -- --ignored

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use shelterlink_server::db::{create_pool, migrations};
use shelterlink_server::models::{haversine_km, GeoPoint};
use shelterlink_server::{build_router, AppState, Db};

async fn app() -> (Router, Db) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&url).await.expect("pool creation failed");
    migrations::run(&pool).await.expect("migrations failed");
    let db = Db::new(pool);
    let state = AppState {
        db: db.clone(),
        pages_dir: "pages".into(),
    };
    (build_router(state, false), db)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Unique suffix so reruns against the same database don't collide.
fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

async fn count(db: &Db, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await
        .unwrap();
    n
}

async fn create_user(app: &Router) -> i64 {
    let email = format!("{}@example.org", unique("user"));
    let (status, body) = call(
        app,
        "POST",
        "/api/users",
        Some(json!({"name": "Test User", "email": email, "gdprConsent": true})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn food_bank_round_trip_with_distance() {
    let (app, _) = app().await;
    let name = unique("Pantry");

    let (status, body) = call(
        &app,
        "POST",
        "/api/food-banks",
        Some(json!({
            "name": name,
            "address": "1 Test Street",
            "latitude": 51.501,
            "longitude": -0.101,
            "petFoodAvailable": true,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().expect("numeric id");

    let (status, body) = call(&app, "GET", "/api/food-banks?lat=51.5&lng=-0.1&perPage=100", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    let row = rows.iter().find(|r| r["id"] == id).expect("new food bank listed");
    assert!(row["distance"].as_f64().unwrap() < 10.0);
    assert_eq!(row["petFoodAvailable"], true);
}

#[tokio::test]
#[ignore = "requires database"]
async fn radius_results_are_within_range_and_sorted() {
    let (app, _) = app().await;
    for (lat, lng) in [(51.52, -0.1), (51.9, -0.1), (51.505, -0.1)] {
        let (status, _) = call(
            &app,
            "POST",
            "/api/shelters",
            Some(json!({"name": unique("Shelter"), "address": "Somewhere", "latitude": lat, "longitude": lng})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = call(&app, "GET", "/api/shelters?lat=51.5&lng=-0.1&radius=5&perPage=100", None).await;
    let origin = GeoPoint::new(51.5, -0.1).unwrap();
    let mut last = 0.0;
    for row in body["data"].as_array().unwrap() {
        let distance = row["distance"].as_f64().unwrap();
        let point = GeoPoint::new(row["latitude"].as_f64().unwrap(), row["longitude"].as_f64().unwrap())
            .unwrap();
        assert!(distance < 5.0);
        assert!((haversine_km(origin, point) - distance).abs() < 1e-6);
        assert!(distance >= last);
        last = distance;
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn shelter_put_is_idempotent() {
    let (app, _) = app().await;
    let (_, body) = call(
        &app,
        "POST",
        "/api/shelters",
        Some(json!({"name": unique("Haven"), "address": "2 Hope St"})),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/shelters/{id}");
    let update = json!({"name": "Haven House", "address": "2 Hope St", "availableBeds": 4, "acceptsPets": true});

    let (s1, first) = call(&app, "PUT", &uri, Some(update.clone())).await;
    let (s2, second) = call(&app, "PUT", &uri, Some(update)).await;
    assert_eq!((s1, s2), (StatusCode::OK, StatusCode::OK));

    for field in ["name", "address", "availableBeds", "acceptsPets", "capacity"] {
        assert_eq!(first["data"][field], second["data"][field], "{field}");
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn missing_required_field_inserts_nothing() {
    let (app, db) = app().await;
    let before = count(&db, "contact_messages").await;

    let (status, body) = call(&app, "POST", "/api/contact", Some(json!({"email": "a@example.org", "message": "hi"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(count(&db, "contact_messages").await, before);
}

#[tokio::test]
#[ignore = "requires database"]
async fn food_bank_filters_hold_for_every_row() {
    let (app, _) = app().await;
    let city = unique("Filterton");
    for (pet_food, in_city) in [(true, true), (false, true), (true, false)] {
        let row_city = if in_city { city.clone() } else { unique("Elsewhere") };
        let (status, _) = call(
            &app,
            "POST",
            "/api/food-banks",
            Some(json!({
                "name": unique("Larder"),
                "address": "3 Market Row",
                "city": row_city,
                "petFoodAvailable": pet_food,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let uri = format!("/api/food-banks?petFood=true&city={}&perPage=100", city.to_uppercase());
    let (status, body) = call(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    for row in rows {
        assert_eq!(row["petFoodAvailable"], true);
        assert_eq!(row["city"].as_str().unwrap().to_lowercase(), city.to_lowercase());
    }
}

/// Every submitted field comes back from `GET /{id}` unchanged.
async fn assert_round_trip(app: &Router, collection: &str, submitted: Value) {
    let (status, body) = call(app, "POST", collection, Some(submitted.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call(app, "GET", &format!("{collection}/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    for (field, value) in submitted.as_object().unwrap() {
        assert_eq!(&body["data"][field], value, "{collection} {field}");
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn food_bank_and_shelter_round_trip() {
    let (app, _) = app().await;

    assert_round_trip(
        &app,
        "/api/food-banks",
        json!({
            "name": unique("Community Pantry"),
            "address": "12 Mill Lane",
            "city": "York",
            "postcode": "YO1 7HH",
            "latitude": 53.96,
            "longitude": -1.08,
            "phone": "01904 000000",
            "email": "pantry@example.org",
            "website": "https://pantry.example.org",
            "openingHours": "Mon-Fri 10-4",
            "petFoodAvailable": true,
            "requiresReferral": true,
        }),
    )
    .await;

    assert_round_trip(
        &app,
        "/api/shelters",
        json!({
            "name": unique("Night Haven"),
            "address": "4 Station Road",
            "city": "York",
            "postcode": "YO24 1AB",
            "latitude": 53.95,
            "longitude": -1.09,
            "capacity": 30,
            "availableBeds": 7,
            "acceptsPets": true,
            "acceptsFamilies": true,
            "open24h": true,
            "phone": "01904 111111",
        }),
    )
    .await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn broadcast_read_state_is_per_user() {
    let (app, _) = app().await;
    let alice = create_user(&app).await;
    let bob = create_user(&app).await;

    let (_, body) = call(
        &app,
        "POST",
        "/api/notifications",
        Some(json!({"title": unique("Cold weather"), "message": "Extra beds tonight"})),
    )
    .await;
    let broadcast = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/notifications/{broadcast}"),
        Some(json!({"userId": alice, "isRead": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isRead"], true);

    let unread_ids = |body: &Value| -> Vec<i64> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|n| n["id"].as_i64())
            .collect()
    };
    let feed = |user: i64| format!("/api/notifications?userId={user}&unread=true&perPage=100");
    let (_, alice_feed) = call(&app, "GET", &feed(alice), None).await;
    let (_, bob_feed) = call(&app, "GET", &feed(bob), None).await;
    assert!(!unread_ids(&alice_feed).contains(&broadcast));
    assert!(unread_ids(&bob_feed).contains(&broadcast));
}

#[tokio::test]
#[ignore = "requires database"]
async fn only_the_addressee_marks_a_notification_read() {
    let (app, _) = app().await;
    let alice = create_user(&app).await;
    let bob = create_user(&app).await;

    let (_, body) = call(
        &app,
        "POST",
        "/api/notifications",
        Some(json!({"userId": alice, "title": "Appointment", "message": "Tomorrow at 10"})),
    )
    .await;
    let note = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/notifications/{note}");

    let (status, _) = call(&app, "PUT", &uri, Some(json!({"userId": bob}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(&app, "PUT", &uri, Some(json!({"userId": alice}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isRead"], true);
}

#[tokio::test]
#[ignore = "requires database"]
async fn anonymous_crisis_alert_stays_out_of_feeds() {
    let (app, db) = app().await;
    let bob = create_user(&app).await;
    let pool = db.pool();
    let anonymous_alerts = || async move {
        let n: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM realtime_notifications \
             WHERE user_id IS NULL AND notification_type = 'crisis'",
        )
        .fetch_one(pool)
        .await
        .unwrap();
        n
    };
    let before = anonymous_alerts().await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/mental-health-assessments",
        Some(json!({"totalScore": 25})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["crisisAlert"], true);
    assert_eq!(anonymous_alerts().await, before + 1);

    let feeds = [
        format!("/api/notifications?userId={bob}&perPage=100"),
        "/api/notifications?perPage=100".to_string(),
    ];
    for uri in feeds {
        let (_, body) = call(&app, "GET", &uri, None).await;
        let crisis = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|n| n["notificationType"] == "crisis")
            .count();
        assert_eq!(crisis, 0, "{uri}");
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn crisis_assessment_creates_notification() {
    let (app, _) = app().await;
    let user_id = create_user(&app).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/mental-health-assessments",
        Some(json!({"userId": user_id, "totalScore": 22})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["riskLevel"], "high");
    assert_eq!(body["data"]["crisisAlert"], true);

    let (_, body) = call(&app, "GET", &format!("/api/notifications?userId={user_id}"), None).await;
    let crisis = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["userId"] == user_id && n["notificationType"] == "crisis")
        .count();
    assert_eq!(crisis, 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn dog_mutation_requires_owner() {
    let (app, _) = app().await;
    let owner = create_user(&app).await;
    let other = create_user(&app).await;

    let (_, body) = call(&app, "POST", "/api/dogs", Some(json!({"userId": owner, "name": "Rex"}))).await;
    let dog = body["data"]["id"].as_i64().unwrap();

    let (status, _) = call(&app, "DELETE", &format!("/api/dogs/{dog}"), Some(json!({"userId": other}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "DELETE", &format!("/api/dogs/{dog}"), Some(json!({"userId": owner}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, "DELETE", &format!("/api/dogs/{dog}"), Some(json!({"userId": owner}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn certification_approval_notifies_holder() {
    let (app, _) = app().await;
    let user = create_user(&app).await;
    let (_, body) = call(&app, "POST", "/api/dogs", Some(json!({"userId": user, "name": "Bea", "isServiceDog": true}))).await;
    let dog = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        "POST",
        "/api/service-dog-certifications",
        Some(json!({"dogId": dog, "userId": user, "certificationType": "guide"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let cert = body["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/service-dog-certifications/{cert}");
    let (status, first) = call(&app, "PUT", &uri, Some(json!({"status": "approved"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["status"], "approved");
    assert!(first["data"]["expiresAt"].is_string());

    let (status, second) = call(&app, "PUT", &uri, Some(json!({"status": "approved"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["issuedAt"], second["data"]["issuedAt"]);
    assert_eq!(first["data"]["expiresAt"], second["data"]["expiresAt"]);

    let (_, body) = call(&app, "GET", &format!("/api/notifications?userId={user}"), None).await;
    let certification_notes = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["notificationType"] == "certification" && n["userId"] == user)
        .count();
    assert_eq!(certification_notes, 2, "application + one approval");
}

#[tokio::test]
#[ignore = "requires database"]
async fn certification_requires_dog_owner() {
    let (app, db) = app().await;
    let owner = create_user(&app).await;
    let other = create_user(&app).await;
    let (_, body) = call(&app, "POST", "/api/dogs", Some(json!({"userId": owner, "name": "Juno"}))).await;
    let dog = body["data"]["id"].as_i64().unwrap();
    let (status, _) = call(
        &app,
        "POST",
        "/api/service-dog-certifications",
        Some(json!({"dogId": dog, "userId": other, "certificationType": "guide"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let filed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM service_dog_certifications WHERE dog_id = $1")
        .bind(dog)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(filed, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_email_is_conflict() {
    let (app, _) = app().await;
    let email = format!("{}@example.org", unique("dup"));
    let body = json!({"name": "A", "email": email});

    let (first, _) = call(&app, "POST", "/api/users", Some(body.clone())).await;
    let (second, resp) = call(&app, "POST", "/api/users", Some(body)).await;
    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(resp["success"], false);
}

#[tokio::test]
#[ignore = "requires database"]
async fn accessibility_defaults_then_upsert() {
    let (app, _) = app().await;
    let user = create_user(&app).await;
    let uri = format!("/api/accessibility-settings/{user}");

    let (_, body) = call(&app, "GET", &uri, None).await;
    assert_eq!(body["data"]["fontSize"], "medium");
    assert!(body["data"]["updatedAt"].is_null());

    let settings = json!({"fontSize": "large", "highContrast": true});
    call(&app, "PUT", &uri, Some(settings.clone())).await;
    let (status, body) = call(&app, "PUT", &uri, Some(settings)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fontSize"], "large");
    assert_eq!(body["data"]["highContrast"], true);
}

#[tokio::test]
#[ignore = "requires database"]
async fn lookup_lists_are_seeded() {
    let (app, _) = app().await;

    let (status, body) = call(&app, "OPTIONS", "/api/mental-health-assessments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 9);

    let (_, body) = call(&app, "GET", "/api/letters/templates", None).await;
    assert!(!body["data"].as_array().unwrap().is_empty());
}
