use actix_web::{App, http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use serial_test::serial;

mod common;

#[actix_web::test]
#[serial]
async fn test_request_lifecycle_appends_log_entries() {
    common::setup_test_env();
    let Some(db) = common::test_db().await else {
        return;
    };
    common::seed_team(&db.pool).await;
    let request = common::seed_request(&db.pool, 1, &[common::date(2026, 9, 7)]).await;

    let app = test::init_service(App::new().configure(common::app_config(db.pool.clone()))).await;

    let req = test::TestRequest::post()
        .uri(&format!("/requests/{}/approve", request.id))
        .set_json(json!({"processor_id": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/logs?request_id={}", request.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    // Oldest first: the submission, then the decision.
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["request_type"], "wfh_request");
    assert_eq!(body[0]["status"], "pending");
    assert_eq!(body[0]["processor_id"], Value::Null);
    assert_eq!(body[1]["status"], "approved");
    assert_eq!(body[1]["processor_id"], 2);
    assert_eq!(body[1]["staff_id"], 1);
}

#[actix_web::test]
#[serial]
async fn test_logs_filter_by_staff_and_processor() {
    common::setup_test_env();
    let Some(db) = common::test_db().await else {
        return;
    };
    let team = common::seed_team(&db.pool).await;
    common::seed_user(&db.pool, 3, team.staff_role.id, "Engineering", "Software Engineer", Some(2))
        .await;
    let first = common::seed_request(&db.pool, 1, &[common::date(2026, 9, 7)]).await;
    common::seed_request(&db.pool, 3, &[common::date(2026, 9, 8)]).await;

    let app = test::init_service(App::new().configure(common::app_config(db.pool.clone()))).await;

    let req = test::TestRequest::post()
        .uri(&format!("/requests/{}/approve", first.id))
        .set_json(json!({"processor_id": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/logs?staff_id=1").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let req = test::TestRequest::get().uri("/logs?staff_id=3").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::get()
        .uri("/logs?processor_id=2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["status"], "approved");
}

#[actix_web::test]
#[serial]
async fn test_manual_log_entry() {
    common::setup_test_env();
    let Some(db) = common::test_db().await else {
        return;
    };

    let app = test::init_service(App::new().configure(common::app_config(db.pool.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/logs")
        .set_json(json!({
            "staff_id": 42,
            "processor_id": 2,
            "request_type": "delegation",
            "reason": "Approval authority delegated during leave",
            "status": "approved"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["request_type"], "delegation");
    assert_eq!(body["staff_id"], 42);
    assert_eq!(body["request_id"], Value::Null);

    assert_eq!(common::count_rows(&db.pool, "logs").await, 1);
}

#[actix_web::test]
#[serial]
async fn test_update_log_corrects_reason_only() {
    common::setup_test_env();
    let Some(db) = common::test_db().await else {
        return;
    };
    common::seed_team(&db.pool).await;
    common::seed_request(&db.pool, 1, &[common::date(2026, 9, 7)]).await;

    let app = test::init_service(App::new().configure(common::app_config(db.pool.clone()))).await;

    let req = test::TestRequest::put()
        .uri("/logs/1")
        .set_json(json!({"reason": "Reason redacted on request"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["reason"], "Reason redacted on request");
    // The recorded status is untouched.
    assert_eq!(body["status"], "pending");
}

#[actix_web::test]
#[serial]
async fn test_delete_log_entry() {
    common::setup_test_env();
    let Some(db) = common::test_db().await else {
        return;
    };
    common::seed_team(&db.pool).await;
    common::seed_request(&db.pool, 1, &[common::date(2026, 9, 7)]).await;

    let app = test::init_service(App::new().configure(common::app_config(db.pool.clone()))).await;

    let req = test::TestRequest::delete().uri("/logs/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": true}));
    assert_eq!(common::count_rows(&db.pool, "logs").await, 0);

    let req = test::TestRequest::delete().uri("/logs/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Log entry not found");
}
