use actix_web::{App, http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use serial_test::serial;

mod common;

#[actix_web::test]
#[serial]
async fn test_schedule_aggregates_staff_state() {
    common::setup_test_env();
    let Some(db) = common::test_db().await else {
        return;
    };
    common::seed_team(&db.pool).await;
    let approved =
        common::seed_request(&db.pool, 1, &[common::date(2026, 9, 7), common::date(2026, 9, 8)])
            .await;
    common::seed_request(&db.pool, 1, &[common::date(2026, 9, 14)]).await;

    let app = test::init_service(App::new().configure(common::app_config(db.pool.clone()))).await;

    let req = test::TestRequest::post()
        .uri(&format!("/requests/{}/approve", approved.id))
        .set_json(json!({"processor_id": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Give one of the two approved days back.
    let req = test::TestRequest::post()
        .uri("/withdrawRequests")
        .set_json(json!({
            "staff_id": 1,
            "date": "2026-09-08",
            "timeslot": "AM",
            "reason": "Quarterly planning day"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/withdrawRequests/1/approve")
        .set_json(json!({"processor_id": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/schedule/1").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["staff_id"], 1);
    assert_eq!(body["approved_dates"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["approved_dates"][0]["date"], "2026-09-07");
    assert_eq!(body["pending_requests"].as_array().map(Vec::len), Some(1));
    assert_eq!(
        body["pending_requests"][0]["daterange"],
        json!(["2026-09-14"])
    );
    assert_eq!(body["withdrawn_dates"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["withdrawn_dates"][0]["date"], "2026-09-08");
}

#[actix_web::test]
#[serial]
async fn test_schedule_applies_viewer_policy() {
    common::setup_test_env();
    let Some(db) = common::test_db().await else {
        return;
    };
    let team = common::seed_team(&db.pool).await;
    common::seed_user(&db.pool, 3, team.staff_role.id, "Engineering", "Software Engineer", Some(2))
        .await;
    common::seed_user(&db.pool, 4, team.hr_role.id, "HR", "Executive", None).await;
    common::seed_user(&db.pool, 5, team.hr_role.id, "HR", "Director", None).await;

    let app = test::init_service(App::new().configure(common::app_config(db.pool.clone()))).await;

    // Open read without a viewer identity.
    let req = test::TestRequest::get().uri("/schedule/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The reporting manager is allowed.
    let req = test::TestRequest::get()
        .uri("/schedule/1?viewer_id=2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // A peer is not.
    let req = test::TestRequest::get()
        .uri("/schedule/1?viewer_id=3")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // HR outside the target's department is not either.
    let req = test::TestRequest::get()
        .uri("/schedule/1?viewer_id=4")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Unless they are senior management.
    let req = test::TestRequest::get()
        .uri("/schedule/1?viewer_id=5")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // An unknown viewer is a 404, not a denial.
    let req = test::TestRequest::get()
        .uri("/schedule/1?viewer_id=999")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Viewer not found");
}

#[actix_web::test]
#[serial]
async fn test_schedule_unknown_staff() {
    common::setup_test_env();
    let Some(db) = common::test_db().await else {
        return;
    };

    let app = test::init_service(App::new().configure(common::app_config(db.pool.clone()))).await;

    let req = test::TestRequest::get().uri("/schedule/999").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Staff member not found");
}
