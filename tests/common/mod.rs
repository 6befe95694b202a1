#![allow(dead_code)]

use std::env;

use actix_web::http::Method;
use actix_web::web;
use chrono::NaiveDate;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use sqlx::PgPool;

use wfh_be::database::init_database;
use wfh_be::database::models::{
    CreateUserInput, Role, RoleInput, Timeslot, User, WfhRequest, WfhRequestInput,
};
use wfh_be::database::repositories::{
    ApprovedDateRepository, LogRepository, RequestRepository, RoleRepository, UserRepository,
    WithdrawRepository,
};
use wfh_be::handlers::{
    approved_dates, logs, requests, roles, schedule, shared, users, withdrawals,
};

/// Connection to the throwaway database the integration tests run against.
pub struct TestDb {
    pub pool: PgPool,
}

/// Connect to the database named by `TEST_DATABASE_URL` and wipe every
/// table. Returns `None` when the variable is unset so the suite can run
/// without a Postgres server available.
pub async fn test_db() -> Option<TestDb> {
    let url = match env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set, skipping database test");
            return None;
        }
    };

    let pool = init_database(&url)
        .await
        .expect("test database should initialize");

    sqlx::query(
        "TRUNCATE TABLE logs, withdrawn_dates, withdraw_requests, approved_dates, requests, users, roles RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await
    .expect("test tables should truncate");

    Some(TestDb { pool })
}

/// Route table for the test app. Mirrors the server layout in main.rs.
pub fn app_config(pool: PgPool) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(UserRepository::new(pool.clone())))
            .app_data(web::Data::new(RoleRepository::new(pool.clone())))
            .app_data(web::Data::new(RequestRepository::new(pool.clone())))
            .app_data(web::Data::new(ApprovedDateRepository::new(pool.clone())))
            .app_data(web::Data::new(WithdrawRepository::new(pool.clone())))
            .app_data(web::Data::new(LogRepository::new(pool.clone())))
            .service(
                web::scope("/requests")
                    .route("", web::get().to(requests::get_requests))
                    .route("", web::post().to(requests::create_request))
                    .route(
                        "",
                        web::method(Method::OPTIONS)
                            .to(|| async { shared::allow("GET, POST, OPTIONS") }),
                    )
                    .route(
                        "/by-staff/{staff_id}",
                        web::get().to(requests::get_requests_by_staff),
                    )
                    .route(
                        "/by-manager/{manager_staff_id}",
                        web::get().to(requests::get_requests_for_manager),
                    )
                    .route("/{id}", web::get().to(requests::get_request))
                    .route("/{id}", web::put().to(requests::update_request))
                    .route("/{id}", web::delete().to(requests::delete_request))
                    .route("/{id}/approve", web::post().to(requests::approve_request))
                    .route("/{id}/reject", web::post().to(requests::reject_request)),
            )
            .service(
                web::scope("/approved-dates")
                    .route("", web::get().to(approved_dates::get_approved_dates))
                    .route("", web::post().to(approved_dates::create_approved_date))
                    .route("", web::put().to(approved_dates::move_approved_date))
                    .route("", web::delete().to(approved_dates::delete_approved_date))
                    .route(
                        "/team/{teamlead_id}",
                        web::get().to(approved_dates::get_team_approved_dates),
                    )
                    .route(
                        "/department/{department}",
                        web::get().to(approved_dates::get_department_approved_dates),
                    ),
            )
            .service(
                web::scope("/withdrawRequests")
                    .route("", web::get().to(withdrawals::get_withdraw_requests))
                    .route("", web::post().to(withdrawals::create_withdraw_request))
                    .route("/{id}", web::get().to(withdrawals::get_withdraw_request))
                    .route("/{id}", web::put().to(withdrawals::update_withdraw_request))
                    .route(
                        "/{id}",
                        web::delete().to(withdrawals::delete_withdraw_request),
                    )
                    .route(
                        "/{id}/approve",
                        web::post().to(withdrawals::approve_withdraw_request),
                    )
                    .route(
                        "/{id}/reject",
                        web::post().to(withdrawals::reject_withdraw_request),
                    ),
            )
            .service(
                web::scope("/withdrawnDates")
                    .route("", web::get().to(withdrawals::get_withdrawn_dates))
                    .route(
                        "/{staff_id}",
                        web::get().to(withdrawals::get_withdrawn_dates_by_staff),
                    ),
            )
            .service(
                web::scope("/logs")
                    .route("", web::get().to(logs::get_logs))
                    .route("", web::post().to(logs::create_log))
                    .route("/{id}", web::put().to(logs::update_log))
                    .route("/{id}", web::delete().to(logs::delete_log)),
            )
            .service(
                web::scope("/roles")
                    .route("", web::get().to(roles::get_roles))
                    .route("", web::post().to(roles::create_role))
                    .route("/checkRole", web::get().to(roles::check_role))
                    .route("/{id}", web::get().to(roles::get_role))
                    .route("/{id}", web::put().to(roles::update_role))
                    .route("/{id}", web::delete().to(roles::delete_role)),
            )
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::get_users))
                    .route("", web::post().to(users::create_user))
                    .route("/{staff_id}", web::get().to(users::get_user))
                    .route("/{staff_id}", web::put().to(users::update_user))
                    .route("/{staff_id}", web::delete().to(users::delete_user)),
            )
            .route("/schedule/{staff_id}", web::get().to(schedule::get_schedule));
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub async fn seed_role(pool: &PgPool, title: &str) -> Role {
    RoleRepository::new(pool.clone())
        .create_role(RoleInput {
            title: title.to_string(),
        })
        .await
        .expect("role should insert")
}

pub fn user_input(
    staff_id: i32,
    role_id: i32,
    department: &str,
    position: &str,
    reporting_manager: Option<i32>,
) -> CreateUserInput {
    CreateUserInput {
        staff_id,
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        department: department.to_string(),
        position: position.to_string(),
        country: "Singapore".to_string(),
        // The email column is unique, so derive it from the staff id
        // instead of faking it.
        email: format!("staff{}@example.com", staff_id),
        reporting_manager,
        role_id,
    }
}

pub async fn seed_user(
    pool: &PgPool,
    staff_id: i32,
    role_id: i32,
    department: &str,
    position: &str,
    reporting_manager: Option<i32>,
) -> User {
    UserRepository::new(pool.clone())
        .create_user(user_input(
            staff_id,
            role_id,
            department,
            position,
            reporting_manager,
        ))
        .await
        .expect("user should insert")
}

pub fn request_input(staff_id: i32, dates: &[NaiveDate]) -> WfhRequestInput {
    WfhRequestInput {
        staff_id,
        daterange: dates.to_vec(),
        timeslot: Timeslot::Am,
        reason: "Focus work".to_string(),
        document_url: None,
    }
}

pub async fn seed_request(pool: &PgPool, staff_id: i32, dates: &[NaiveDate]) -> WfhRequest {
    RequestRepository::new(pool.clone())
        .create_request(request_input(staff_id, dates))
        .await
        .expect("request should insert")
}

/// The standard cast for the decision tests. Role ids are stable because
/// every test starts from a truncated database: HR lands on 1, Staff on
/// 2 and Manager on 3. Staff 1 reports to manager 2.
pub struct Team {
    pub hr_role: Role,
    pub staff_role: Role,
    pub manager_role: Role,
    pub manager: User,
    pub staff: User,
}

pub async fn seed_team(pool: &PgPool) -> Team {
    let hr_role = seed_role(pool, "HR").await;
    let staff_role = seed_role(pool, "Staff").await;
    let manager_role = seed_role(pool, "Manager").await;
    let manager = seed_user(pool, 2, manager_role.id, "Engineering", "Manager", None).await;
    let staff = seed_user(
        pool,
        1,
        staff_role.id,
        "Engineering",
        "Software Engineer",
        Some(manager.staff_id),
    )
    .await;

    Team {
        hr_role,
        staff_role,
        manager_role,
        manager,
        staff,
    }
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    let query = format!("SELECT COUNT(*) FROM {}", table);
    sqlx::query_scalar::<_, i64>(&query)
        .fetch_one(pool)
        .await
        .expect("count query should run")
}

pub fn setup_test_env() {
    let _ = env_logger::builder().is_test(true).try_init();
}
