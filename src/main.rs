use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, http::Method, middleware::Logger, web};
use anyhow::Result;

use wfh_be::Config;
use wfh_be::database::{
    init_database,
    repositories::{
        ApprovedDateRepository, LogRepository, RequestRepository, RoleRepository, UserRepository,
        WithdrawRepository,
    },
};
use wfh_be::handlers::{
    approved_dates, logs, requests, roles, schedule as schedule_handlers, shared, users,
    withdrawals,
};
use wfh_be::middleware::RequestId;

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("WFH Arrangement API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting WFH Arrangement API server...");

    // Load configuration
    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    // Initialize database
    let pool = init_database(&config.database_url).await?;
    println!("✅ Database initialized");

    // Initialize repositories
    let user_repository = UserRepository::new(pool.clone());
    let role_repository = RoleRepository::new(pool.clone());
    let request_repository = RequestRepository::new(pool.clone());
    let approved_date_repository = ApprovedDateRepository::new(pool.clone());
    let withdraw_repository = WithdrawRepository::new(pool.clone());
    let log_repository = LogRepository::new(pool.clone());

    let user_repo_data = web::Data::new(user_repository);
    let role_repo_data = web::Data::new(role_repository);
    let request_repo_data = web::Data::new(request_repository);
    let approved_date_repo_data = web::Data::new(approved_date_repository);
    let withdraw_repo_data = web::Data::new(withdraw_repository);
    let log_repo_data = web::Data::new(log_repository);

    let server_address = config.server_address();
    println!("🌐 Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(user_repo_data.clone())
            .app_data(role_repo_data.clone())
            .app_data(request_repo_data.clone())
            .app_data(approved_date_repo_data.clone())
            .app_data(withdraw_repo_data.clone())
            .app_data(log_repo_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&config.client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
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
                        "",
                        web::method(Method::OPTIONS)
                            .to(|| async { shared::allow("GET, POST, PUT, DELETE, OPTIONS") }),
                    )
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
                    .route(
                        "",
                        web::method(Method::OPTIONS)
                            .to(|| async { shared::allow("GET, POST, OPTIONS") }),
                    )
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
                        "",
                        web::method(Method::OPTIONS).to(|| async { shared::allow("GET, OPTIONS") }),
                    )
                    .route(
                        "/{staff_id}",
                        web::get().to(withdrawals::get_withdrawn_dates_by_staff),
                    ),
            )
            .service(
                web::scope("/logs")
                    .route("", web::get().to(logs::get_logs))
                    .route("", web::post().to(logs::create_log))
                    .route(
                        "",
                        web::method(Method::OPTIONS)
                            .to(|| async { shared::allow("GET, POST, OPTIONS") }),
                    )
                    .route("/{id}", web::put().to(logs::update_log))
                    .route("/{id}", web::delete().to(logs::delete_log)),
            )
            .service(
                web::scope("/roles")
                    .route("", web::get().to(roles::get_roles))
                    .route("", web::post().to(roles::create_role))
                    .route(
                        "",
                        web::method(Method::OPTIONS)
                            .to(|| async { shared::allow("GET, POST, OPTIONS") }),
                    )
                    .route("/checkRole", web::get().to(roles::check_role))
                    .route("/{id}", web::get().to(roles::get_role))
                    .route("/{id}", web::put().to(roles::update_role))
                    .route("/{id}", web::delete().to(roles::delete_role)),
            )
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::get_users))
                    .route("", web::post().to(users::create_user))
                    .route(
                        "",
                        web::method(Method::OPTIONS)
                            .to(|| async { shared::allow("GET, POST, OPTIONS") }),
                    )
                    .route("/{staff_id}", web::get().to(users::get_user))
                    .route("/{staff_id}", web::put().to(users::update_user))
                    .route("/{staff_id}", web::delete().to(users::delete_user)),
            )
            .route(
                "/schedule/{staff_id}",
                web::get().to(schedule_handlers::get_schedule),
            )
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
