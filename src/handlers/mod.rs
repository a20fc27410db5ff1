pub mod auth;
pub mod balances;
pub mod contracts;
pub mod jobs;

use actix_web::web;

use crate::error::AppError;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Extractor failures use the same `{"error": ...}` body as handler errors.
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    );

    // ── Auth routes (signup/login are public, profile requires a JWT) ──
    cfg.route("/signup", web::post().to(auth::signup))
        .route("/login", web::post().to(auth::login))
        .route("/profile", web::get().to(auth::profile));

    // ── Contract routes (all protected: require valid JWT) ──
    cfg.service(
        web::scope("/contracts")
            .route("", web::get().to(contracts::get_contracts))
            .route("", web::post().to(contracts::create_contract))
            .route("/{id}", web::get().to(contracts::get_contract))
            .route("/{id}/status", web::put().to(contracts::update_status))
            .route("/{id}/jobs", web::post().to(contracts::create_job)),
    );

    // ── Job routes (all protected: require valid JWT) ──
    cfg.service(
        web::scope("/jobs")
            .route("", web::get().to(jobs::get_jobs))
            .route("/unpaid", web::get().to(jobs::get_unpaid_jobs))
            .route("/best-profession", web::get().to(jobs::best_profession))
            .route("/best-clients", web::get().to(jobs::best_clients))
            .route("/{id}/pay", web::post().to(jobs::pay_for_job)),
    );

    // ── Balance routes (protected) ──
    cfg.service(
        web::scope("/balances")
            .route("/deposit/{user_id}", web::post().to(balances::deposit)),
    );
}
