use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use serde_json::json;

use crate::{
    models::{GenerateLogoBody, LogoRequest},
    service::LogoService,
};

/// Always answers 200: generation failures come back as a placeholder image
/// plus an `error` field.
pub async fn generate_logo(
    service: web::Data<LogoService>,
    body: web::Json<GenerateLogoBody>,
) -> HttpResponse {
    let outcome = service.generate(LogoRequest::from(body.into_inner())).await;
    HttpResponse::Ok().json(outcome.to_response())
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/ai-logo-model", web::post().to(generate_logo))
        .route("/api/generate-logo", web::post().to(generate_logo))
        .route("/health", web::get().to(health));
}

pub async fn run(service: LogoService, port: u16) -> std::io::Result<()> {
    let service = web::Data::new(service);

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(web::JsonConfig::default().limit(1 << 20))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
