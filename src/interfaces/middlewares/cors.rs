use actix_cors::Cors;
use actix_web::http::header;

use crate::settings::AppConfig;

/// CORS policy for the `/api` scope, built from the configured origins.
///
/// Preflight requests are answered here; actual requests get the matching
/// `Access-Control-Allow-Origin` echoed back.
pub fn cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();

    let cors = Cors::default()
        .allowed_methods(vec!["POST", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(86400);

    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }

    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
