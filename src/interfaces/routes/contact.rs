use actix_web::web;

use crate::{constants::MAX_BODY_BYTES, handlers::contact};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/contact")
            .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
            .route(web::post().to(contact::submit_contact))
            .route(web::method(actix_web::http::Method::OPTIONS).to(contact::contact_options))
            .route(web::get().to(contact::contact_diagnostics))
            .default_service(web::to(contact::method_not_allowed))
    );
}
