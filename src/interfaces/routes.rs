use actix_web::web;

use crate::{
    handlers::{home::home, system::health_check},
    middlewares::cors::cors,
    settings::AppConfig,
};

mod contact;

pub fn configure_routes(cfg: &mut web::ServiceConfig, config: &AppConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api")
            .wrap(cors(config))
            .configure(contact::config_routes)
    );
}
