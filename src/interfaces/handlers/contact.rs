use actix_web::{http::header, web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::Serialize;

use crate::{
    constants::{ACCEPTED_MESSAGE, DISCARDED_MESSAGE},
    entities::contact::{ContactOutcome, ContactResponse},
    errors::AppError,
    repositories::email::EmailSender,
    utils::get_client_ip::get_client_ip,
    AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailDiagnostics {
    provider: &'static str,
    configured: bool,
    from: String,
    operator: String,
    auto_response: bool,
    environment: String,
}

/// `POST /api/contact`
pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let client = get_client_ip(&req);

    let outcome = state.contact_handler
        .submit(&client, &body, Utc::now())
        .await?;

    let message = match outcome {
        ContactOutcome::Accepted { .. } => ACCEPTED_MESSAGE,
        ContactOutcome::Discarded { .. } => DISCARDED_MESSAGE,
    };

    Ok(HttpResponse::Ok().json(ContactResponse {
        success: true,
        message: message.to_string(),
    }))
}

/// `OPTIONS /api/contact` without CORS request headers. Browser preflights
/// are answered by the CORS middleware on the scope.
pub async fn contact_options() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::ALLOW, "POST, OPTIONS"))
        .finish()
}

/// `GET /api/contact`: email backend diagnostics, hidden in production.
pub async fn contact_diagnostics(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    if state.config.is_production() {
        return Err(AppError::NotFound);
    }

    let mailer = &state.contact_handler.mailer;
    Ok(HttpResponse::Ok().json(EmailDiagnostics {
        provider: mailer.provider(),
        configured: mailer.is_configured(),
        from: state.config.from_email.clone(),
        operator: state.config.operator_email.clone(),
        auto_response: state.config.auto_response_enabled,
        environment: state.config.env.to_string(),
    }))
}

/// Any other method on `/api/contact`.
pub async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed)
}
