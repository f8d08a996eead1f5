use actix_web::{http::header::HeaderMap, HttpRequest};

const UNKNOWN_CLIENT: &str = "unknown";

/// Extract the caller's address from proxy headers, preferring the first
/// `X-Forwarded-For` entry, then `X-Real-IP`, then `Remote-Addr`.
/// The value is not checked to be a well-formed IP.
pub fn get_client_ip(req: &HttpRequest) -> String {
    client_address(req.headers())
}

pub fn client_address(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    if let Some(forwarded) = header("x-forwarded-for") {
        if let Some(first) = forwarded.split(',').next().map(str::trim).filter(|s| !s.is_empty()) {
            return first.to_string();
        }
    }

    header("x-real-ip")
        .or_else(|| header("remote-addr"))
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
