//! Client identity helpers shared by the guards and handlers.

use actix_web::dev::RequestHead;
use actix_web::http::header;

use sk_core::domain::entities::token::ClientMeta;

/// Resolve the client network address.
///
/// Honors reverse-proxy headers first: the left-most entry of
/// `X-Forwarded-For`, then `X-Real-IP`, then the transport peer address.
pub fn client_ip(head: &RequestHead) -> Option<String> {
    if let Some(forwarded_for) = head.headers.get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return Some(ip.to_string());
                }
            }
        }
    }

    if let Some(real_ip) = head.headers.get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            return Some(ip_str.to_string());
        }
    }

    head.peer_addr.map(|addr| addr.ip().to_string())
}

/// The identity key used for admission control
pub fn identity_key(head: &RequestHead) -> String {
    client_ip(head).unwrap_or_else(|| "unknown".to_string())
}

/// Client metadata attached to token telemetry
pub fn client_meta(head: &RequestHead) -> ClientMeta {
    let user_agent = head
        .headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    ClientMeta::new(client_ip(head), user_agent)
}
