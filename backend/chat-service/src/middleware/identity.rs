use crate::error::AppError;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

/// The authenticated caller, as resolved by the upstream auth gateway.
///
/// Token verification happens before traffic reaches this service; the
/// gateway forwards the verified identity in the `x-user-id` header. This
/// service trusts that header and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequesterId(pub Uuid);

pub const USER_ID_HEADER: &str = "x-user-id";

/// Extract the gateway-resolved user id into request extensions.
///
/// The websocket endpoint is exempt: its identity arrives in the upgrade
/// query string (and an anonymous socket is allowed, it just gets no
/// presence registration).
pub async fn identity_middleware(mut req: Request, next: Next) -> Result<Response, AppError> {
    if req.uri().path().ends_with("/ws") {
        return Ok(next.run(req).await);
    }

    let raw = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let user_id = Uuid::parse_str(raw).map_err(|_| AppError::Unauthorized)?;
    req.extensions_mut().insert(RequesterId(user_id));

    Ok(next.run(req).await)
}
