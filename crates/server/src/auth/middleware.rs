use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::jwt::validate_access_token;

/// Permissive auth middleware: validates a Bearer token when present and
/// inserts the claims into request extensions.
///
/// Does NOT reject unauthenticated requests — downstream handlers decide
/// authorization via the `Actor` extractor and the stage capability gate.
pub async fn auth_middleware(mut req: Request, next: Next) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string());

    if let Some(token) = token {
        if let Ok(claims) = validate_access_token(&token) {
            req.extensions_mut().insert(claims);
        }
    }

    next.run(req).await
}
