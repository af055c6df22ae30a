//! Request gate: bearer token → Identity → route policy.
//!
//! Runs once per request, before any `/api` handler:
//! 1. preflight (OPTIONS) passes through untouched
//! 2. `Authorization: Bearer <token>` is verified if present; a missing or
//!    invalid token just means "no identity", it is not rejected here
//! 3. the route policy decides: 401 without identity, 403 with the wrong role
//! 4. on success the Identity goes into request extensions for `CurrentIdentity`
//!
//! The gate never touches the credential store.

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::{HeaderMap, Method, Request, header},
    middleware::{self, Next},
    response::Response,
};
use tracing::{debug, warn};

use crate::api::API_PREFIX;
use crate::error::AppError;
use crate::services::auth::{Decision, Identity};
use crate::state::AppState;

/// `/api/*` に gate を掛ける。
///
/// 例：
/// ```ignore
/// let api = middleware::auth::access::apply(api::routes(), state.clone());
/// app = app.nest("/api", api);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Policy paths are relative to the API mount point, independent of how the router was nested.
    let path = policy_path(original_uri.path());
    let identity = resolve_identity(&state, req.headers());

    match state.policy.decide(req.method(), path, identity.as_ref()) {
        Decision::Allow => {}
        Decision::Unauthenticated => {
            warn!(method = %req.method(), path = %path, "rejected: authentication required");
            return Err(AppError::AuthenticationMissing);
        }
        Decision::Forbidden => {
            warn!(
                method = %req.method(),
                path = %path,
                subject = identity.as_ref().map(|i| i.subject.as_str()).unwrap_or_default(),
                "rejected: insufficient role"
            );
            return Err(AppError::AuthorizationDenied);
        }
    }

    // middleware → extractor への受け渡し
    if let Some(identity) = identity {
        req.extensions_mut().insert(identity);
    }

    Ok(next.run(req).await)
}

/// Try-verify: any failure yields `None`.
fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Option<Identity> {
    let token = bearer_token(headers)?;

    match state.tokens.verify(token) {
        Ok(identity) => Some(identity),
        Err(err) => {
            debug!(error = %err, "ignoring invalid bearer token");
            None
        }
    }
}

fn policy_path(full: &str) -> &str {
    match full.strip_prefix(API_PREFIX) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => full,
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
