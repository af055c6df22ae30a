/*
 * Responsibility
 * - GET /users/me
 * - gate が解決した Identity を extractor 経由で受け取り、そのまま返す
 */
use axum::Json;

use crate::api::dto::users::MeResponse;
use crate::api::extractors::CurrentIdentity;

pub async fn me(CurrentIdentity(identity): CurrentIdentity) -> Json<MeResponse> {
    Json(MeResponse {
        username: identity.subject,
        role: identity.role,
    })
}
