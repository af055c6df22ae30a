/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: login/register, tokens: gate の検証用, policy: ルート単位の認可表
 * - Clone 前提で持つ (内部は Arc で Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::{AccessPolicy, AuthService, TokenCodec};

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenCodec>,
    pub policy: Arc<AccessPolicy>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, tokens: Arc<TokenCodec>, policy: Arc<AccessPolicy>) -> Self {
        Self {
            auth,
            tokens,
            policy,
        }
    }
}
