/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: request gate, cors: ブラウザ向け CORS, http: request-id / trace / limit / timeout
 */
pub mod auth;
pub mod cors;
pub mod http;
