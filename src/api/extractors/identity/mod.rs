/*!
 * Resolved identity extractor
 *
 * Responsibility:
 * - gate (middleware::auth::access) が request extensions に入れた Identity を handler に渡す
 * - handler は ambient な global ではなく、この extractor の引数として Identity を受け取る
 */

mod core;

pub use self::core::CurrentIdentity;
