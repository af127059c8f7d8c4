/*!
 * Authentication context extractors
 *
 * Responsibility:
 * - Hand the RequestContext (set by middleware::auth::access) to handlers
 * - AuthCtxExtractor: principal required, anonymous -> 401
 */

mod core;

pub use self::core::AuthCtxExtractor;
