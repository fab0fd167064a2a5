pub mod auth;
pub mod rate_limit;
pub mod tenant;

pub use auth::{require_auth, AuthUser};
pub use rate_limit::{rate_limit_api, RateLimiter};
pub use tenant::resolve_tenant;
