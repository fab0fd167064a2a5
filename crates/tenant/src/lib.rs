// Tenant extraction for the route layer: which tenant a request belongs to
// and the pool it was resolved to

pub mod extractor;
pub mod context;

pub use extractor::{TenantExtractor, TENANT_HEADER};
pub use context::TenantContext;
