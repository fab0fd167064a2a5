// Tenant extractor implementation
// Token claim first, then the X-Tenant-Id header, then the default tenant

use axum::http::HeaderMap;
use consign_database::TenantError;
use consign_models::TenantId;

pub const TENANT_HEADER: &str = "x-tenant-id";

#[derive(Debug, Clone, Default)]
pub struct TenantExtractor;

impl TenantExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Pick the tenant for a request.
    ///
    /// A tenant carried by the caller's token always wins so a token issued
    /// for one store cannot be replayed against another via the header. A
    /// missing or blank header means the default tenant.
    pub fn extract_tenant_id(
        &self,
        claim: Option<&str>,
        headers: &HeaderMap,
    ) -> Result<TenantId, TenantError> {
        if let Some(claim) = claim {
            return parse(claim);
        }

        let Some(value) = headers.get(TENANT_HEADER) else {
            return Ok(TenantId::primary());
        };

        let raw = value.to_str().map_err(|_| TenantError::InvalidTenant {
            tenant: String::from_utf8_lossy(value.as_bytes()).into_owned(),
            reason: format!("{} header is not visible ASCII", TENANT_HEADER),
        })?;

        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(TenantId::primary());
        }

        parse(raw)
    }
}

fn parse(raw: &str) -> Result<TenantId, TenantError> {
    TenantId::parse(raw).map_err(|e| TenantError::invalid(raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(tenant: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TENANT_HEADER, HeaderValue::from_str(tenant).unwrap());
        headers
    }

    #[test]
    fn test_defaults_without_claim_or_header() {
        let tenant = TenantExtractor::new()
            .extract_tenant_id(None, &HeaderMap::new())
            .unwrap();
        assert_eq!(tenant.as_str(), "default");
    }

    #[test]
    fn test_header_is_used() {
        let tenant = TenantExtractor::new()
            .extract_tenant_id(None, &headers("shopA"))
            .unwrap();
        assert_eq!(tenant.as_str(), "shopA");
    }

    #[test]
    fn test_claim_wins_over_header() {
        let tenant = TenantExtractor::new()
            .extract_tenant_id(Some("shopB"), &headers("shopA"))
            .unwrap();
        assert_eq!(tenant.as_str(), "shopB");
    }

    #[test]
    fn test_blank_header_means_default() {
        let tenant = TenantExtractor::new()
            .extract_tenant_id(None, &headers("  "))
            .unwrap();
        assert!(tenant.is_primary());
    }

    #[test]
    fn test_malformed_header_is_invalid_tenant() {
        let err = TenantExtractor::new()
            .extract_tenant_id(None, &headers("shop a; drop"))
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.tenant(), "shop a; drop");
    }

    #[test]
    fn test_non_ascii_header_is_invalid_tenant() {
        let mut headers = HeaderMap::new();
        headers.insert(
            TENANT_HEADER,
            HeaderValue::from_bytes("tienda-ñ".as_bytes()).unwrap(),
        );

        let err = TenantExtractor::new()
            .extract_tenant_id(None, &headers)
            .unwrap_err();
        assert!(err.is_client_error());
    }
}
