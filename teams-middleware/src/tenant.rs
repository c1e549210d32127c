//! Tenant allowlist.

use async_trait::async_trait;
use teams_core::{HandlerError, Middleware, Result, TurnContext};
use tracing::{error, info, instrument};

/// Fails the turn with [`HandlerError::Unauthorized`] unless the activity's tenant is allowed.
///
/// The tenant id comes from `channelData.tenant.id`, falling back to `conversation.tenantId`.
/// An empty allowlist allows every tenant.
pub struct TenantAllowlistMiddleware {
    allowed_tenants: Vec<String>,
}

impl TenantAllowlistMiddleware {
    /// Creates a middleware that allows only the given tenant ids.
    pub fn new(allowed_tenants: Vec<String>) -> Self {
        Self { allowed_tenants }
    }

    fn tenant_id(ctx: &TurnContext) -> Option<String> {
        let activity = ctx.activity();
        activity
            .teams_channel_data()
            .and_then(|d| d.tenant)
            .and_then(|t| t.id)
            .or_else(|| {
                activity
                    .conversation
                    .as_ref()
                    .and_then(|c| c.tenant_id.clone())
            })
    }
}

#[async_trait]
impl Middleware for TenantAllowlistMiddleware {
    #[instrument(skip(self, ctx))]
    async fn before(&self, ctx: &TurnContext) -> Result<bool> {
        if self.allowed_tenants.is_empty() {
            return Ok(true);
        }
        match Self::tenant_id(ctx) {
            Some(tenant_id) if self.allowed_tenants.contains(&tenant_id) => {
                info!(tenant_id = %tenant_id, "Tenant authorized");
                Ok(true)
            }
            tenant_id => {
                let tenant_id = tenant_id.unwrap_or_else(|| "unknown".to_string());
                error!(tenant_id = %tenant_id, "Unauthorized tenant");
                Err(HandlerError::Unauthorized(tenant_id).into())
            }
        }
    }
}
