//! Turn-level handler and middleware traits.

use std::future::Future;

use async_trait::async_trait;

use crate::context::TurnContext;
use crate::error::Result;

/// Callback that receives only the turn context (plain message, reaction, generic conversation update, a whole processor).
///
/// Implemented for async closures taking an owned [`TurnContext`].
#[async_trait]
pub trait TurnHandler: Send + Sync {
    async fn on_turn(&self, ctx: &TurnContext) -> Result<()>;
}

#[async_trait]
impl<F, Fut> TurnHandler for F
where
    F: Fn(TurnContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn on_turn(&self, ctx: &TurnContext) -> Result<()> {
        (self)(ctx.clone()).await
    }
}

/// Runs around the turn handlers. `before` returning false drops the activity.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn before(&self, _ctx: &TurnContext) -> Result<bool> {
        Ok(true)
    }

    async fn after(&self, _ctx: &TurnContext) -> Result<()> {
        Ok(())
    }
}
