use async_trait::async_trait;
use teams_core::{Middleware, Result, TurnContext};
use tracing::{debug, info, instrument};

/// Logs each incoming activity in before() and whether the bot replied in after(); always continues.
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    #[instrument(skip(self, ctx))]
    async fn before(&self, ctx: &TurnContext) -> Result<bool> {
        let activity = ctx.activity();
        info!(
            activity_type = %activity.activity_type,
            activity_id = %activity.id.as_deref().unwrap_or("unknown"),
            from = %activity.from.as_ref().map(|a| a.id.as_str()).unwrap_or("unknown"),
            channel_id = %activity.channel_id.as_deref().unwrap_or("unknown"),
            invoke_name = ?activity.name,
            "Received activity"
        );
        Ok(true)
    }

    #[instrument(skip(self, ctx))]
    async fn after(&self, ctx: &TurnContext) -> Result<()> {
        debug!(
            activity_id = ?ctx.activity().id,
            responded = ctx.responded(),
            "Processed activity"
        );
        Ok(())
    }
}
