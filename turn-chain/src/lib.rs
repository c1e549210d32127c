//! # Turn chain
//!
//! Runs middleware (before/after) around turn handlers for each incoming activity. Middleware `before` runs
//! in order and can drop the turn; handlers then run in order; middleware `after` runs in reverse order.

use std::sync::Arc;

use teams_core::{Middleware, Result, TurnContext, TurnHandler};
use tracing::{info, instrument};

/// How a turn left the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Every handler ran.
    Completed,
    /// A middleware `before` returned false; no handler and no `after` ran.
    Dropped,
}

/// Middleware and handlers for one bot: middleware run in order (before), then handlers; middleware after
/// run in reverse order.
#[derive(Clone, Default)]
pub struct TurnChain {
    middleware: Vec<Arc<dyn Middleware>>,
    handlers: Vec<Arc<dyn TurnHandler>>,
}

impl TurnChain {
    /// Creates an empty chain (no middleware, no handlers).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware (runs before handlers, after in reverse).
    pub fn add_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Appends a handler (handlers run in insertion order).
    pub fn add_handler(mut self, handler: Arc<dyn TurnHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn middleware_count(&self) -> usize {
        self.middleware.len()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Runs middleware before, then handlers, then middleware after in reverse.
    #[instrument(skip(self, ctx))]
    pub async fn run(&self, ctx: &TurnContext) -> Result<TurnOutcome> {
        let activity = ctx.activity();
        let activity_id = activity.id.as_deref().unwrap_or_default();
        info!(
            activity_type = %activity.activity_type,
            activity_id = %activity_id,
            "step: turn_chain started"
        );

        for mw in &self.middleware {
            let mw_name = std::any::type_name_of_val(mw.as_ref());
            info!(middleware = %mw_name, "step: middleware before");
            if !mw.before(ctx).await? {
                info!(
                    middleware = %mw_name,
                    "step: middleware before returned false, turn dropped"
                );
                return Ok(TurnOutcome::Dropped);
            }
        }

        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            info!(handler = %handler_name, "step: handler processing");
            handler.on_turn(ctx).await?;
            info!(
                handler = %handler_name,
                responded = ctx.responded(),
                "step: handler done"
            );
        }

        for mw in self.middleware.iter().rev() {
            let mw_name = std::any::type_name_of_val(mw.as_ref());
            info!(middleware = %mw_name, "step: middleware after");
            mw.after(ctx).await?;
        }

        info!(activity_id = %activity_id, "step: turn_chain finished");
        Ok(TurnOutcome::Completed)
    }
}

// Tests live in tests/turn_chain_test.rs
