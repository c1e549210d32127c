//! Integration tests for [`turn_chain::TurnChain`].
//!
//! Covers: middleware before/after order around handlers, a middleware dropping the turn, handlers running
//! in insertion order, and errors stopping the chain.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use teams_core::{
    Activity, ActivitySender, HandlerError, Middleware, ResourceResponse, TeamsError, TurnContext,
    TurnHandler,
};
use turn_chain::{TurnChain, TurnOutcome};

struct NullSender;

#[async_trait]
impl ActivitySender for NullSender {
    async fn send_activities(
        &self,
        activities: Vec<Activity>,
    ) -> teams_core::Result<Vec<ResourceResponse>> {
        Ok(activities
            .iter()
            .map(|_| ResourceResponse {
                id: "sent".to_string(),
            })
            .collect())
    }
}

fn create_test_context(text: &str) -> TurnContext {
    let activity = Activity {
        id: Some("test_activity_id".to_string()),
        channel_id: Some("msteams".to_string()),
        ..Activity::message(text)
    };
    TurnContext::new(activity, Arc::new(NullSender))
}

type Order = Arc<Mutex<Vec<String>>>;

struct OrderMiddleware {
    name: &'static str,
    order: Order,
    allow: bool,
}

#[async_trait]
impl Middleware for OrderMiddleware {
    async fn before(&self, _ctx: &TurnContext) -> teams_core::Result<bool> {
        self.order.lock().unwrap().push(format!("before_{}", self.name));
        Ok(self.allow)
    }

    async fn after(&self, _ctx: &TurnContext) -> teams_core::Result<()> {
        self.order.lock().unwrap().push(format!("after_{}", self.name));
        Ok(())
    }
}

struct OrderHandler {
    name: &'static str,
    order: Order,
}

#[async_trait]
impl TurnHandler for OrderHandler {
    async fn on_turn(&self, _ctx: &TurnContext) -> teams_core::Result<()> {
        self.order.lock().unwrap().push(format!("handle_{}", self.name));
        Ok(())
    }
}

fn middleware(name: &'static str, order: &Order, allow: bool) -> Arc<dyn Middleware> {
    Arc::new(OrderMiddleware {
        name,
        order: order.clone(),
        allow,
    })
}

fn handler(name: &'static str, order: &Order) -> Arc<dyn TurnHandler> {
    Arc::new(OrderHandler {
        name,
        order: order.clone(),
    })
}

/// **Test: Middleware before in order, handlers in order, middleware after in reverse.**
///
/// **Setup:** Two middleware and two handlers pushing to a shared vec.
/// **Action:** `chain.run(&ctx)`.
/// **Expected:** before_first, before_second, handle_a, handle_b, after_second, after_first; Completed.
#[tokio::test]
async fn test_turn_chain_order() {
    let order: Order = Arc::default();
    let chain = TurnChain::new()
        .add_middleware(middleware("first", &order, true))
        .add_middleware(middleware("second", &order, true))
        .add_handler(handler("a", &order))
        .add_handler(handler("b", &order));

    let outcome = chain.run(&create_test_context("hi")).await.unwrap();

    assert_eq!(outcome, TurnOutcome::Completed);
    assert_eq!(
        *order.lock().unwrap(),
        vec![
            "before_first",
            "before_second",
            "handle_a",
            "handle_b",
            "after_second",
            "after_first"
        ]
    );
}

/// **Test: A middleware returning false drops the turn.**
///
/// **Setup:** Blocking middleware first, then a second middleware and a handler.
/// **Action:** `chain.run(&ctx)`.
/// **Expected:** Dropped; only before_blocker ran.
#[tokio::test]
async fn test_middleware_drops_turn() {
    let order: Order = Arc::default();
    let chain = TurnChain::new()
        .add_middleware(middleware("blocker", &order, false))
        .add_middleware(middleware("second", &order, true))
        .add_handler(handler("a", &order));

    let outcome = chain.run(&create_test_context("hi")).await.unwrap();

    assert_eq!(outcome, TurnOutcome::Dropped);
    assert_eq!(*order.lock().unwrap(), vec!["before_blocker"]);
}

/// **Test: Closures work as turn handlers and can reply.**
#[tokio::test]
async fn test_closure_handler_replies() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    let chain = TurnChain::new().add_handler(Arc::new(move |ctx: TurnContext| {
        let c = c.clone();
        async move {
            c.fetch_add(1, Ordering::SeqCst);
            ctx.send_text("pong").await?;
            Ok::<_, TeamsError>(())
        }
    }));

    let ctx = create_test_context("ping");
    chain.run(&ctx).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(ctx.responded());
    assert_eq!(chain.handler_count(), 1);
    assert_eq!(chain.middleware_count(), 0);
}

/// **Test: A failing handler stops the chain; later handlers and after do not run.**
#[tokio::test]
async fn test_handler_error_stops_chain() {
    struct FailingHandler;

    #[async_trait]
    impl TurnHandler for FailingHandler {
        async fn on_turn(&self, _ctx: &TurnContext) -> teams_core::Result<()> {
            Err(HandlerError::Unauthorized("tenant-x".to_string()).into())
        }
    }

    let order: Order = Arc::default();
    let chain = TurnChain::new()
        .add_middleware(middleware("mw", &order, true))
        .add_handler(Arc::new(FailingHandler))
        .add_handler(handler("after_failure", &order));

    let err = chain.run(&create_test_context("hi")).await.unwrap_err();

    assert!(matches!(
        err,
        TeamsError::Handler(HandlerError::Unauthorized(_))
    ));
    assert_eq!(*order.lock().unwrap(), vec!["before_mw"]);
}
