//! Invoke dispatch: first registered entry whose wire name matches wins, then the generic fallback.

use tracing::{debug, info};

use teams_core::{InvokeActivity, InvokeResponse, Result, TurnContext};

use crate::handlers::InvokeHandlers;
use crate::registry::INVOKE_DEFINITIONS;

/// Runs at most one invoke handler for the activity and returns its response.
///
/// The registry is scanned in declaration order. An entry matches when its handler is registered and its
/// wire name equals the activity's `name`; the payload is decoded into the entry's request shape. With no
/// match, the generic `on_invoke` handler runs if registered. Otherwise returns `Ok(None)`.
pub async fn dispatch_invoke(
    ctx: &TurnContext,
    invoke: &InvokeActivity<'_>,
    handlers: &InvokeHandlers,
) -> Result<Option<InvokeResponse>> {
    let name = invoke.name.unwrap_or_default();

    for definition in INVOKE_DEFINITIONS {
        let Some(handler) = handlers.handler(definition.key) else {
            continue;
        };
        if definition.name != name {
            continue;
        }
        info!(
            invoke_name = %name,
            handler = %definition.key,
            request = definition.request,
            "step: invoke handler"
        );
        return handler.call(ctx, invoke.value).await;
    }

    if let Some(generic) = &handlers.generic {
        info!(invoke_name = %name, handler = "onInvoke", "step: invoke handler");
        return generic.on_invoke(ctx).await;
    }

    debug!(invoke_name = %name, "no invoke handler matched");
    Ok(None)
}
