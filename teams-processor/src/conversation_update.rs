//! Conversation-update dispatch: the event-specific handler, then the generic hook.

use tracing::{debug, info};

use teams_core::{ConversationUpdateActivity, Result, TurnContext};

use crate::events::TeamEvent;
use crate::handlers::ConversationUpdateHandlers;

/// Classifies the update and runs the handler registered for its event kind, if any.
///
/// The generic `on_conversation_update_activity` handler always runs afterwards when registered,
/// whether or not an event was classified or handled.
pub async fn dispatch_conversation_update(
    ctx: &TurnContext,
    update: &ConversationUpdateActivity<'_>,
    handlers: &ConversationUpdateHandlers,
) -> Result<()> {
    match TeamEvent::classify(ctx, update) {
        Some(event) => {
            let event_type = event.event_type();
            info!(event_type = %event_type.as_str(), "step: team event classified");
            let handled = match event {
                TeamEvent::MembersAdded(e) => match &handlers.members_added {
                    Some(h) => h.on_event(e).await.map(|_| true),
                    None => Ok(false),
                },
                TeamEvent::MembersRemoved(e) => match &handlers.members_removed {
                    Some(h) => h.on_event(e).await.map(|_| true),
                    None => Ok(false),
                },
                TeamEvent::ChannelCreated(e) => match &handlers.channel_created {
                    Some(h) => h.on_event(e).await.map(|_| true),
                    None => Ok(false),
                },
                TeamEvent::ChannelDeleted(e) => match &handlers.channel_deleted {
                    Some(h) => h.on_event(e).await.map(|_| true),
                    None => Ok(false),
                },
                TeamEvent::ChannelRenamed(e) => match &handlers.channel_renamed {
                    Some(h) => h.on_event(e).await.map(|_| true),
                    None => Ok(false),
                },
                TeamEvent::TeamRenamed(e) => match &handlers.team_renamed {
                    Some(h) => h.on_event(e).await.map(|_| true),
                    None => Ok(false),
                },
            }?;
            debug!(event_type = %event_type.as_str(), handled, "team event done");
        }
        None => debug!("no team event in conversation update"),
    }

    if let Some(generic) = &handlers.conversation_update {
        info!("step: conversation update handler");
        generic.on_turn(ctx).await?;
    }
    Ok(())
}
