//! Filters that drop whole classes of activities before any handler runs.

use async_trait::async_trait;
use teams_core::{Middleware, Result, TurnContext};
use tracing::debug;

/// `channelId` of activities sent by Microsoft Teams.
pub const TEAMS_CHANNEL_ID: &str = "msteams";

/// Drops activities that did not come from Teams.
pub struct DropNonTeamsActivitiesMiddleware;

#[async_trait]
impl Middleware for DropNonTeamsActivitiesMiddleware {
    async fn before(&self, ctx: &TurnContext) -> Result<bool> {
        let channel_id = ctx.activity().channel_id.as_deref();
        let keep = channel_id == Some(TEAMS_CHANNEL_ID);
        if !keep {
            debug!(channel_id = ?channel_id, "dropping non-Teams activity");
        }
        Ok(keep)
    }
}

/// Drops activities from team channels (channel data names a team).
pub struct DropChannelActivitiesMiddleware;

#[async_trait]
impl Middleware for DropChannelActivitiesMiddleware {
    async fn before(&self, ctx: &TurnContext) -> Result<bool> {
        let in_team = ctx
            .activity()
            .teams_channel_data()
            .is_some_and(|d| d.team.is_some());
        if in_team {
            debug!("dropping team channel activity");
        }
        Ok(!in_team)
    }
}

/// Drops personal and group chat activities.
pub struct DropChatActivitiesMiddleware;

#[async_trait]
impl Middleware for DropChatActivitiesMiddleware {
    async fn before(&self, ctx: &TurnContext) -> Result<bool> {
        let conversation_type = ctx
            .activity()
            .conversation
            .as_ref()
            .and_then(|c| c.conversation_type.as_deref());
        let is_chat = matches!(conversation_type, Some("personal") | Some("groupChat"));
        if is_chat {
            debug!(conversation_type = ?conversation_type, "dropping chat activity");
        }
        Ok(!is_chat)
    }
}
