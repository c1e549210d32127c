//! Replays recorded activities through a turn chain and collects what the bot sent back.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use teams_core::{
    Activity, ActivitySender, FileDownloadInfo, InvokeResponse, InvokeResponseTyped, Payload,
    ResourceResponse, TeamsContext, TeamsError, TurnContext,
};
use teams_processor::{
    ChannelEvent, ConversationUpdateHandlers, InvokeHandler, InvokeHandlers, InvokeKind,
    MembersAddedEvent, MembersRemovedEvent, MessageHandlers, MessageReactionHandlers,
    TeamRenamedEvent, TeamsActivityProcessor,
};
use turn_chain::{TurnChain, TurnOutcome};

/// Keeps outgoing activities in memory instead of delivering them.
#[derive(Default)]
pub struct CollectingSender {
    sent: Mutex<Vec<Activity>>,
}

impl CollectingSender {
    pub fn take(&self) -> Vec<Activity> {
        match self.sent.lock() {
            Ok(mut sent) => std::mem::take(&mut *sent),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

#[async_trait]
impl ActivitySender for CollectingSender {
    async fn send_activities(
        &self,
        activities: Vec<Activity>,
    ) -> teams_core::Result<Vec<ResourceResponse>> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|e| TeamsError::Send(e.to_string()))?;
        let responses = (0..activities.len())
            .map(|i| ResourceResponse {
                id: format!("replay-{}", sent.len() + i),
            })
            .collect();
        sent.extend(activities);
        Ok(responses)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReport {
    pub activity_id: Option<String>,
    pub activity_type: String,
    /// `completed`, `dropped` or `failed`.
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub sent: Vec<Activity>,
}

/// Runs each activity as its own turn. A failed turn is reported and replay continues.
pub async fn replay(chain: &TurnChain, activities: Vec<Activity>) -> Vec<TurnReport> {
    let mut reports = Vec::with_capacity(activities.len());
    for activity in activities {
        let activity_id = activity.id.clone();
        let activity_type = activity.activity_type.to_string();
        let sender = Arc::new(CollectingSender::default());
        let ctx = TurnContext::new(activity, sender.clone());

        let (outcome, error) = match chain.run(&ctx).await {
            Ok(TurnOutcome::Completed) => ("completed", None),
            Ok(TurnOutcome::Dropped) => ("dropped", None),
            Err(e) => {
                warn!(activity_id = ?activity_id, error = %e, "turn failed");
                ("failed", Some(e.to_string()))
            }
        };
        reports.push(TurnReport {
            activity_id,
            activity_type,
            outcome,
            error,
            sent: sender.take(),
        });
    }
    reports
}

/// Answers every typed invoke with an empty 200.
struct AcknowledgeInvoke;

#[async_trait]
impl<K: InvokeKind> InvokeHandler<K> for AcknowledgeInvoke {
    async fn on_invoke(
        &self,
        ctx: &TurnContext,
        _request: Payload<K::Request>,
    ) -> teams_core::Result<Option<InvokeResponseTyped<K::Response>>> {
        info!(
            handler = %K::KEY,
            invoke_name = ?ctx.activity().name,
            "invoke acknowledged"
        );
        Ok(Some(InvokeResponseTyped::status(200)))
    }
}

/// Processor with a logging handler in every slot.
///
/// Messages are echoed back without bot mentions; file downloads are acknowledged by name; typed invokes
/// get an empty 200; other invokes get no response.
pub fn logging_processor() -> TeamsActivityProcessor {
    let message_handlers = MessageHandlers::new()
        .on_message(|ctx: TurnContext| async move {
            let text = TeamsContext::from(&ctx).get_activity_text_without_mentions();
            info!(text = %text, "message received");
            ctx.send_text(format!("echo: {}", text)).await?;
            Ok::<_, TeamsError>(())
        })
        .on_message_with_file_download_info(|ctx: TurnContext, info: Payload<FileDownloadInfo>| async move {
            let info = info.decode()?;
            info!(unique_id = ?info.unique_id, file_type = ?info.file_type, "file download received");
            ctx.send_text(format!(
                "file received: {}",
                info.unique_id.as_deref().unwrap_or("unknown")
            ))
            .await?;
            Ok::<_, TeamsError>(())
        });

    let conversation_update_handlers = ConversationUpdateHandlers::new()
        .on_team_members_added(|event: MembersAddedEvent| async move {
            let team = event.team.as_ref().and_then(|t| t.id.as_deref());
            info!(count = event.members_added.len(), team = ?team, "team members added");
            Ok::<_, TeamsError>(())
        })
        .on_team_members_removed(|event: MembersRemovedEvent| async move {
            let team = event.team.as_ref().and_then(|t| t.id.as_deref());
            info!(count = event.members_removed.len(), team = ?team, "team members removed");
            Ok::<_, TeamsError>(())
        })
        .on_channel_created(log_channel_event)
        .on_channel_deleted(log_channel_event)
        .on_channel_renamed(log_channel_event)
        .on_team_renamed(|event: TeamRenamedEvent| async move {
            let team = event.team.as_ref().and_then(|t| t.name.as_deref());
            info!(team = ?team, "team renamed");
            Ok::<_, TeamsError>(())
        })
        .on_conversation_update_activity(|ctx: TurnContext| async move {
            info!(event_type = ?TeamsContext::from(&ctx).event_type(), "conversation update");
            Ok::<_, TeamsError>(())
        });

    let invoke_handlers = InvokeHandlers::new()
        .on_o365_card_action(AcknowledgeInvoke)
        .on_signin_state_verification(AcknowledgeInvoke)
        .on_file_consent(AcknowledgeInvoke)
        .on_messaging_extension_query(AcknowledgeInvoke)
        .on_app_based_link_query(AcknowledgeInvoke)
        .on_messaging_extension_fetch_task(AcknowledgeInvoke)
        .on_messaging_extension_submit_action(AcknowledgeInvoke)
        .on_task_module_fetch(AcknowledgeInvoke)
        .on_task_module_submit(AcknowledgeInvoke)
        .on_invoke(|ctx: TurnContext| async move {
            info!(invoke_name = ?ctx.activity().name, "unhandled invoke");
            Ok::<_, TeamsError>(None::<InvokeResponse>)
        });

    let message_reaction_handlers = MessageReactionHandlers::new().on_message_reaction(
        |ctx: TurnContext| async move {
            let activity = ctx.activity();
            info!(
                added = activity.reactions_added.len(),
                removed = activity.reactions_removed.len(),
                "message reaction"
            );
            Ok::<_, TeamsError>(())
        },
    );

    TeamsActivityProcessor::new()
        .with_message_handlers(message_handlers)
        .with_conversation_update_handlers(conversation_update_handlers)
        .with_invoke_handlers(invoke_handlers)
        .with_message_reaction_handlers(message_reaction_handlers)
}

async fn log_channel_event(event: ChannelEvent) -> teams_core::Result<()> {
    info!(
        event_type = event.event_type.as_str(),
        channel = ?event.channel.as_ref().and_then(|c| c.name.as_deref()),
        "channel event"
    );
    Ok(())
}
