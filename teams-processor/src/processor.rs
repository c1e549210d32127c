//! Top-level activity router.

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use teams_core::{Activity, ActivityKind, MessageActivity, Payload, Result, TurnContext, TurnHandler};

use crate::conversation_update::dispatch_conversation_update;
use crate::handlers::{
    ConversationUpdateHandlers, InvokeHandlers, MessageHandlers, MessageReactionHandlers,
};
use crate::invoke::dispatch_invoke;

/// Routes each incoming activity to at most one handler per category.
///
/// Unknown activity types and unregistered handlers are silent no-ops. Handler errors propagate unchanged.
#[derive(Clone, Default)]
pub struct TeamsActivityProcessor {
    message_handlers: Option<MessageHandlers>,
    conversation_update_handlers: Option<ConversationUpdateHandlers>,
    invoke_handlers: Option<InvokeHandlers>,
    message_reaction_handlers: Option<MessageReactionHandlers>,
}

impl TeamsActivityProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message_handlers(mut self, handlers: MessageHandlers) -> Self {
        self.message_handlers = Some(handlers);
        self
    }

    pub fn with_conversation_update_handlers(mut self, handlers: ConversationUpdateHandlers) -> Self {
        self.conversation_update_handlers = Some(handlers);
        self
    }

    pub fn with_invoke_handlers(mut self, handlers: InvokeHandlers) -> Self {
        self.invoke_handlers = Some(handlers);
        self
    }

    pub fn with_message_reaction_handlers(mut self, handlers: MessageReactionHandlers) -> Self {
        self.message_reaction_handlers = Some(handlers);
        self
    }

    pub fn set_message_handlers(&mut self, handlers: Option<MessageHandlers>) {
        self.message_handlers = handlers;
    }

    pub fn set_conversation_update_handlers(&mut self, handlers: Option<ConversationUpdateHandlers>) {
        self.conversation_update_handlers = handlers;
    }

    pub fn set_invoke_handlers(&mut self, handlers: Option<InvokeHandlers>) {
        self.invoke_handlers = handlers;
    }

    pub fn set_message_reaction_handlers(&mut self, handlers: Option<MessageReactionHandlers>) {
        self.message_reaction_handlers = handlers;
    }

    pub fn invoke_handlers(&self) -> Option<&InvokeHandlers> {
        self.invoke_handlers.as_ref()
    }

    /// Classifies the turn's activity and runs the matching handlers.
    ///
    /// For invokes, a returned response is sent back as one `invokeResponse` activity.
    #[instrument(skip(self, ctx), fields(activity_type = %ctx.activity().activity_type))]
    pub async fn process_incoming_activity(&self, ctx: &TurnContext) -> Result<()> {
        match ctx.activity().kind() {
            ActivityKind::Message(message) => {
                if let Some(handlers) = &self.message_handlers {
                    self.process_message(ctx, &message, handlers).await?;
                }
            }
            ActivityKind::ConversationUpdate(update) => {
                if let Some(handlers) = &self.conversation_update_handlers {
                    dispatch_conversation_update(ctx, &update, handlers).await?;
                }
            }
            ActivityKind::Invoke(invoke) => {
                if let Some(handlers) = &self.invoke_handlers {
                    if let Some(response) = dispatch_invoke(ctx, &invoke, handlers).await? {
                        info!(status = response.status, "step: sending invoke response");
                        let value = serde_json::to_value(&response)?;
                        ctx.send_activity(Activity::invoke_response(value)).await?;
                    }
                }
            }
            ActivityKind::MessageReaction(_) => {
                if let Some(handler) = self
                    .message_reaction_handlers
                    .as_ref()
                    .and_then(|h| h.message_reaction.as_ref())
                {
                    info!("step: message reaction handler");
                    handler.on_turn(ctx).await?;
                }
            }
            ActivityKind::Other(activity_type) => {
                debug!(activity_type = %activity_type, "activity type not routed");
            }
        }
        Ok(())
    }

    async fn process_message(
        &self,
        ctx: &TurnContext,
        message: &MessageActivity<'_>,
        handlers: &MessageHandlers,
    ) -> Result<()> {
        if let Some(file_handler) = &handlers.file_download {
            if let Some(attachment) = message.file_download_attachment() {
                info!(
                    attachment = attachment.name.as_deref().unwrap_or_default(),
                    "step: file download handler"
                );
                let info = Payload::new(attachment.content.clone());
                return file_handler.on_file_download(ctx, info).await;
            }
        }

        if let Some(handler) = &handlers.message {
            info!("step: message handler");
            handler.on_turn(ctx).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl TurnHandler for TeamsActivityProcessor {
    async fn on_turn(&self, ctx: &TurnContext) -> Result<()> {
        self.process_incoming_activity(ctx).await
    }
}
