//! Handler traits and the four optional handler sets a processor is built from.
//!
//! Every slot is optional; an empty slot means "not interested". Each trait is implemented for async
//! closures taking an owned [`TurnContext`] (and payload), so handlers can be registered inline.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use teams_core::{
    FileDownloadInfo, InvokeResponse, InvokeResponseTyped, Payload, Result, TurnContext,
    TurnHandler,
};

use crate::events::{ChannelEvent, MembersAddedEvent, MembersRemovedEvent, TeamRenamedEvent};
use crate::registry::{
    ComposeFetchTask, ComposeQuery, ComposeQueryLink, ComposeSubmitAction, ExecuteAction,
    FileConsentInvoke, InvokeHandlerKey, InvokeKind, TaskFetch, TaskSubmit, VerifyState,
};

/// Receives the content of a file-download-info attachment, undecoded.
#[async_trait]
pub trait FileDownloadHandler: Send + Sync {
    async fn on_file_download(
        &self,
        ctx: &TurnContext,
        info: Payload<FileDownloadInfo>,
    ) -> Result<()>;
}

#[async_trait]
impl<F, Fut> FileDownloadHandler for F
where
    F: Fn(TurnContext, Payload<FileDownloadInfo>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn on_file_download(
        &self,
        ctx: &TurnContext,
        info: Payload<FileDownloadInfo>,
    ) -> Result<()> {
        (self)(ctx.clone(), info).await
    }
}

/// Receives one classified conversation-update event.
#[async_trait]
pub trait TeamEventHandler<E: Send + 'static>: Send + Sync {
    async fn on_event(&self, event: E) -> Result<()>;
}

#[async_trait]
impl<E, F, Fut> TeamEventHandler<E> for F
where
    E: Send + 'static,
    F: Fn(E) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn on_event(&self, event: E) -> Result<()> {
        (self)(event).await
    }
}

/// Typed handler for the invoke operation `K`. `Ok(None)` sends no invoke response.
///
/// The request arrives as the activity's raw `value`; a payload that does not fit `K::Request` is
/// the handler's to deal with.
#[async_trait]
pub trait InvokeHandler<K: InvokeKind>: Send + Sync {
    async fn on_invoke(
        &self,
        ctx: &TurnContext,
        request: Payload<K::Request>,
    ) -> Result<Option<InvokeResponseTyped<K::Response>>>;
}

#[async_trait]
impl<K, F, Fut> InvokeHandler<K> for F
where
    K: InvokeKind,
    F: Fn(TurnContext, Payload<K::Request>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<InvokeResponseTyped<K::Response>>>> + Send + 'static,
{
    async fn on_invoke(
        &self,
        ctx: &TurnContext,
        request: Payload<K::Request>,
    ) -> Result<Option<InvokeResponseTyped<K::Response>>> {
        (self)(ctx.clone(), request).await
    }
}

/// Fallback for invokes no registered typed handler matched.
#[async_trait]
pub trait GenericInvokeHandler: Send + Sync {
    async fn on_invoke(&self, ctx: &TurnContext) -> Result<Option<InvokeResponse>>;
}

#[async_trait]
impl<F, Fut> GenericInvokeHandler for F
where
    F: Fn(TurnContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<InvokeResponse>>> + Send + 'static,
{
    async fn on_invoke(&self, ctx: &TurnContext) -> Result<Option<InvokeResponse>> {
        (self)(ctx.clone()).await
    }
}

/// Invoke handler with the payload shapes erased, so all slots live in one map.
#[async_trait]
pub(crate) trait ErasedInvokeHandler: Send + Sync {
    async fn call(&self, ctx: &TurnContext, value: Option<&Value>) -> Result<Option<InvokeResponse>>;
}

struct Typed<K, H> {
    handler: H,
    _kind: PhantomData<fn() -> K>,
}

#[async_trait]
impl<K, H> ErasedInvokeHandler for Typed<K, H>
where
    K: InvokeKind,
    H: InvokeHandler<K>,
{
    async fn call(&self, ctx: &TurnContext, value: Option<&Value>) -> Result<Option<InvokeResponse>> {
        let request = Payload::new(value.cloned());
        match self.handler.on_invoke(ctx, request).await? {
            Some(response) => Ok(Some(response.into_untyped()?)),
            None => Ok(None),
        }
    }
}

#[derive(Clone, Default)]
pub struct MessageHandlers {
    pub(crate) message: Option<Arc<dyn TurnHandler>>,
    pub(crate) file_download: Option<Arc<dyn FileDownloadHandler>>,
}

impl MessageHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_message(mut self, handler: impl TurnHandler + 'static) -> Self {
        self.message = Some(Arc::new(handler));
        self
    }

    /// Takes precedence over [`Self::on_message`] when the message carries a file-download attachment.
    pub fn on_message_with_file_download_info(
        mut self,
        handler: impl FileDownloadHandler + 'static,
    ) -> Self {
        self.file_download = Some(Arc::new(handler));
        self
    }
}

#[derive(Clone, Default)]
pub struct ConversationUpdateHandlers {
    pub(crate) members_added: Option<Arc<dyn TeamEventHandler<MembersAddedEvent>>>,
    pub(crate) members_removed: Option<Arc<dyn TeamEventHandler<MembersRemovedEvent>>>,
    pub(crate) channel_created: Option<Arc<dyn TeamEventHandler<ChannelEvent>>>,
    pub(crate) channel_deleted: Option<Arc<dyn TeamEventHandler<ChannelEvent>>>,
    pub(crate) channel_renamed: Option<Arc<dyn TeamEventHandler<ChannelEvent>>>,
    pub(crate) team_renamed: Option<Arc<dyn TeamEventHandler<TeamRenamedEvent>>>,
    pub(crate) conversation_update: Option<Arc<dyn TurnHandler>>,
}

impl ConversationUpdateHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_team_members_added(
        mut self,
        handler: impl TeamEventHandler<MembersAddedEvent> + 'static,
    ) -> Self {
        self.members_added = Some(Arc::new(handler));
        self
    }

    pub fn on_team_members_removed(
        mut self,
        handler: impl TeamEventHandler<MembersRemovedEvent> + 'static,
    ) -> Self {
        self.members_removed = Some(Arc::new(handler));
        self
    }

    pub fn on_channel_created(mut self, handler: impl TeamEventHandler<ChannelEvent> + 'static) -> Self {
        self.channel_created = Some(Arc::new(handler));
        self
    }

    pub fn on_channel_deleted(mut self, handler: impl TeamEventHandler<ChannelEvent> + 'static) -> Self {
        self.channel_deleted = Some(Arc::new(handler));
        self
    }

    pub fn on_channel_renamed(mut self, handler: impl TeamEventHandler<ChannelEvent> + 'static) -> Self {
        self.channel_renamed = Some(Arc::new(handler));
        self
    }

    pub fn on_team_renamed(mut self, handler: impl TeamEventHandler<TeamRenamedEvent> + 'static) -> Self {
        self.team_renamed = Some(Arc::new(handler));
        self
    }

    /// Runs for every conversation update, after any event-specific handler.
    pub fn on_conversation_update_activity(mut self, handler: impl TurnHandler + 'static) -> Self {
        self.conversation_update = Some(Arc::new(handler));
        self
    }
}

#[derive(Clone, Default)]
pub struct InvokeHandlers {
    handlers: HashMap<InvokeHandlerKey, Arc<dyn ErasedInvokeHandler>>,
    pub(crate) generic: Option<Arc<dyn GenericInvokeHandler>>,
}

impl InvokeHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a typed handler for the operation `K`, replacing any earlier one.
    pub fn with<K, H>(mut self, handler: H) -> Self
    where
        K: InvokeKind,
        H: InvokeHandler<K> + 'static,
    {
        let erased: Arc<dyn ErasedInvokeHandler> = Arc::new(Typed::<K, H> {
            handler,
            _kind: PhantomData,
        });
        self.handlers.insert(K::KEY, erased);
        self
    }

    pub fn on_o365_card_action<H: InvokeHandler<ExecuteAction> + 'static>(self, handler: H) -> Self {
        self.with::<ExecuteAction, H>(handler)
    }

    pub fn on_signin_state_verification<H: InvokeHandler<VerifyState> + 'static>(
        self,
        handler: H,
    ) -> Self {
        self.with::<VerifyState, H>(handler)
    }

    pub fn on_file_consent<H: InvokeHandler<FileConsentInvoke> + 'static>(self, handler: H) -> Self {
        self.with::<FileConsentInvoke, H>(handler)
    }

    pub fn on_messaging_extension_query<H: InvokeHandler<ComposeQuery> + 'static>(
        self,
        handler: H,
    ) -> Self {
        self.with::<ComposeQuery, H>(handler)
    }

    pub fn on_app_based_link_query<H: InvokeHandler<ComposeQueryLink> + 'static>(
        self,
        handler: H,
    ) -> Self {
        self.with::<ComposeQueryLink, H>(handler)
    }

    pub fn on_messaging_extension_fetch_task<H: InvokeHandler<ComposeFetchTask> + 'static>(
        self,
        handler: H,
    ) -> Self {
        self.with::<ComposeFetchTask, H>(handler)
    }

    pub fn on_messaging_extension_submit_action<H: InvokeHandler<ComposeSubmitAction> + 'static>(
        self,
        handler: H,
    ) -> Self {
        self.with::<ComposeSubmitAction, H>(handler)
    }

    pub fn on_task_module_fetch<H: InvokeHandler<TaskFetch> + 'static>(self, handler: H) -> Self {
        self.with::<TaskFetch, H>(handler)
    }

    pub fn on_task_module_submit<H: InvokeHandler<TaskSubmit> + 'static>(self, handler: H) -> Self {
        self.with::<TaskSubmit, H>(handler)
    }

    /// Generic fallback, called with the turn context when no typed handler matched.
    pub fn on_invoke(mut self, handler: impl GenericInvokeHandler + 'static) -> Self {
        self.generic = Some(Arc::new(handler));
        self
    }

    pub fn is_registered(&self, key: InvokeHandlerKey) -> bool {
        self.handlers.contains_key(&key)
    }

    pub(crate) fn handler(&self, key: InvokeHandlerKey) -> Option<&Arc<dyn ErasedInvokeHandler>> {
        self.handlers.get(&key)
    }
}

#[derive(Clone, Default)]
pub struct MessageReactionHandlers {
    pub(crate) message_reaction: Option<Arc<dyn TurnHandler>>,
}

impl MessageReactionHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_message_reaction(mut self, handler: impl TurnHandler + 'static) -> Self {
        self.message_reaction = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for InvokeHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&'static str> = self.handlers.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        f.debug_struct("InvokeHandlers")
            .field("handlers", &keys)
            .field("on_invoke", &self.generic.is_some())
            .finish()
    }
}
