//! # teams-processor
//!
//! Routes Teams activities to user handlers: messages (with file-download attachments), conversation
//! updates classified into [`TeamEvent`]s, invokes dispatched through the static [`registry`], and
//! message reactions. [`TeamsActivityProcessor`] is the entry point and also implements
//! [`teams_core::TurnHandler`].

pub mod classify;
pub mod conversation_update;
pub mod events;
pub mod handlers;
pub mod invoke;
pub mod processor;
pub mod registry;

pub use classify::{classify_activity, ActivityClassification};
pub use conversation_update::dispatch_conversation_update;
pub use events::{
    ChannelCreatedEvent, ChannelDeletedEvent, ChannelEvent, ChannelRenamedEvent, MembersAddedEvent,
    MembersRemovedEvent, TeamEvent, TeamRenamedEvent,
};
pub use handlers::{
    ConversationUpdateHandlers, FileDownloadHandler, GenericInvokeHandler, InvokeHandler,
    InvokeHandlers, MessageHandlers, MessageReactionHandlers, TeamEventHandler,
};
pub use invoke::dispatch_invoke;
pub use processor::TeamsActivityProcessor;
pub use registry::{
    definition, definition_by_name, InvokeDefinition, InvokeHandlerKey, InvokeKind,
    INVOKE_DEFINITIONS,
};
