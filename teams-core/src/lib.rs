//! # teams-core
//!
//! Core types and traits for the Teams activity layer: the [`Activity`] envelope and Teams payload
//! [`schema`], the per-turn [`TurnContext`] with the host's [`ActivitySender`], the [`TurnHandler`] and
//! [`Middleware`] traits, [`TeamsContext`] helpers, and tracing initialization. Host-agnostic; used by
//! teams-processor, turn-chain and teams-middleware.

pub mod activity;
pub mod context;
pub mod error;
pub mod handler;
pub mod logger;
pub mod schema;
pub mod teams_context;

pub use activity::{
    Activity, ActivityKind, ActivityType, Attachment, ChannelAccount, ConversationAccount,
    ConversationParameters, ConversationReference, ConversationUpdateActivity, Entity,
    InvokeActivity, MessageActivity, MessageReaction, MessageReactionActivity, ResourceResponse,
};
pub use context::{ActivitySender, TurnContext};
pub use error::{HandlerError, Result, TeamsError};
pub use handler::{Middleware, TurnHandler};
pub use logger::{init_console_tracing, init_tracing};
pub use schema::{
    content_types, decode_payload, ChannelInfo, FileDownloadInfo, InvokeResponse,
    InvokeResponseTyped, Payload, TeamEventType, TeamInfo, TeamsChannelData, TenantInfo,
};
pub use teams_context::{
    add_mention_to_text, is_teams_channel_account, is_teams_channel_accounts, notify_user,
    TeamsContext,
};
