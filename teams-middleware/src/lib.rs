//! # teams-middleware
//!
//! Turn middleware for Teams bots: activity logging, a tenant allowlist, and filters that drop activities
//! from other channels, from team channels or from chats.

pub mod drop_filters;
pub mod logging;
pub mod tenant;

pub use drop_filters::{
    DropChannelActivitiesMiddleware, DropChatActivitiesMiddleware,
    DropNonTeamsActivitiesMiddleware, TEAMS_CHANNEL_ID,
};
pub use logging::LoggingMiddleware;
pub use tenant::TenantAllowlistMiddleware;

#[cfg(test)]
mod test;
