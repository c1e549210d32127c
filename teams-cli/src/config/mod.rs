//! Bot config loaded from env: log file, tenant allowlist and activity filters.

use std::env;
use std::sync::Arc;

use anyhow::Result;
use teams_middleware::{
    DropChannelActivitiesMiddleware, DropChatActivitiesMiddleware,
    DropNonTeamsActivitiesMiddleware, LoggingMiddleware, TenantAllowlistMiddleware,
};
use teams_processor::TeamsActivityProcessor;
use turn_chain::TurnChain;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// LOG_FILE
    pub log_file: String,
    /// TEAMS_ALLOWED_TENANTS, comma-separated; empty allows every tenant
    pub allowed_tenants: Vec<String>,
    /// TEAMS_DROP_NON_TEAMS
    pub drop_non_teams: bool,
    /// TEAMS_DROP_CHANNEL
    pub drop_channel: bool,
    /// TEAMS_DROP_CHAT
    pub drop_chat: bool,
}

impl BotConfig {
    /// Load from environment variables.
    pub fn load() -> Result<Self> {
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/teams-bot.log".to_string());
        let allowed_tenants = env::var("TEAMS_ALLOWED_TENANTS")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            log_file,
            allowed_tenants,
            drop_non_teams: env_flag("TEAMS_DROP_NON_TEAMS", true)?,
            drop_channel: env_flag("TEAMS_DROP_CHANNEL", false)?,
            drop_chat: env_flag("TEAMS_DROP_CHAT", false)?,
        })
    }

    /// Dropping both channel and chat activities would leave nothing to handle.
    pub fn validate(&self) -> Result<()> {
        if self.drop_channel && self.drop_chat {
            anyhow::bail!("TEAMS_DROP_CHANNEL and TEAMS_DROP_CHAT cannot both be enabled");
        }
        Ok(())
    }

    /// Logging first, then the enabled filters, then the tenant allowlist; `processor` is the only handler.
    pub fn build_chain(&self, processor: TeamsActivityProcessor) -> TurnChain {
        let mut chain = TurnChain::new().add_middleware(Arc::new(LoggingMiddleware));
        if self.drop_non_teams {
            chain = chain.add_middleware(Arc::new(DropNonTeamsActivitiesMiddleware));
        }
        if self.drop_channel {
            chain = chain.add_middleware(Arc::new(DropChannelActivitiesMiddleware));
        }
        if self.drop_chat {
            chain = chain.add_middleware(Arc::new(DropChatActivitiesMiddleware));
        }
        if !self.allowed_tenants.is_empty() {
            chain = chain.add_middleware(Arc::new(TenantAllowlistMiddleware::new(
                self.allowed_tenants.clone(),
            )));
        }
        chain.add_handler(Arc::new(processor))
    }
}

fn env_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => anyhow::bail!("{} must be a boolean, got {:?}", name, other),
        },
    }
}
