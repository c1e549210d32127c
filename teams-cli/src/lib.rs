//! teams-bot CLI: classify and replay recorded Teams activities. Config from env (see [`BotConfig`]).

pub mod cli;
pub mod config;
pub mod input;
pub mod replay;

pub use cli::{Cli, Commands};
pub use config::BotConfig;
pub use input::{load_activities, parse_activities};
pub use replay::{logging_processor, replay, CollectingSender, TurnReport};
