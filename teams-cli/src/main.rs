use anyhow::{Context, Result};
use clap::Parser;
use teams_cli::{load_activities, logging_processor, replay, BotConfig, Cli, Commands};
use teams_processor::classify_activity;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { file } => {
            teams_core::init_console_tracing()?;
            let activities = load_activities(&file)?;
            for activity in &activities {
                let line = serde_json::to_string(&classify_activity(activity))
                    .context("Serialize classification")?;
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Replay { file, log_file } => {
            let mut config = BotConfig::load().context("Load config from env")?;
            if let Some(log_file) = log_file {
                config.log_file = log_file;
            }
            config.validate()?;
            teams_core::init_tracing(&config.log_file)
                .with_context(|| format!("Init tracing to {}", config.log_file))?;

            let activities = load_activities(&file)?;
            let chain = config.build_chain(logging_processor());
            for report in replay(&chain, activities).await {
                let line = serde_json::to_string(&report).context("Serialize turn report")?;
                println!("{}", line);
            }
            Ok(())
        }
    }
}
