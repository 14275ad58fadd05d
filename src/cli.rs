//! Command-line interface

use crate::chat;
use crate::settings::{Settings, DEFAULT_SETTINGS_FILE};
use anyhow::Result;
use clap::{Parser, Subcommand};
use scrapedeck_core::{AgentRegistry, ConversationStore, InteractionController};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Scrapedeck agent console
#[derive(Parser)]
#[command(name = "scrapedeck", version, about = "Console for AI scraping agents")]
pub struct Cli {
    /// Path to the settings/seed file
    #[arg(short, long, default_value = DEFAULT_SETTINGS_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List registered agents and summary stats
    Agents,
    /// Interactive chat with the agents (default)
    Chat,
}

/// Run the parsed command.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(&cli.config)?;
    let registry = Arc::new(AgentRegistry::from_agents(settings.agents)?);
    info!(agents = registry.len(), "Registry loaded");

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Agents => {
            print_agents(&registry);
            Ok(())
        }
        Commands::Chat => {
            let store = Arc::new(ConversationStore::new());
            let controller = InteractionController::with_simulated_responder(
                registry,
                store,
                &settings.interaction,
            );
            chat::run(controller).await
        }
    }
}

fn print_agents(registry: &AgentRegistry) {
    for agent in registry.list() {
        println!(
            "{:<10} {:<24} {:<7} {:>6.1}%  last active {}",
            agent.id, agent.name, agent.status.to_string(), agent.success_rate, agent.last_active
        );
        if !agent.description.is_empty() {
            println!("{:<10} {}", "", agent.description);
        }
    }
    let summary = registry.summary();
    println!(
        "\n{} agents ({} active, {} idle, {} error), avg success rate {:.1}%",
        summary.total, summary.active, summary.idle, summary.errored, summary.avg_success_rate
    );
}
