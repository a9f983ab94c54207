use clap::{Parser, Subcommand};
use std::sync::Arc;

mod domain;
mod application;
mod infrastructure;

use application::errors::{BotError, ConfigError};
use application::services::{Collaborators, MessageService};
use domain::entities::ChannelConfig;
use domain::traits::{ChannelConfigStore, ChatPlatform};
use infrastructure::adapters::ConsoleAdapter;
use infrastructure::config::Config;
use infrastructure::imagesearch::LexicaClient;
use infrastructure::llm::{GeminiClassifier, RelayClient};
use infrastructure::storage::JsonChannelStore;

#[derive(Parser)]
#[command(name = "shape-bot")]
#[command(about = "Chat bot that relays messages to a generation service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
    /// Designate the dedicated channel of a guild
    SetChannel { guild: String, channel: String },
    /// Remove the dedicated channel of a guild
    ClearChannel { guild: String },
    /// Show the dedicated channel of a guild
    ShowChannel { guild: String },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Version => {
            println!("shape-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(&cli.config),
        command => block_on(run_command(command, load_config(&cli.config))),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn block_on<F: std::future::Future<Output = Result<(), BotError>>>(future: F) -> Result<(), BotError> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(future)
}

/// Config file when present, defaults otherwise, with environment overrides
fn load_config(path: &str) -> Config {
    let config = if std::path::Path::new(path).exists() {
        Config::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    } else {
        Config::default()
    };
    config.with_env()
}

fn init_config(path: &str) -> Result<(), BotError> {
    if std::path::Path::new(path).exists() {
        println!("Config already exists at {}", path);
        return Ok(());
    }
    let yaml = Config::default().to_yaml()?;
    std::fs::write(path, yaml)
        .map_err(|e| ConfigError::Parse(format!("Failed to write config: {}", e)))?;
    println!("Wrote default config to {}", path);
    Ok(())
}

async fn run_command(command: Commands, config: Config) -> Result<(), BotError> {
    let store = JsonChannelStore::open(&config.storage.path).await?;

    match command {
        Commands::Run => run_bot(config, store).await,
        Commands::SetChannel { guild, channel } => {
            store.set(ChannelConfig::new(guild.clone(), channel.clone())).await?;
            println!("Dedicated channel for {} is now {}", guild, channel);
            Ok(())
        }
        Commands::ClearChannel { guild } => {
            if store.clear(&guild).await? {
                println!("Cleared dedicated channel for {}", guild);
            } else {
                println!("No dedicated channel set for {}", guild);
            }
            Ok(())
        }
        Commands::ShowChannel { guild } => {
            match store.get(&guild).await? {
                Some(config) => println!("{}: {}", guild, config.channel_id),
                None => println!("No dedicated channel set for {}", guild),
            }
            Ok(())
        }
        Commands::Version | Commands::InitConfig => Ok(()),
    }
}

async fn run_bot(config: Config, store: JsonChannelStore) -> Result<(), BotError> {
    config.validate()?;
    let relay_url = config.relay.url.clone()
        .ok_or_else(|| ConfigError::MissingField("relay.url".to_string()))?;

    if config.engagement.ambient_enabled && config.classifier.api_key.is_none() {
        tracing::warn!("Ambient replies enabled without GEMINI_API_KEY, classification will fail");
    }

    tracing::info!("Starting {} (ambient: {})", config.bot.name, config.engagement.ambient_enabled);

    let collaborators = Collaborators {
        store: Arc::new(store),
        generation: Arc::new(RelayClient::new(relay_url)),
        images: Arc::new(LexicaClient::new(config.image_search.url.clone())),
        classifier: Arc::new(GeminiClassifier::new(
            config.classifier.url.clone(),
            config.classifier.api_key.clone().unwrap_or_default(),
        )),
    };
    let adapter = Arc::new(ConsoleAdapter::new(config.bot.user_id.clone(), config.bot.name.clone()));
    let service = MessageService::new(adapter.clone(), collaborators, config.service_settings());

    let bot = adapter.bot_info();
    println!("{} ({}) is listening on the console", bot.name, bot.id);
    println!(
        "Type messages. Start with \"{}\" or <@{}> to address the bot, \"> \" to reply to it. Ctrl-D quits.",
        config.bot.command_prefix.trim_end(),
        config.bot.user_id
    );

    let mut lines = ConsoleAdapter::stdin_lines();
    while let Some(message) = adapter.next_message(&mut lines).await? {
        if let Err(e) = service.process(&message).await {
            tracing::error!("[{}] Failed to handle message: {}", message.channel_id, e);
        }
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}
