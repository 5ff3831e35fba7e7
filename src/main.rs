//! netagent CLI entry point

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use anyhow::Result;

use netagent::adapters::{cli::CliChannel, web::WebChannel, Channel, ChannelRegistry};
use netagent::agent::{Profile, ProviderRegistry};
use netagent::config::{self, Config};
use netagent::tools::ToolRegistry;
use netagent::ui;

#[derive(Parser)]
#[command(name = "netagent")]
#[command(about = "Tool-calling AI assistant for network troubleshooting")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update ~/.netagent/config.json
    Onboard,

    /// Send one question to the agent and print the answer
    Ask {
        /// Question, command or logs to send
        #[arg(short, long)]
        message: String,

        /// Assistant to use: research or network
        #[arg(short, long, default_value = "network")]
        profile: Profile,
    },

    /// Interactive prompt; every line is a separate question
    Chat {
        #[arg(short, long, default_value = "network")]
        profile: Profile,
    },

    /// Serve the browser UI
    Serve {
        #[arg(short, long, default_value = "network")]
        profile: Profile,

        /// Address to listen on (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Show configuration status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Onboard => {
            config::onboard()?;
            println!("\nNext steps:");
            println!("  netagent ask -p research -m \"What is OSPF?\"");
            println!("  netagent serve -p network");
        }

        Commands::Ask { message, profile } => {
            let config = config::load()?;
            let channel = CliChannel::new(profile.build_agent(&config)?, profile);
            match channel.run_once(&message).await {
                Ok(answer) => {
                    ui::print_success("Response Generated!");
                    println!("\n{}", answer);
                }
                Err(e) => {
                    ui::print_error(&format!("Error: {e}"));
                    std::process::exit(1);
                }
            }
        }

        Commands::Chat { profile } => {
            let config = config::load()?;
            let channel = CliChannel::new(profile.build_agent(&config)?, profile);
            tracing::info!("Starting {} channel", channel.name());
            channel.start().await?;
        }

        Commands::Serve { profile, bind } => {
            let config = config::load()?;
            let bind = bind.unwrap_or_else(|| config.web.bind.clone());
            let channel = WebChannel::new(profile.build_agent(&config)?, profile, bind.clone());
            ui::print_step(&format!("{} on http://{}", profile.title(), bind));
            tracing::info!("Starting {} channel", channel.name());
            channel.start().await?;
        }

        Commands::Status => {
            let config = config::load()?;
            print_status(&config)?;
        }
    }

    Ok(())
}

fn print_status(config: &Config) -> Result<()> {
    println!("netagent status\n");
    println!("Config file: {:?}", config::config_path());
    println!(
        "Provider: {} (available: {})",
        config.provider,
        ProviderRegistry::available().join(", ")
    );
    println!("Model: {}", config.model);
    println!("API key: {}", if config.api_key.is_empty() { "not set" } else { "✓" });
    println!("Search API key: {}", if config.search.api_key.is_empty() { "not set" } else { "✓" });
    println!(
        "Device: {}@{}:{} ({})",
        config.device.username,
        config.device.host,
        config.device.port,
        if config.device.password.is_empty() { "key auth" } else { "password auth" }
    );
    println!("Web UI bind: {}", config.web.bind);
    println!("Max iterations: {}", config.max_iterations);

    if config.api_key.is_empty() {
        ui::print_warning("No model API key. Set OPENAI_API_KEY or run `netagent onboard`.");
    }
    if config.search.api_key.is_empty() {
        ui::print_warning("No search API key. The research profile needs TAVILY_API_KEY.");
    }

    for profile in Profile::all() {
        let tools: ToolRegistry = profile.tools(config)?;
        println!("Profile {}: {}", profile, tools.tool_names().join(", "));
    }

    println!("\nChannels:");
    for name in ChannelRegistry::available() {
        println!("  {:<4} {}", name, ChannelRegistry::description(name));
    }
    Ok(())
}
