//! Send one chat completion to a local OpenAI-compatible server and print the reply

use std::path::PathBuf;

use clap::Parser;
use ping_service::{
    chat::ChatClient,
    config::{Settings, DEFAULT_CONFIG_PATH},
    telemetry,
};
use tracing::{info, warn};

const DEFAULT_PROMPT: &str = "Prove or disprove: We can measure the one-way speed of light.";

#[derive(Debug, Parser)]
#[command(name = "chat-probe", version, about)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Base URL of the chat service, e.g. http://localhost:8080/v1
    #[arg(long, env = "CHAT_BASE_URL")]
    base_url: Option<String>,

    /// Model name
    #[arg(long, env = "CHAT_MODEL")]
    model: Option<String>,

    /// System prompt
    #[arg(long)]
    system: Option<String>,

    /// User prompt
    #[arg(default_value = DEFAULT_PROMPT)]
    prompt: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = Settings::load_from_path(&cli.config)?;
    if let Some(base_url) = cli.base_url {
        settings.chat.base_url = base_url;
    }
    if let Some(model) = cli.model {
        settings.chat.model = model;
    }
    if let Some(system) = cli.system {
        settings.chat.system_prompt = system;
    }
    settings.validate()?;

    telemetry::init_stderr(&settings.logging);

    let client = ChatClient::new(&settings.chat)?;
    info!(base_url = %client.base_url(), model = %client.model(), "Sending chat completion");

    match client.ask(&settings.chat.system_prompt, &cli.prompt).await? {
        Some(reply) => println!("{}", reply),
        None => warn!("Completion carried no content"),
    }

    Ok(())
}
