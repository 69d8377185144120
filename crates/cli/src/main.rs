mod config;
mod error;

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use runtime::{AnthropicBackend, Conversation, FsToolHost};

use config::Config;
use error::Result;

const SYSTEM_PROMPT: &str = "You are Purser, a file management assistant. \
    Use the provided tools to manage files and folders based on user requests.";
const CONFIG_FILE: &str = "purser.toml";

#[derive(Parser)]
#[command(name = "purser")]
#[command(about = "A natural-language file assistant", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive command loop
    Chat,
    /// Run a single natural-language command and exit
    Run {
        /// The command, e.g. "create a folder called documents"
        #[arg(required = true)]
        command: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Chat) | None => cmd_chat().await,
        Some(Commands::Run { command }) => cmd_run(&command.join(" ")).await,
    }
}

async fn cmd_chat() -> Result<()> {
    println!("purser v{}", env!("CARGO_PKG_VERSION"));

    let (mut conversation, model) = build_conversation()?;
    println!("Model: {model}");
    println!("Config: {}", if std::path::Path::new(CONFIG_FILE).exists() {
        CONFIG_FILE
    } else {
        "default (working directory only)"
    });
    println!("Type commands in natural language. 'quit' or Ctrl+D to exit.");
    println!("Example: create a folder called test with a file inside named example.txt\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }

        match conversation.run(input).await {
            Ok(result) => {
                println!("\n{result}\n");
            }
            Err(e) => {
                eprintln!("Error: {e}\n");
            }
        }
    }

    println!("\nGoodbye.");
    Ok(())
}

async fn cmd_run(command: &str) -> Result<()> {
    let (mut conversation, _) = build_conversation()?;
    let result = conversation.run(command).await?;
    println!("{result}");
    Ok(())
}

/// Assemble the conversation from explicit configuration; no ambient state.
fn build_conversation() -> Result<(Conversation<AnthropicBackend, FsToolHost>, String)> {
    let config = Config::load_or_default(CONFIG_FILE)?;
    let api_key = config.api_key()?;
    let model =
        std::env::var("PURSER_MODEL").unwrap_or_else(|_| config.backend.model.clone());

    let backend = AnthropicBackend::builder(api_key, &model)
        .system(SYSTEM_PROMPT)
        .build();
    let host = FsToolHost::new(config.policy);

    Ok((Conversation::new(backend, host), model))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
