//! CLI entrypoint for chatbridge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::Result;
use chatbridge_application::ChatService;
use chatbridge_infrastructure::{ClaudeCompletionGateway, ConfigLoader, McpToolGateway};
use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chatbridge", about = "Chat client bridging a messages API and an MCP tool server")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a config file (merged over the global and project configs)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stream assistant replies as they are generated
    #[arg(long)]
    stream: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?;
    for issue in config.validate() {
        warn!("{issue}");
    }

    info!(model = %config.provider.model, "Starting chatbridge");

    // === Dependency Injection ===
    let completion = Arc::new(ClaudeCompletionGateway::new(
        config.provider.api_url.clone(),
        config.provider.api_key.clone(),
        config.provider.model.clone(),
        config.provider.max_tokens,
    ));
    let tools = Arc::new(McpToolGateway::new(config.mcp.server_url.clone()));

    let service = ChatService::new(
        completion,
        tools,
        config.behavior.append_tool_results,
    );

    // A failed tool connection degrades to a chat without tools
    if let Err(err) = service.connect().await {
        warn!("Tool server unavailable, continuing without tools: {err}");
    } else {
        let tools = service.current_session().available_tools().to_vec();
        println!("Connected to tool server ({} tools available)", tools.len());
    }

    let streaming = cli.stream || config.behavior.stream_responses;
    run_repl(&service, streaming).await?;

    service.disconnect().await;
    Ok(())
}

async fn run_repl(service: &ChatService, streaming: bool) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("Type a message, /tools to list tools, /quit to exit.");

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                match line {
                    "/quit" | "/exit" => break,
                    "/tools" => print_tools(service).await,
                    _ => {
                        if streaming {
                            send_streaming(service, line).await;
                        } else {
                            send_blocking(service, line).await;
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                warn!("Input error: {err}");
                break;
            }
        }
    }

    Ok(())
}

async fn print_tools(service: &ChatService) {
    match service.list_tools().await {
        Ok(tools) if tools.is_empty() => println!("No tools advertised."),
        Ok(tools) => {
            for tool in tools {
                println!("  {} - {}", tool.name, tool.description);
            }
        }
        Err(err) => println!("Cannot list tools: {err}"),
    }
}

async fn send_blocking(service: &ChatService, line: &str) {
    match service.send_message(line).await {
        Ok(reply) => println!("{}", reply.content),
        Err(err) => println!("Error: {err}"),
    }
}

async fn send_streaming(service: &ChatService, line: &str) {
    let (tx, mut rx) = mpsc::channel::<String>(32);
    let printer = tokio::spawn(async move {
        let mut stdout = std::io::stdout();
        while let Some(chunk) = rx.recv().await {
            print!("{chunk}");
            let _ = stdout.flush();
        }
        println!();
    });

    let result = service.send_message_streaming(line, tx).await;
    let _ = printer.await;
    if let Err(err) = result {
        println!("Error: {err}");
    }
}
