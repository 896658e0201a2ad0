use anyhow::Result;
use cineseek::cli::{Cli, Commands};
use cineseek::{utils, Session, Settings};
use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone())),
        )
        .init();

    let cli = Cli::parse();
    let session = Session::from_settings(settings)?;

    match cli.command {
        Commands::Ask { clue } => handle_ask(session, clue).await,
        Commands::Interactive => handle_interactive(session).await,
        Commands::Tools => handle_tools(session),
        Commands::Status => handle_status(session),
    }
}

async fn handle_ask(mut session: Session, clue: String) -> Result<()> {
    utils::print_info("Thinking...");

    let outcome = session.process(&clue).await;

    println!("\n{}", outcome.response);
    if !outcome.suggested_movies.is_empty() {
        utils::print_header("Suggested");
        utils::print_movies(&outcome.suggested_movies);
    }
    Ok(())
}

async fn handle_interactive(mut session: Session) -> Result<()> {
    utils::print_header("Movie Identification");
    utils::print_info("Describe the movie you are thinking of ('exit' to quit)\n");

    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin);

    loop {
        utils::print_prompt("You: ");
        use std::io::Write;
        std::io::stdout().flush()?;

        let mut input = String::new();
        if reader.read_line(&mut input).await? == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input == "exit" || input == "quit" {
            break;
        }

        if input == "/history" {
            utils::print_info(&format!("Turns so far: {}", session.history().len() / 2));
            println!();
            continue;
        }

        if input == "/help" {
            println!("Special commands:");
            println!("  /history - Show turn count");
            println!("  /help    - Show this help");
            println!("  exit     - Quit\n");
            continue;
        }

        let outcome = session.process(input).await;
        println!("\n{}\n", outcome.response);
    }

    Ok(())
}

fn handle_tools(session: Session) -> Result<()> {
    utils::print_header("Registered Tools");
    for tool in session.list_tools() {
        println!("{}", tool);
        for param in &tool.parameters {
            let requirement = if param.required { "required" } else { "optional" };
            println!(
                "    {} ({}, {}): {}",
                param.name, param.param_type, requirement, param.description
            );
        }
        println!();
    }
    Ok(())
}

fn handle_status(session: Session) -> Result<()> {
    let status = session.completion_status();

    utils::print_header("Completion Chain");
    if status.providers.is_empty() {
        utils::print_error("No providers configured (set OPENAI_API_KEY, OPENAI_API_KEY_BACKUP, or GOOGLE_API_KEY)");
    } else {
        for provider in &status.providers {
            println!("  - {}", provider);
        }
    }

    match &status.current_provider {
        Some(p) => utils::print_info(&format!("Last used: {}", p)),
        None => utils::print_info("Last used: none yet"),
    }

    if status.degraded {
        utils::print_error("Degraded: a previous turn exhausted every provider");
    } else {
        utils::print_success("Healthy");
    }

    Ok(())
}
