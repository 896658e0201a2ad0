use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cineseek")]
#[command(author, version, about = "Conversational movie identification assistant", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer a single movie clue and exit
    Ask {
        clue: String,
    },

    /// Start an interactive clue-guessing session
    Interactive,

    /// List the registered tools and their parameters
    Tools,

    /// Show the completion-provider chain and degradation state
    Status,
}
