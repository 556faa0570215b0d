pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "Gallery CLI - Administrative commands for the gallery API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Superuser account management")]
    Superuser {
        #[command(subcommand)]
        cmd: commands::superuser::SuperuserCommands,
    },

    #[command(about = "Run pending database migrations")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Superuser { cmd } => commands::superuser::handle(cmd).await,
        Commands::Migrate => commands::migrate::handle().await,
    }
}
