use clap::Subcommand;

use crate::auth;
use crate::database::{DatabaseManager, UserStore};

#[derive(Subcommand)]
pub enum SuperuserCommands {
    #[command(about = "Create a superuser account")]
    Create {
        #[arg(help = "Login name for the new account")]
        username: String,

        #[arg(help = "Password for the new account")]
        password: String,
    },
}

pub async fn handle(cmd: SuperuserCommands) -> anyhow::Result<()> {
    match cmd {
        SuperuserCommands::Create { username, password } => create(username, password).await,
    }
}

async fn create(username: String, password: String) -> anyhow::Result<()> {
    let username = username.trim().to_string();
    if username.is_empty() {
        anyhow::bail!("Username must not be empty");
    }
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }

    let pool = DatabaseManager::pool().await?;
    let store = UserStore::new(pool);

    if store.get_by_username(&username).await?.is_some() {
        anyhow::bail!("User '{}' already exists", username);
    }

    let hashed = auth::hash_password(&password)?;
    let user = store.create(&username, &hashed, true).await?;

    println!("Created superuser '{}' (id {})", user.username, user.id);
    Ok(())
}
