use crate::database::DatabaseManager;

pub async fn handle() -> anyhow::Result<()> {
    DatabaseManager::migrate().await?;
    println!("Migrations are up to date");
    Ok(())
}
