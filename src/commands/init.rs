use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the ledger home, its `data` directory and an initial `config.json` holding the default
/// denomination table and ticket catalogue.
///
/// # Arguments
/// - `ledger_home` - The directory that will be the root of the data directory, e.g.
///   `$HOME/ledger`
///
/// # Errors
/// - Returns an error if the home is already initialized or if any file operations fail.
pub async fn init(ledger_home: &Path) -> Result<Out<()>> {
    let config = Config::create(ledger_home)
        .await
        .context("Unable to create the data directory and configs")?;
    Ok(format!(
        "Successfully created the ledger directory at {}, edit {} to change the denomination \
        table",
        config.root().display(),
        config.config_path().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_home() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("ledger");
        let out = init(&home).await.unwrap();
        assert!(out.message().contains("config.json"));
        let config = Config::load(&home).await.unwrap();
        assert!(out.message().contains(&config.root().display().to_string()));
    }

    #[tokio::test]
    async fn test_init_refuses_existing_home() {
        let dir = TempDir::new().unwrap();
        init(dir.path()).await.unwrap();
        assert!(init(dir.path()).await.is_err());
    }
}
