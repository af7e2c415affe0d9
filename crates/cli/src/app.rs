use std::path::Path;

use anyhow::{Context, Result};
use heroic_import_core::{config::AppConfig, importer::Importer, library::library_files};
use tracing::{info, warn};

/// Import every library export under `library_dir`, stopping at the first failure.
pub async fn run(config: &AppConfig, library_dir: &Path) -> Result<()> {
    let files = library_files(library_dir)?;
    if files.is_empty() {
        warn!("No library files found in {}", library_dir.display());
        return Ok(());
    }

    let descriptor = config.connection();
    let importer = Importer::new();

    for file in files {
        info!("Processing file: {}", file.display());
        let content = tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("failed to read {}", file.display()))?;
        let summary = importer
            .import_with(&content, &descriptor)
            .await
            .with_context(|| format!("failed to import {}", file.display()))?;
        info!(
            "{}: {} games, {} inserted, {} skipped",
            file.display(),
            summary.total,
            summary.inserted,
            summary.skipped
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf};

    use tempfile::tempdir;

    fn sqlite_config(db: &Path) -> AppConfig {
        AppConfig {
            library_path: PathBuf::from("unused"),
            database_provider: "sqlite".to_string(),
            connection_string: format!("sqlite://{}?mode=rwc", db.display()),
        }
    }

    #[tokio::test]
    async fn imports_every_library_file() -> Result<()> {
        let temp = tempdir()?;
        let library = temp.path().join("store_cache");
        fs::create_dir_all(&library)?;
        fs::write(
            library.join("gog_library.json"),
            r#"{"games": [{"title": "Foo", "runner": "gog"}]}"#,
        )?;
        fs::write(
            library.join("legendary_library.json"),
            r#"{"library": [{"title": "Foo", "runner": "legendary"}, {"title": "Foo", "runner": "gog"}]}"#,
        )?;
        fs::write(library.join("installed.json"), "not json")?;

        let db = temp.path().join("games.db");
        let config = sqlite_config(&db);
        let mut connection = config.connection().open().await?;
        let schema = connection.prepare(
            "CREATE TABLE games (title TEXT, runner TEXT, can_run_offline BOOLEAN, \
             is_linux_native BOOLEAN, install_size REAL, description TEXT, \
             short_description TEXT, store_url TEXT, genres TEXT, release_date DATE, \
             date_added TIMESTAMP)",
        );
        connection.execute(&schema).await?;
        connection.close().await?;

        run(&config, &library).await?;

        let mut connection = config.connection().open().await?;
        let count = connection.prepare("SELECT COUNT(*) FROM games");
        assert_eq!(connection.fetch_count(&count).await?, 2);
        connection.close().await?;
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_aborts_the_run() -> Result<()> {
        let temp = tempdir()?;
        fs::write(temp.path().join("broken_library.json"), "{\"games\": [")?;
        let config = sqlite_config(&temp.path().join("games.db"));

        assert!(run(&config, temp.path()).await.is_err());
        Ok(())
    }
}
