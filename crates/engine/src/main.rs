//! Task game engine - plays a demo game from a JSON catalog file.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskgame_domain::GameId;
use taskgame_engine::infrastructure::catalog::{load_catalog_file, InMemoryCatalog};
use taskgame_engine::infrastructure::settings::EngineSettings;
use taskgame_engine::use_cases::game_task::{TaskRequest, TaskSource};
use taskgame_engine::App;

const DEMO_GAME_ID: &str = "demo";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskgame_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting task game engine");

    let settings = EngineSettings::from_env();
    if settings.players.is_empty() {
        anyhow::bail!("No players configured");
    }

    let entries = load_catalog_file(&settings.catalog_path, &settings.default_locale)
        .await
        .with_context(|| {
            format!(
                "Failed to load catalog from {}",
                settings.catalog_path.display()
            )
        })?;

    let catalog = Arc::new(InMemoryCatalog::with_entries(entries));
    let app = App::in_memory(catalog, settings.clone());
    let game_tasks = &app.use_cases.game_tasks;

    let game_id = GameId::new(DEMO_GAME_ID)?;
    let created = game_tasks
        .generate
        .execute(&game_id, TaskSource::GameCatalog)
        .await
        .context("Failed to generate game tasks")?;
    tracing::info!(game_id = %game_id, instances = created, "Demo game ready");

    for round in 0..settings.rounds {
        let index = usize::try_from(round).unwrap_or(0) % settings.players.len();
        let player = settings.players[index].clone();
        let request = TaskRequest::new(game_id.clone(), player.clone(), settings.players.clone());

        match game_tasks.advance.execute(request).await {
            Ok(Some(task)) => tracing::info!(
                round = round + 1,
                player = %player,
                key = %task.key.as_str(),
                locale = %task.locale,
                "{}",
                task.text
            ),
            Ok(None) => {
                tracing::info!(round = round + 1, player = %player, "No tasks left");
                break;
            }
            Err(e) if e.is_client_error() => {
                tracing::warn!(round = round + 1, player = %player, error = %e, "Task skipped");
            }
            Err(e) => return Err(e).context("Failed to advance game"),
        }
    }

    let snapshot = game_tasks.snapshot(&game_id).await;
    tracing::info!(
        game_id = %game_id,
        remaining = snapshot.instances.len(),
        "Demo game finished"
    );
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
    let _ = dotenvy::dotenv();
}
