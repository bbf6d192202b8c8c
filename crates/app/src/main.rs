use engine::{Engine, Latency, Seed, Store};
use server::AuthSettings;

use crate::error::Result;

mod error;
mod settings;

fn load_store(seed: Option<&str>) -> Result<Store> {
    let Some(path) = seed else {
        tracing::info!("No seed file configured, starting empty");
        return Ok(Store::new());
    };

    let raw = std::fs::read_to_string(path)?;
    let seed: Seed = serde_json::from_str(&raw)?;
    tracing::info!(
        path,
        expenses = seed.expenses.len(),
        incomes = seed.incomes.len(),
        budgets = seed.budgets.len(),
        categories = seed.categories.len(),
        "Loaded seed"
    );
    Ok(Store::from_seed(seed))
}

async fn run(settings: settings::Settings) -> Result<()> {
    let store = load_store(settings.api.seed.as_deref())?;
    let engine = Engine::builder()
        .store(store)
        .latency(Latency::from_millis(settings.api.latency_ms))
        .build();
    let auth = AuthSettings {
        token_ttl_secs: settings.auth.token_ttl_secs,
    };

    let listener =
        tokio::net::TcpListener::bind((settings.server.bind.as_str(), settings.server.port))
            .await?;
    server::run_with_listener(engine, auth, listener).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tally={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    tracing::info!(
        latency_ms = settings.api.latency_ms,
        "Starting on {}:{}",
        settings.server.bind,
        settings.server.port
    );

    if let Err(err) = run(settings).await {
        tracing::error!("{err}");
        return Err(err);
    }
    Ok(())
}
