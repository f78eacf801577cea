use chrono::Local;
use habit_tracker::{router, AppState, Config, FileStorage, HabitStore, Period};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let storage = FileStorage::open(&config.data_dir)?;
    info!("storing habit data in {}", storage.dir().display());

    let store = HabitStore::open(storage);
    let period = Period::containing(Local::now().date_naive());
    let app = router(AppState::new(store, period));

    info!("listening on http://{}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
