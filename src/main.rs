//! Server entry point. `clinic-backend hash-password <password>` prints an argon2 hash for seeding accounts.

use clinic_backend::{
    app, apply_migrations, auth::hash_password, ensure_database_exists, AppState, PgStore, Settings,
    SystemClock,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    if let Some(cmd) = args.next() {
        if cmd == "hash-password" {
            let password = args.next().ok_or("usage: clinic-backend hash-password <password>")?;
            println!("{}", hash_password(&password)?);
            return Ok(());
        }
        return Err(format!("unknown command: {}", cmd).into());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("clinic_backend=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    ensure_database_exists(&settings.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .connect(&settings.database_url)
        .await?;
    apply_migrations(&pool).await?;

    let state = AppState::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(SystemClock::new(settings.utc_offset)),
        &settings,
    );

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
