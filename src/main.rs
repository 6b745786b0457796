use std::sync::Arc;

use axum::Router;

mod config;
mod database;
mod dtos;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
mod state;
#[cfg(test)]
mod test_support;

use config::AppConfig;
use database::connection::get_db_client;
use database::mongo_store::MongoStore;
use errors::Result;
use services::account_directory::MongoAccountDirectory;
use services::mail_service::HttpMailSender;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match initialize_app_state(&config).await {
        Ok(state) => {
            tracing::info!("✅ Store, mail and account directory initialized");
            state
        }
        Err(e) => {
            tracing::error!("❌ Failed to initialize services: {}", e);
            std::process::exit(1);
        }
    };

    let app = routes::build_router(app_state);
    start_server(app, &config).await;
}

async fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    let db = get_db_client(config).await?;
    let mailer = HttpMailSender::new(&config.mail)?;

    tracing::info!("📧 Mail sender: {}", config.mail.sender());
    tracing::info!(
        "⏱️ OTP lifetime {} min, reset token lifetime {} min",
        config.otp.otp_ttl_minutes,
        config.otp.reset_token_ttl_minutes
    );

    Ok(AppState::new(
        Arc::new(MongoStore::new(db.clone())),
        Arc::new(mailer),
        Arc::new(MongoAccountDirectory::new(db)),
        config.otp,
        &config.mail.app_name,
    ))
}

async fn start_server(app: Router, config: &AppConfig) {
    let addr = config.bind_address();

    tracing::info!("🚀 Server starting on {}", addr);

    match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Server error: {}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    }
}
