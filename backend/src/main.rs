//! Backend entry-point: configuration from the environment, migrations, and
//! server start-up.

use std::env;
use std::net::SocketAddr;

use actix_web::web;
use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::server::{PaymentGatewayConfig, ServerConfig, create_server};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

const DEFAULT_PAYMENT_API_BASE: &str = "https://api.stripe.com";

fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|e| std::io::Error::other(format!("database connection failed: {e}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
    Ok(())
}

fn load_token_secret() -> std::io::Result<Vec<u8>> {
    let secret_path =
        env::var("TOKEN_SECRET_FILE").unwrap_or_else(|_| "/var/run/secrets/token_secret".into());
    match std::fs::read(&secret_path) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            let allow_dev = env::var("TOKEN_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %secret_path, error = %e, "using ephemeral token secret (dev only)");
                Ok(uuid::Uuid::new_v4().into_bytes().to_vec())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read token secret at {secret_path}: {e}"
                )))
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let token_secret = load_token_secret()?;
    let mut config = ServerConfig::new(bind_addr, token_secret);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        run_migrations(&database_url)?;
        let pool = DbPool::new(PoolConfig::new(&database_url))
            .await
            .map_err(|e| std::io::Error::other(format!("pool construction failed: {e}")))?;
        config = config.with_db_pool(pool);
    } else {
        warn!("DATABASE_URL not set; running on the in-memory store");
    }

    match env::var("PAYMENT_SECRET_KEY") {
        Ok(secret_key) => {
            let api_base = env::var("PAYMENT_API_BASE")
                .unwrap_or_else(|_| DEFAULT_PAYMENT_API_BASE.into());
            config = config.with_payment_gateway(PaymentGatewayConfig {
                api_base,
                secret_key,
            });
        }
        Err(_) => {
            warn!("PAYMENT_SECRET_KEY not set; charge intents use the fixture gateway");
        }
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    create_server(health_state, config)?.await
}
