//! Service entry point: load settings, wire adapters, serve HTTP.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use identity_registration::inbound::http::auth::TokenVerifier;
use identity_registration::inbound::http::health::HealthState;
use identity_registration::settings::AppSettings;

use server::{ServerConfig, build_identity_pool, build_registration, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load configuration")?
        .into_runtime()
        .wrap_err("invalid configuration")?;

    let verifier = TokenVerifier::new(&settings.token).wrap_err("token verification key")?;
    let pool = build_identity_pool(&settings).await?;
    let registration = build_registration(&settings, pool)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig::new(settings.bind_addr, registration, verifier),
    )
    .wrap_err_with(|| format!("failed to bind {}", settings.bind_addr))?;
    info!(bind_addr = %settings.bind_addr, "identity registration service listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("HTTP server terminated with an error")
}
