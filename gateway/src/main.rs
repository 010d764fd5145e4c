//! Gateway entry-point: loads settings, wires adapters, and serves HTTP.

mod server;

use std::sync::Arc;
use std::time::Duration;

use actix_web::{rt, web};
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use gateway::config::GatewaySettings;
use gateway::domain::PaperGatewayService;
use gateway::domain::ports::{IdentityResolver, UnconfiguredIdentityResolver};
use gateway::inbound::http::health::HealthState;
use gateway::inbound::http::state::HttpState;
use gateway::outbound::identity::{DEFAULT_IDENTITY_TIMEOUT, HttpIdentityResolver};
use gateway::outbound::rpc::GrpcSemanticBackend;
use server::{ServerConfig, create_server};

const BACKEND_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

fn build_identity_resolver(settings: &GatewaySettings) -> std::io::Result<Arc<dyn IdentityResolver>> {
    let Some(base) = settings.identity_url.as_ref() else {
        return Ok(Arc::new(UnconfiguredIdentityResolver));
    };
    let resolver = HttpIdentityResolver::new(base, settings.identity_timeout(DEFAULT_IDENTITY_TIMEOUT))
        .map_err(std::io::Error::other)?;
    info!(validate_url = %resolver.validate_url(), "identity service configured");
    Ok(Arc::new(resolver))
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

    let settings = GatewaySettings::from_env(&DefaultEnv::new()).map_err(std::io::Error::other)?;

    let identity = build_identity_resolver(&settings)?;
    let backend = GrpcSemanticBackend::connect_lazy(&settings.backend_addr, BACKEND_CONNECT_TIMEOUT)
        .map_err(|e| {
            std::io::Error::other(format!(
                "invalid backend address {}: {e}",
                settings.backend_addr
            ))
        })?;
    info!(backend_addr = %settings.backend_addr, "semantic backend channel created");

    let papers = PaperGatewayService::new(Arc::new(backend), settings.rpc_deadline);
    let config = ServerConfig::new(
        settings.bind_addr,
        HttpState::new(papers, identity),
        settings.allowed_origins.clone(),
    )
    .with_swagger(settings.swagger_enabled)
    .with_public_url(settings.public_url.clone())
    .with_docs_credentials(settings.docs_credentials.clone());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;

    let handle = server.handle();
    let shutdown_health = health_state.clone();
    rt::spawn(async move {
        if rt::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested; failing probes before draining");
            shutdown_health.mark_unhealthy();
            handle.stop(true).await;
        }
    });

    let result = server.await;
    health_state.mark_unhealthy();
    result
}
