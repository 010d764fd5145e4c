//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
use url::Url;
use utoipa_swagger_ui::SwaggerUi;

use gateway::config::DocsCredentials;
use gateway::doc::ApiDoc;
use gateway::inbound::http::configure;
use gateway::inbound::http::cors::cors_policy;
use gateway::inbound::http::health::HealthState;
use gateway::inbound::http::state::HttpState;
use gateway::{DocsAuth, RequestLog, Trace};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    swagger_enabled: bool,
    allowed_origins: Arc<[String]>,
    public_url: Option<Url>,
    docs_credentials: Option<DocsCredentials>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        swagger_enabled,
        allowed_origins,
        public_url,
        docs_credentials,
    } = deps;

    // Last wrap runs first: Trace, RequestLog, CORS, then the docs guard.
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(DocsAuth::new(docs_credentials))
        .wrap(cors_policy(&allowed_origins))
        .wrap(RequestLog)
        .wrap(Trace)
        .configure(configure);

    app.configure(move |cfg| {
        if swagger_enabled {
            cfg.service(SwaggerUi::new("/docs").url(
                "/api-docs/openapi.json",
                ApiDoc::for_public_url(public_url.as_ref()),
            ));
        }
    })
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// The readiness probe flips to ready once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        http_state,
        swagger_enabled,
        allowed_origins,
        public_url,
        docs_credentials,
    } = config;
    let docs_guarded = docs_credentials.is_some();
    info!(origins = ?allowed_origins, "CORS origins configured");
    let allowed_origins: Arc<[String]> = allowed_origins.into();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            swagger_enabled,
            allowed_origins: Arc::clone(&allowed_origins),
            public_url: public_url.clone(),
            docs_credentials: docs_credentials.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, swagger_enabled, docs_guarded, "gateway listening");
    health_state.mark_ready();
    Ok(server)
}
