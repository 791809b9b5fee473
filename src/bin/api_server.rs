use std::sync::Arc;

use anyhow::Result;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use campus_coffee::infra::config;
use campus_coffee::storage::postgres::{self, PgPosStore, PgReviewStore, PgUserStore};
use campus_coffee::transport;
use campus_coffee::{ApprovalConfig, PosService, ReviewService, UserService};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("connecting to the database...");
    let pool = postgres::connect(&config::database_url()).await?;
    postgres::init_schema(&pool).await?;

    let approval = Arc::new(ApprovalConfig::new(config::min_approval_count()));
    info!("approval quorum set to {}", approval.min_count());

    let users = Arc::new(UserService::new(Arc::new(PgUserStore::new(pool.clone()))));
    let pos = Arc::new(PosService::new(Arc::new(PgPosStore::new(pool.clone()))));
    let reviews = Arc::new(ReviewService::new(
        Arc::new(PgReviewStore::new(pool.clone())),
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(PgPosStore::new(pool.clone())),
        approval,
    ));

    let app_state = transport::http::AppState {
        users,
        pos,
        reviews,
        pool: Some(pool),
    };

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url(
            "/api-docs/openapi.json",
            transport::http::ApiDoc::openapi(),
        ))
        .layer(cors);

    let addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on http://{addr}");
    info!("Swagger UI available at http://{addr}/swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("graceful shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
