use axum::http::{header, HeaderName, Method};
use axum::middleware;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use backend::routes::configure_routes;
use backend::shared::config::{get_database_path, load_config};
use backend::shared::data::db::{get_connection, initialize_database};
use backend::shared::data::seed::seed_from_csv;
use backend::system;
use backend::system::session::SESSION_HEADER;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = load_config()?;

    initialize_database(&get_database_path(&config))
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    seed_from_csv(get_connection(), &config.seed).await?;

    system::initialization::initialize_runtime(&config)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(SESSION_HEADER),
        ]);

    let app = configure_routes()
        .layer(middleware::from_fn(system::middleware::request_logger::request_logger))
        .layer(cors);

    let addr = format!("{}:{}", config.server.host, config.server.port);

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: {} is already in use. Please ensure no other process is using this port.",
                    addr
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
