use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config::Config, error, types::PkceToken};

pub async fn start_api_server(cfg: Config, state: Arc<Mutex<Option<PkceToken>>>) {
    let addr = match SocketAddr::from_str(&cfg.server_address) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let app = Router::new()
        .route("/health", get(api::health))
        .route(
            "/callback",
            get(api::callback)
                .layer::<_, std::convert::Infallible>(Extension(state))
                .layer::<_, std::convert::Infallible>(Extension(cfg)),
        );

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind callback server on {}: {}", addr, e),
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!("Callback server failed: {}", e);
    }
}
