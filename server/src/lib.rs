//! HTTP boundary for the todo item service.
//!
//! # Design
//! The router owns transport concerns only: extracting path, form and JSON
//! input, and turning `ServiceError` kinds into status codes. All business
//! rules live in `todo_core::ItemService`, which is the router state.
//!
//! Client-IP resolution and request logging are `from_fn` layers wrapped
//! around the routes, never part of the handlers.

use std::future::Future;
use std::net::SocketAddr;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use todo_core::ItemService;

pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod postgres;
pub mod routes;

pub use error::ApiError;

pub fn app(service: ItemService) -> Router {
    Router::new()
        .route("/todo/", get(routes::list_items).post(routes::create_item))
        .route("/todo/done", post(routes::mark_done))
        .route("/todo/{item_id}", get(routes::get_item))
        .layer(from_fn(middleware::log_requests))
        .layer(from_fn(middleware::resolve_client_ip))
        .with_state(service)
}

/// Serve until the process is killed.
pub async fn run(listener: TcpListener, service: ItemService) -> Result<(), std::io::Error> {
    serve(listener, service, std::future::pending()).await
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(
    listener: TcpListener,
    service: ItemService,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = app(service).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
