//! Request handlers for different server endpoints

pub mod websocket;

use log::{debug, error};
use std::convert::Infallible;
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::{Filter, Reply};

use crate::config::ServerConfig;
use crate::constants::{STATIC_INDEX_FILE, WS_PATH};
use crate::core::pairing::SharedEngine;

// Re-export the websocket handler
pub use websocket::handle_ws_client;

/// All HTTP and WebSocket routes served by the chat server
pub fn routes(engine: SharedEngine, config: &ServerConfig) -> BoxedFilter<(Box<dyn Reply>,)> {
    let outbox_capacity = config.outbox_capacity;

    let ws_route = warp::path(WS_PATH)
        .and(warp::path::end())
        .and(warp::ws())
        .and(with_engine(engine.clone()))
        .map(move |ws: warp::ws::Ws, engine: SharedEngine| {
            debug!("New websocket connection");
            Box::new(ws.on_upgrade(move |socket| handle_ws_client(socket, engine, outbox_capacity)))
                as Box<dyn Reply>
        });

    let health_route = warp::path("health")
        .and(warp::path::end())
        .map(|| Box::new("OK") as Box<dyn Reply>);

    let stats_route = warp::path("stats")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_engine(engine))
        .map(stats_reply);

    let api = ws_route.or(health_route).unify().or(stats_route).unify().boxed();

    match &config.static_dir {
        Some(dir) => {
            let index = warp::path::end().and(warp::fs::file(dir.join(STATIC_INDEX_FILE)));
            let files = warp::fs::dir(dir.clone());
            let static_route = index
                .or(files)
                .unify()
                .map(|file: warp::fs::File| Box::new(file) as Box<dyn Reply>);
            api.or(static_route).unify().boxed()
        }
        None => api,
    }
}

fn stats_reply(engine: SharedEngine) -> Box<dyn Reply> {
    match engine.stats() {
        Ok(snapshot) => Box::new(warp::reply::json(&snapshot)),
        Err(e) => {
            error!("Failed to take stats snapshot: {}", e);
            Box::new(warp::reply::with_status(
                "stats unavailable",
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

// Helper function to include the engine in request
fn with_engine(
    engine: SharedEngine,
) -> impl Filter<Extract = (SharedEngine,), Error = Infallible> + Clone {
    warp::any().map(move || engine.clone())
}
