use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use group_cache::group::coordinator::Group;
use group_cache::group::registry;
use group_cache::peers::handlers;
use group_cache::peers::pool::HttpPool;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use sysinfo::System;

const API_ADDR: &str = "127.0.0.1:9999";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut port: u16 = 8001;
    let mut api = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                port = args[i + 1].parse()?;
                i += 2;
            }
            "--api" => {
                api = true;
                i += 1;
            }
            "--help" => {
                eprintln!("Usage: {} [--port <8001|8002|8003>] [--api]", args[0]);
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    // Fixed demo topology: three cache nodes, one optional API front-end.
    let node_addrs: HashMap<u16, String> = [8001, 8002, 8003]
        .into_iter()
        .map(|p| (p, format!("http://127.0.0.1:{}", p)))
        .collect();

    let Some(self_addr) = node_addrs.get(&port).cloned() else {
        anyhow::bail!("--port must be one of 8001, 8002, 8003");
    };

    let group = create_group();

    let pool = HttpPool::new(&self_addr);
    pool.set(node_addrs.values().cloned());
    group.register_peers(pool.clone());

    tracing::info!("Starting cache node at {}", self_addr);

    if api {
        let api_group = group.clone();
        tokio::spawn(async move {
            if let Err(e) = start_api_server(api_group).await {
                tracing::error!("API server failed: {:#}", e);
            }
        });
    }

    start_cache_server(&self_addr, pool).await
}

/// The `scores` group over a mock slow database. Every origin lookup is
/// logged, which makes cache hits and peer routing visible in the demo.
fn create_group() -> Arc<Group> {
    let db: HashMap<&'static str, &'static str> =
        [("Tom", "630"), ("Jack", "589"), ("Sam", "567")]
            .into_iter()
            .collect();

    registry::new_group("scores", 2 << 10, move |key: String| {
        let db = db.clone();
        async move {
            tracing::info!("[slow db] search key {}", key);
            match db.get(key.as_str()) {
                Some(value) => Ok(value.as_bytes().to_vec()),
                None => Err(anyhow::anyhow!("{} does not exist", key)),
            }
        }
    })
}

/// Serves this node's share of the cache to its peers.
async fn start_cache_server(self_addr: &str, pool: Arc<HttpPool>) -> anyhow::Result<()> {
    let listen_addr: SocketAddr = self_addr.trim_start_matches("http://").parse()?;
    let app = handlers::router(pool);

    tracing::info!("Cache server listening on {}", listen_addr);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// User-facing front-end: `/api?key=...` plus a `/stats` snapshot.
async fn start_api_server(group: Arc<Group>) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/api", get(handle_api))
        .route("/stats", get(handle_stats))
        .layer(Extension(group));

    tracing::info!("API server listening on {}", API_ADDR);

    let listener = tokio::net::TcpListener::bind(API_ADDR).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Deserialize)]
struct ApiParams {
    key: String,
}

async fn handle_api(
    Extension(group): Extension<Arc<Group>>,
    Query(params): Query<ApiParams>,
) -> Response {
    match group.get(&params.key).await {
        Ok(view) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            view.to_vec(),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)).into_response(),
    }
}

#[derive(Serialize)]
struct NodeStatsResponse {
    group: String,
    entries: usize,
    used_bytes: usize,
    hits: u64,
    misses: u64,
    loads: u64,
    peer_fetches: u64,
    peer_failures: u64,
    evictions: u64,
    cpu_usage: f32,
    mem_used_mb: u64,
    mem_total_mb: u64,
}

async fn handle_stats(Extension(group): Extension<Arc<Group>>) -> Json<NodeStatsResponse> {
    const MB: u64 = 1024 * 1024;

    let snapshot = group.snapshot();

    let mut sys = System::new_all();
    sys.refresh_cpu();
    sys.refresh_memory();

    Json(NodeStatsResponse {
        group: snapshot.name,
        entries: snapshot.entries,
        used_bytes: snapshot.used_bytes,
        hits: snapshot.hits,
        misses: snapshot.misses,
        loads: snapshot.loads,
        peer_fetches: snapshot.peer_fetches,
        peer_failures: snapshot.peer_failures,
        evictions: snapshot.evictions,
        cpu_usage: sys.global_cpu_info().cpu_usage(),
        mem_used_mb: sys.used_memory() / MB,
        mem_total_mb: sys.total_memory() / MB,
    })
}
