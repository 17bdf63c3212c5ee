use std::sync::Arc;

use bull_web::config::{self, AppState};
use bull_web::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Worker threads from config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr, cfg.server.backlog)?;
    let state = Arc::new(AppState::new(&cfg));

    logger::log_server_start(&addr, &cfg);

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local.run_until(server::run(listener, state)).await
}
