use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

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
    let state = Arc::new(config::AppState::new(cfg));

    // Asset directories must exist before the first request is served
    if let Err(e) = state.routes.ensure_asset_dirs() {
        logger::log_error(&format!("Failed to create asset directories: {e}"));
        return Err(e.into());
    }

    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &state.config);

    server::run(listener, state).await
}
