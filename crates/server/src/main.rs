//! codesim server binary.
//!
//! The embedding provider is built before the tokio runtime starts and the
//! last `Arc` to it is released after the runtime has shut down.

use std::sync::Arc;

use anyhow::Context;
use codesim::{build_provider, SimilarityEngine};
use server::ServerConfig;

fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load().context("loading server config")?;
    server::init_tracing(&config.log_level);

    let pipeline = config.pipeline().context("loading pipeline config")?;
    let provider = build_provider(&pipeline.embedding).context("building embedding provider")?;
    let engine = Arc::new(SimilarityEngine::new(provider, pipeline.engine_config()));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")?;
    let result = runtime.block_on(server::start_server(config, Arc::clone(&engine)));

    drop(runtime);
    drop(engine);
    result
}
