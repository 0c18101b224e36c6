//! codesim server - HTTP REST API for batch source-code similarity reports
//!
//! Wraps one shared [`codesim::SimilarityEngine`] behind a small JSON API.
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe with provider details
//! - `GET /api/v1/languages` - Supported language tags
//! - `POST /api/v1/reports` - Compare a batch of files, returns the ranked report
//!
//! Errors are returned as `{"error": {"code", "message"}}` with status 400 for
//! invalid input, 502 when the embedding provider fails and 500 otherwise.
//!
//! # Configuration
//!
//! `server.{toml,yaml,json}` in the working directory, overridden by
//! `CODESIM_SERVER__*` environment variables (a `.env` file is read first):
//!
//! ```bash
//! CODESIM_SERVER__PORT=9000 CODESIM_SERVER__PIPELINE_CONFIG=codesim.yaml codesim-server
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, init_tracing, start_server};
pub use state::ServerState;
