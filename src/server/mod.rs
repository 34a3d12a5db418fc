//! HTTP API for Opero

mod api;

pub use api::{router, run_server};
