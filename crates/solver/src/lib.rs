//! Client side of the external constellation generator / relay-path solver.
//!
//! - `wire`: JSON types exchanged with the service
//! - `transport`: the request/reply seam the viewer talks to
//! - `http`: background-thread HTTP implementation of that seam

pub mod http;
pub mod transport;
pub mod wire;

pub use http::*;
pub use transport::*;
pub use wire::*;

/// Errors produced while talking to the solver service.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service answered with status {0}")]
    Status(u16),
    #[error("could not decode reply: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("service could not parse the request: {0}")]
    Rejected(String),
    #[error("reply carries no network")]
    MissingNetwork,
    #[error("could not start solver worker: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("solver worker is gone")]
    WorkerGone,
}
