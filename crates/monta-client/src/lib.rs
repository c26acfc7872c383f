//! `monta-client`: blocking client for the Monta fulfilment API.
//!
//! # Architecture
//!
//! ```text
//! MontaConfig (injected at call time)
//!     │
//!     ▼
//! MontaHttp      ← basic auth, timeout, no-cache + `_ts` buster, JSON decode
//!     │
//!     ▼
//! MontaClient    ← typed endpoint wrappers (orders, shipments, orderevents)
//!     │
//!     ▼
//! StatusResolver ← shipments > orderevents > derived header status
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod resolver;

pub use client::MontaClient;
pub use error::ClientError;
pub use http::MontaHttp;
pub use resolver::{ResolveMeta, StatusResolver};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClientError>;
