#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `PermGuard` PEP client
//!
//! gRPC implementation of [`PolicyDecisionClient`](permguard_pep_sdk::PolicyDecisionClient)
//! for a `PermGuard` Policy Decision Point.
//!
//! - [`AZClient`] - client facade (`check`, `shutdown`)
//! - [`PdpClientConfig`] - connection settings, loadable from YAML and `PERMGUARD_PEP_*` env vars
//! - [`mapper`] - domain model to wire messages and back
//! - [`codec`] - property values to `google.protobuf.Struct` and back
//! - [`transport`] - [`PdpTransport`] seam and the tonic-based [`GrpcTransport`]
//!
//! ## Usage
//!
//! ```ignore
//! use permguard_pep::{AZClient, PdpClientConfig};
//!
//! let client = AZClient::connect(&PdpClientConfig::new("localhost", 9094)).await?;
//! let response = client.check(&request).await?;
//! client.shutdown();
//! ```

pub mod client;
pub mod codec;
pub mod config;
mod humantime_serde;
pub mod mapper;
pub mod transport;
pub mod wire;

pub use client::AZClient;
pub use config::PdpClientConfig;
pub use transport::{GrpcTransport, PdpTransport};
