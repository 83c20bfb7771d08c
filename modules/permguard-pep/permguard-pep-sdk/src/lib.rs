#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `PermGuard` PEP SDK
//!
//! This crate provides the transport-independent half of the `PermGuard`
//! Policy Enforcement Point client:
//!
//! - [`Value`], [`PropertyMap`] - Generic property/context values and the native codec
//! - [`AZRequest`], [`AZResponse`] and friends - Authorization model
//! - [`builder`] - Request builders ([`AZRequestBuilder`], [`AZAtomicRequestBuilder`], ...)
//! - [`PolicyDecisionClient`] - Client trait implemented by the gRPC facade
//! - [`BuildError`], [`CodecError`], [`PepClientError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use permguard_pep_sdk::{AZAtomicRequestBuilder, PolicyDecisionClient, PrincipalBuilder};
//!
//! let principal = PrincipalBuilder::new("spiffe://edge.example.com/workload/64ad91fe")
//!     .with_type("workload")
//!     .with_source("spire")
//!     .build()?;
//!
//! let request = AZAtomicRequestBuilder::new(
//!     634_601_921_829,
//!     "417b278c0d024cf789e3d3c2bc9854c6",
//!     "role/branch-owner",
//!     "PharmaAuthZFlow::Platform::Branch",
//!     "PharmaAuthZFlow::Platform::Action::assign-role",
//! )
//! .with_request_id("atomic-request-001")
//! .with_principal(principal)
//! .with_subject_type("attribute")
//! .build()?;
//!
//! let response = client.check(&request).await?;
//! if !response.decision {
//!     // denied: inspect response.context for reasons
//! }
//! ```

pub mod api;
pub mod builder;
pub mod error;
pub mod models;
pub mod value;

// Re-export main types at crate root
pub use api::PolicyDecisionClient;
pub use builder::{
    AZAtomicRequestBuilder, AZRequestBuilder, ActionBuilder, DEFAULT_POLICY_STORE_KIND,
    EvaluationBuilder, PrincipalBuilder, ResourceBuilder, SubjectBuilder,
};
pub use error::{BuildError, CodecError, PepClientError, TransportError, TransportErrorKind};
pub use models::{
    AZModel, AZRequest, AZResponse, Action, ContextResponse, Entities, Evaluation,
    EvaluationResponse, PolicyStore, Principal, ReasonResponse, Resource, Subject,
};
pub use value::{PropertyMap, Value};
