//! Request builders.
//!
//! - [`PrincipalBuilder`], [`SubjectBuilder`], [`ResourceBuilder`], [`ActionBuilder`] - entities
//! - [`EvaluationBuilder`] - one authorization question of a batch
//! - [`AZRequestBuilder`] - general request (batch form)
//! - [`AZAtomicRequestBuilder`] - single-evaluation shorthand from flat parameters
//!
//! Every builder is a plain value: `with_*` methods consume the builder and
//! return the updated one, and `build(&self)` copies the current state out,
//! so a builder can be cloned, extended and built any number of times
//! without affecting values built earlier. Required fields are checked in
//! `build()` and reported as [`BuildError::MissingRequiredField`].

pub mod atomic;
pub mod entity;
pub mod evaluation;
pub mod request;

pub use atomic::AZAtomicRequestBuilder;
pub use entity::{ActionBuilder, PrincipalBuilder, ResourceBuilder, SubjectBuilder};
pub use evaluation::EvaluationBuilder;
pub use request::{AZRequestBuilder, DEFAULT_POLICY_STORE_KIND};

use crate::error::BuildError;

fn require_non_empty(field: &'static str, value: &str) -> Result<(), BuildError> {
    if value.is_empty() {
        return Err(BuildError::MissingRequiredField { field });
    }
    Ok(())
}
