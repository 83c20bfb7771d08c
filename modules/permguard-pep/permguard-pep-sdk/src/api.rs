//! Public API trait for the `PermGuard` PEP client.

use async_trait::async_trait;

use crate::error::PepClientError;
use crate::models::{AZRequest, AZResponse};

/// Client for a `PermGuard` Policy Decision Point.
///
/// Implemented by the gRPC facade in `permguard-pep`; code acting as a PEP
/// should depend on this trait rather than the concrete client:
///
/// ```ignore
/// let client: Arc<dyn PolicyDecisionClient> = Arc::new(AZClient::connect(&config).await?);
///
/// let response = client.check(&request).await?;
/// ```
#[async_trait]
pub trait PolicyDecisionClient: Send + Sync {
    /// Submit an authorization request and wait for the decision.
    ///
    /// A deny is returned as `Ok` with `decision == false`.
    ///
    /// # Errors
    ///
    /// - `InvalidRequestShape` if the request cannot be serialized
    /// - `Transport` if the PDP could not be reached or the call failed
    /// - `ClientClosed` if the client was shut down
    async fn check(&self, request: &AZRequest) -> Result<AZResponse, PepClientError>;
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::builder::AZRequestBuilder;

    struct AlwaysDeny;

    #[async_trait]
    impl PolicyDecisionClient for AlwaysDeny {
        async fn check(&self, request: &AZRequest) -> Result<AZResponse, PepClientError> {
            Ok(AZResponse {
                decision: false,
                request_id: request.request_id.clone().unwrap_or_default(),
                ..AZResponse::default()
            })
        }
    }

    #[tokio::test]
    async fn denial_is_a_successful_response() {
        let client: Arc<dyn PolicyDecisionClient> = Arc::new(AlwaysDeny);
        let request = AZRequestBuilder::new(1, "store")
            .with_request_id("r-1")
            .build()
            .expect("request");

        let response = client.check(&request).await.expect("deny is not an error");

        assert!(!response.decision);
        assert_eq!(response.request_id, "r-1");
    }
}
