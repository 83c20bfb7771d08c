//! Client facade: map, transmit, map back.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use permguard_pep_sdk::{
    AZRequest, AZResponse, PepClientError, PolicyDecisionClient, TransportError,
};

use crate::config::PdpClientConfig;
use crate::mapper;
use crate::transport::{GrpcTransport, PdpTransport};

/// `PermGuard` authorization client.
///
/// Cheap to share behind an `Arc`; concurrent `check` calls each use their
/// own handle to the session. After [`AZClient::shutdown`] every new call
/// fails with [`PepClientError::ClientClosed`].
pub struct AZClient {
    transport: RwLock<Option<Arc<dyn PdpTransport>>>,
}

impl AZClient {
    /// Connect to the PDP over gRPC.
    ///
    /// # Errors
    ///
    /// [`PepClientError::Transport`] with kind `Connect` if no connection
    /// could be established.
    #[tracing::instrument(skip_all, fields(endpoint = %config.endpoint_uri()))]
    pub async fn connect(config: &PdpClientConfig) -> Result<Self, PepClientError> {
        let transport = GrpcTransport::connect(config).await?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn PdpTransport>) -> Self {
        Self {
            transport: RwLock::new(Some(transport)),
        }
    }

    /// Submit an authorization request and wait for the decision.
    ///
    /// # Errors
    ///
    /// - [`PepClientError::ClientClosed`] after [`AZClient::shutdown`]; nothing is sent
    /// - [`PepClientError::InvalidRequestShape`] if the request cannot be mapped
    /// - [`PepClientError::Transport`] if the call failed
    #[tracing::instrument(
        skip_all,
        fields(
            request_id = request.request_id.as_deref().unwrap_or_default(),
            zone_id = request.model.zone_id,
            evaluations = request.evaluations.len()
        )
    )]
    pub async fn check(&self, request: &AZRequest) -> Result<AZResponse, PepClientError> {
        let transport = self
            .transport
            .read()
            .clone()
            .ok_or(PepClientError::ClientClosed)?;

        let wire = mapper::to_wire(request)?;
        let response = transport
            .authorization_check(wire)
            .await
            .map_err(|e| log_and_convert("authorization_check", e))?;

        let response = mapper::from_wire(response);
        tracing::debug!(decision = response.decision, "authorization check completed");
        Ok(response)
    }

    /// Release the session. Idempotent; calls already in flight finish on
    /// the handle they hold.
    pub fn shutdown(&self) {
        if self.transport.write().take().is_some() {
            tracing::info!("PDP client shut down");
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.transport.read().is_none()
    }
}

fn log_and_convert(op: &str, e: TransportError) -> PepClientError {
    tracing::error!(operation = op, kind = %e.kind(), error = %e, "PDP call failed");
    PepClientError::Transport(e)
}

#[async_trait]
impl PolicyDecisionClient for AZClient {
    async fn check(&self, request: &AZRequest) -> Result<AZResponse, PepClientError> {
        AZClient::check(self, request).await
    }
}
